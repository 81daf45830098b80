use alloc::rc::Rc;
use alloc::vec::Vec;
use cinder_core::{CoreError, Result, error::codes};

use crate::storage::RawBuf;

/// `BufView` 是指向共享存储的有界窗口，也是全库零拷贝共享的基本单元。
///
/// # 设计背景（Why）
/// - I/O 交付的字节需要被反复切片、重组而不产生拷贝；视图只记录
///   `[start, end)` 区间与一份存储引用，切片成本与字节量无关。
/// - “共享还是转移”不经运行期布尔开关表达，而是直接落在所有权
///   语义上：`Clone` 即“共享”（引用计数加一），
///   `take_slice`/`take_mid` 等消费式方法即“转移”（源视图清空，
///   引用计数净不变），二者的选择在编译期固定。
///
/// # 契约说明（What）
/// - 不变式：`0 <= start <= end <= storage.len()`；空视图无存储且
///   `start == end == 0`。
/// - 只要视图存活，底层存储即不会释放；多个视图可别名同一字节区间
///   （并发读取安全，就地写入的别名约束见 [`copy_in`](Self::copy_in)）。
///
/// # 风险提示（Trade-offs）
/// - `Rc` 使视图 `!Send`/`!Sync`：单线程事件循环是本库的硬性前提，
///   跨线程共享需由调用方在更高层自行封装与同步。
#[derive(Clone, Default)]
pub struct BufView {
    raw: Option<Rc<RawBuf>>,
    start: usize,
    end: usize,
}

fn range_error(message: &'static str) -> CoreError {
    CoreError::new(codes::BUFFER_RANGE, message)
}

/// 将允许为负的索引折算到 `[0, len]`，负值自末尾回数。
fn resolve_index(index: isize, len: usize) -> Result<usize> {
    let resolved = if index < 0 {
        index
            .checked_add(len as isize)
            .ok_or_else(|| range_error("index underflows view"))?
    } else {
        index
    };
    if resolved < 0 || resolved as usize > len {
        return Err(range_error("index out of view bounds"));
    }
    Ok(resolved as usize)
}

impl BufView {
    /// 构造空视图（无存储）。
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配 `len` 字节的全零存储并返回覆盖全区间的视图。
    ///
    /// 对应“先分配、后初始化”的写出路径：调用方随后通过
    /// [`copy_in`](Self::copy_in) 或结构体 pack 填充内容。
    /// `len == 0` 时不分配任何存储。
    pub fn zeroed(len: usize) -> Self {
        if len == 0 {
            return Self::new();
        }
        Self {
            raw: Some(RawBuf::zeroed(len)),
            start: 0,
            end: len,
        }
    }

    /// 拷贝 `data` 进入新存储并返回完整视图；空输入不分配存储。
    pub fn from_slice(data: &[u8]) -> Self {
        if data.is_empty() {
            return Self::new();
        }
        let len = data.len();
        Self {
            raw: Some(RawBuf::from_slice(data)),
            start: 0,
            end: len,
        }
    }

    /// 零拷贝收编一个 `Vec<u8>`：原分配直接成为底层存储。
    pub fn from_vec(data: Vec<u8>) -> Self {
        if data.is_empty() {
            return Self::new();
        }
        let len = data.len();
        Self {
            raw: Some(RawBuf::from_vec(data)),
            start: 0,
            end: len,
        }
    }

    /// 视图长度（字节）。
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// 视图是否为空。
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// 共享切片：返回引用同一存储的 `[start, end)` 子视图。
    ///
    /// # 契约说明（What）
    /// - `start`/`end` 允许为负（自末尾回数），折算后必须满足
    ///   `0 <= start <= end <= len`，否则返回 `buffer.range` 且不改变
    ///   任何状态；
    /// - 成功时源视图保持原样，共享引用计数恰好加一
    ///   （空结果不持有存储，计数不变）。
    pub fn slice(&self, start: isize, end: isize) -> Result<BufView> {
        let len = self.len();
        let s = resolve_index(start, len)?;
        let e = resolve_index(end, len)?;
        if e < s {
            return Err(range_error("slice end before start"));
        }
        if s == e {
            return Ok(BufView::new());
        }
        Ok(BufView {
            raw: self.raw.clone(),
            start: self.start + s,
            end: self.start + e,
        })
    }

    /// 转移切片：语义同 [`slice`](Self::slice)，但源视图被清空，
    /// 存储引用整体移交给结果（引用计数净不变）。
    pub fn take_slice(&mut self, start: isize, end: isize) -> Result<BufView> {
        let len = self.len();
        let s = resolve_index(start, len)?;
        let e = resolve_index(end, len)?;
        if e < s {
            return Err(range_error("slice end before start"));
        }
        let base = self.start;
        let raw = self.raw.take();
        self.start = 0;
        self.end = 0;
        if s == e {
            return Ok(BufView::new());
        }
        Ok(BufView {
            raw,
            start: base + s,
            end: base + e,
        })
    }

    /// 共享取中段：`[start, start+n)`；`n < 0` 表示“直到末尾”。
    pub fn mid(&self, start: isize, n: isize) -> Result<BufView> {
        let len = self.len();
        let s = resolve_index(start, len)?;
        let count = if n < 0 {
            len - s
        } else {
            n as usize
        };
        let e = s
            .checked_add(count)
            .filter(|e| *e <= len)
            .ok_or_else(|| range_error("mid count exceeds view"))?;
        self.slice(s as isize, e as isize)
    }

    /// 转移取中段，源视图清空；参数契约同 [`mid`](Self::mid)。
    pub fn take_mid(&mut self, start: isize, n: isize) -> Result<BufView> {
        let len = self.len();
        let s = resolve_index(start, len)?;
        let count = if n < 0 {
            len - s
        } else {
            n as usize
        };
        let e = s
            .checked_add(count)
            .filter(|e| *e <= len)
            .ok_or_else(|| range_error("mid count exceeds view"))?;
        self.take_slice(s as isize, e as isize)
    }

    /// 将 `[start, start+dst.len())` 拷出到 `dst`，返回拷贝字节数。
    pub fn copy_out(&self, start: usize, dst: &mut [u8]) -> Result<usize> {
        let len = self.len();
        if start > len || dst.len() > len - start {
            return Err(range_error("copy_out range exceeds view"));
        }
        if let Some(raw) = &self.raw {
            raw.read_into(self.start + start, dst);
        }
        Ok(dst.len())
    }

    /// 将 `src` 就地写入 `[start, start+src.len())`。
    ///
    /// # 契约说明（What）
    /// - 越界返回 `buffer.range`，此时不写入任何字节；
    /// - **别名约束**：写入期间不得存在依赖该区间旧内容的其他视图，
    ///   这是调用方义务（参见存储层文档），类型系统不做运行时检查。
    pub fn copy_in(&mut self, start: usize, src: &[u8]) -> Result<()> {
        let len = self.len();
        if start > len || src.len() > len - start {
            return Err(range_error("copy_in range exceeds view"));
        }
        if let Some(raw) = &self.raw {
            raw.write_from(self.start + start, src);
        }
        Ok(())
    }

    /// 将 `[start, start+n)` 就地清零，契约同 [`copy_in`](Self::copy_in)。
    pub fn fill_zero(&mut self, start: usize, n: usize) -> Result<()> {
        let len = self.len();
        if start > len || n > len - start {
            return Err(range_error("fill range exceeds view"));
        }
        if let Some(raw) = &self.raw {
            raw.fill_zero(self.start + start, n);
        }
        Ok(())
    }

    /// 自头部消费至多 `n` 字节并以新视图返回。
    ///
    /// # 逻辑解析（How）
    /// - `n >= len` 时整个存储引用被移出，源视图变空（计数净不变）；
    /// - 否则结果是引用计数加一的前缀视图，源视图 `start` 前移；
    /// - `n == 0` 返回空视图，源视图不变。
    pub fn shift(&mut self, n: usize) -> BufView {
        let len = self.len();
        let n = n.min(len);
        if n == 0 {
            return BufView::new();
        }
        if n == len {
            let taken = BufView {
                raw: self.raw.take(),
                start: self.start,
                end: self.end,
            };
            self.start = 0;
            self.end = 0;
            return taken;
        }
        let taken = BufView {
            raw: self.raw.clone(),
            start: self.start,
            end: self.start + n,
        };
        self.start += n;
        taken
    }

    /// 自尾部消费至多 `n` 字节，镜像 [`shift`](Self::shift)。
    pub fn pop(&mut self, n: usize) -> BufView {
        let len = self.len();
        let n = n.min(len);
        if n == 0 {
            return BufView::new();
        }
        if n == len {
            let taken = BufView {
                raw: self.raw.take(),
                start: self.start,
                end: self.end,
            };
            self.start = 0;
            self.end = 0;
            return taken;
        }
        let taken = BufView {
            raw: self.raw.clone(),
            start: self.end - n,
            end: self.end,
        };
        self.end -= n;
        taken
    }

    /// 线性扫描首个等于 `byte` 的字节，返回视图内偏移。
    pub fn find(&self, byte: u8) -> Option<usize> {
        self.as_bytes().iter().position(|b| *b == byte)
    }

    /// 判定两个视图是否“致密”：引用同一存储且 `self.end == next.start`。
    ///
    /// 该谓词驱动缓冲链的相邻段合并优化——致密的两段可以表示为
    /// 同一存储上的单个连续区间而无需拷贝。
    pub fn is_solid_with(&self, next: &BufView) -> bool {
        match (&self.raw, &next.raw) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b) && self.end == next.start,
            _ => false,
        }
    }

    /// 快照视图内容为独立的 `Vec<u8>`。
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// 链层的不变式保证版前缀视图：`n <= len()` 由调用方维护。
    pub(crate) fn prefix(&self, n: usize) -> BufView {
        debug_assert!(n <= self.len());
        if n == 0 {
            return BufView::new();
        }
        BufView {
            raw: self.raw.clone(),
            start: self.start,
            end: self.start + n,
        }
    }

    /// 链层的不变式保证版写入：区间合法性由调用方维护。
    pub(crate) fn write_at(&mut self, start: usize, src: &[u8]) {
        debug_assert!(start + src.len() <= self.len());
        if let Some(raw) = &self.raw {
            raw.write_from(self.start + start, src);
        }
    }

    /// 链层的不变式保证版拷出：区间合法性由调用方维护。
    pub(crate) fn read_into(&self, start: usize, dst: &mut [u8]) {
        debug_assert!(start + dst.len() <= self.len());
        if let Some(raw) = &self.raw {
            raw.read_into(self.start + start, dst);
        }
    }

    /// 同 crate 内部的零拷贝字节访问。
    ///
    /// 单线程模型下安全：切片存活期间同一区间不会发生就地写入
    /// （别名约束由调用路径保证）。
    pub(crate) fn as_bytes(&self) -> &[u8] {
        match &self.raw {
            // SAFETY: 视图不变式保证区间合法；见上方别名说明。
            Some(raw) => unsafe { raw.bytes(self.start, self.len()) },
            None => &[],
        }
    }

    /// 描述符层使用的 `(指针, 长度)` 对；空视图返回 `None`。
    pub(crate) fn raw_parts(&self) -> Option<(*const u8, usize)> {
        self.raw
            .as_ref()
            .map(|raw| (raw.ptr_at(self.start), self.len()))
    }

    /// 链合并优化的就地扩尾：调用方已通过致密性校验。
    pub(crate) fn extend_end(&mut self, new_end: usize) {
        debug_assert!(new_end >= self.end);
        self.end = new_end;
    }

    /// 链合并优化的就地扩头，镜像 [`extend_end`](Self::extend_end)。
    pub(crate) fn extend_start(&mut self, new_start: usize) {
        debug_assert!(new_start <= self.start);
        self.start = new_start;
    }

    /// 链层读取段尾偏移。
    pub(crate) fn end_offset(&self) -> usize {
        self.end
    }

    /// 链层读取段首偏移。
    pub(crate) fn start_offset(&self) -> usize {
        self.start
    }
}

impl core::fmt::Debug for BufView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufView")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("shared", &self.raw.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_count(view: &BufView) -> usize {
        view.raw.as_ref().map_or(0, Rc::strong_count)
    }

    #[test]
    fn slice_shares_storage_and_bumps_refcount_by_one() {
        let view = BufView::from_slice(b"hello world");
        assert_eq!(strong_count(&view), 1);
        let part = view.slice(6, 11).expect("合法区间切片");
        assert_eq!(part.to_vec(), b"world");
        assert_eq!(view.len(), 11, "共享切片不得改变源视图");
        assert_eq!(strong_count(&view), 2, "共享切片引用计数恰好加一");
        drop(part);
        assert_eq!(strong_count(&view), 1);
    }

    #[test]
    fn take_slice_moves_reference_without_net_change() {
        let mut view = BufView::from_slice(b"abcdef");
        let part = view.take_slice(1, 4).expect("转移切片");
        assert_eq!(part.to_vec(), b"bcd");
        assert!(view.is_empty(), "转移后源视图必须清空");
        assert_eq!(strong_count(&part), 1, "转移不产生净引用变化");
    }

    #[test]
    fn negative_indices_count_from_end() {
        let view = BufView::from_slice(b"0123456789");
        assert_eq!(view.slice(-4, -1).expect("负索引切片").to_vec(), b"678");
        assert_eq!(view.mid(-3, 2).expect("负起点取中段").to_vec(), b"78");
        assert!(view.slice(-11, 2).is_err(), "负索引折算后仍需落在界内");
    }

    #[test]
    fn shift_partial_advances_and_shares() {
        let mut view = BufView::from_slice(b"abcdef");
        let head = view.shift(2);
        assert_eq!(head.to_vec(), b"ab");
        assert_eq!(view.to_vec(), b"cdef");
        assert_eq!(strong_count(&view), 2);
    }

    #[test]
    fn shift_whole_hands_over_storage() {
        let mut view = BufView::from_slice(b"abc");
        let whole = view.shift(usize::MAX);
        assert_eq!(whole.to_vec(), b"abc");
        assert!(view.is_empty());
        assert_eq!(strong_count(&whole), 1, "整段移交不应增加引用");
    }

    #[test]
    fn pop_mirrors_shift_at_tail() {
        let mut view = BufView::from_slice(b"abcdef");
        let tail = view.pop(2);
        assert_eq!(tail.to_vec(), b"ef");
        assert_eq!(view.to_vec(), b"abcd");
    }

    #[test]
    fn empty_inputs_allocate_no_storage() {
        assert!(BufView::from_slice(b"").raw.is_none());
        assert!(BufView::zeroed(0).raw.is_none());
        assert!(BufView::from_vec(Vec::new()).raw.is_none());
    }

    #[test]
    fn solid_predicate_requires_same_storage_and_adjacency() {
        let mut whole = BufView::from_slice(b"abcdef");
        let a = whole.slice(0, 3).expect("前半");
        let b = whole.slice(3, 6).expect("后半");
        assert!(a.is_solid_with(&b));
        assert!(!b.is_solid_with(&a), "致密性是有向谓词");
        let other = BufView::from_slice(b"def");
        assert!(!a.is_solid_with(&other), "不同存储永不致密");
        let _ = whole.shift(1);
        let c = whole.slice(0, 2).expect("偏移后的段");
        assert!(!a.is_solid_with(&c), "区间不相邻不致密");
    }
}
