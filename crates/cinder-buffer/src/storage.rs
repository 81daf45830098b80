use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::UnsafeCell;

/// `RawBuf` 是一块引用计数、创建后长度不可变的字节存储。
///
/// # 设计背景（Why）
/// - 视图层所有的零拷贝共享最终都落在同一块底层存储上：
///   多个 [`BufView`](crate::BufView) 可同时引用相同区间，
///   只要任一视图存活，存储就不得释放。
/// - 共享计数采用非原子的 `Rc<RawBuf>`，与单线程事件循环的运行
///   模型一致；释放时机由所有权系统静态保证（最后一个克隆析构时
///   恰好释放一次）。
///
/// # 逻辑解析（How）
/// - 载荷为 `Box<[UnsafeCell<u8>]>`：`UnsafeCell` 允许在共享引用下
///   通过裸指针执行 pack 的就地写入，同时保持读路径零拷贝。
/// - 所有读写均经由 [`read_into`](Self::read_into) /
///   [`write_from`](Self::write_from) 的指针拷贝完成，不在存储层
///   构造长期存活的 `&mut` 引用。
///
/// # 契约说明（What）
/// - **前置条件**：本库为单线程同步库，`Rc` + `UnsafeCell` 使所有
///   上层类型自动 `!Send`/`!Sync`，跨线程共享会被编译器直接拒绝。
/// - **别名约束**：当某个视图正在执行就地写入（`copy_in`/pack）时，
///   调用方有义务保证没有其他视图依赖旧内容；这是调用方契约，
///   类型系统不做运行时检查。
///
/// # 设计取舍（Trade-offs）
/// - 不提供任何扩容入口：追加式增长发生在视图/链层，存储层保持
///   定长可简化别名推理并消除 realloc 失效引用的风险。
pub(crate) struct RawBuf {
    cells: Box<[UnsafeCell<u8>]>,
}

impl RawBuf {
    /// 分配 `len` 字节并全部清零。调用方保证 `len > 0`。
    pub(crate) fn zeroed(len: usize) -> Rc<Self> {
        debug_assert!(len > 0, "零长度存储应由视图层以 None 表达");
        let cells: Box<[UnsafeCell<u8>]> = (0..len).map(|_| UnsafeCell::new(0)).collect();
        Rc::new(Self { cells })
    }

    /// 拷贝 `data` 进入新存储。调用方保证输入非空。
    pub(crate) fn from_slice(data: &[u8]) -> Rc<Self> {
        debug_assert!(!data.is_empty());
        let cells: Box<[UnsafeCell<u8>]> = data.iter().map(|b| UnsafeCell::new(*b)).collect();
        Rc::new(Self { cells })
    }

    /// 零拷贝收编一个既有 `Vec<u8>`，原分配直接成为存储载荷。
    ///
    /// # 逻辑解析（How）
    /// - `UnsafeCell<u8>` 与 `u8` 具有相同的内存表示（标准库文档承诺），
    ///   因此可将 `Box<[u8]>` 的裸指针重解释为 `Box<[UnsafeCell<u8>]>`，
    ///   避免 I/O 路径交付的缓冲再经历一次整块拷贝。
    pub(crate) fn from_vec(data: Vec<u8>) -> Rc<Self> {
        debug_assert!(!data.is_empty());
        let raw = Box::into_raw(data.into_boxed_slice());
        // SAFETY: `UnsafeCell<u8>` 与 `u8` 内存表示一致，指针重解释
        // 不改变分配的布局与长度，Box 的所有权原样转移。
        let cells = unsafe { Box::from_raw(raw as *mut [UnsafeCell<u8>]) };
        Rc::new(Self { cells })
    }

    /// 存储总长度。
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    fn base_ptr(&self) -> *mut u8 {
        UnsafeCell::raw_get(self.cells.as_ptr())
    }

    /// 以切片形式暴露 `[start, start+len)` 区间。
    ///
    /// # Safety
    /// - 调用方保证区间落在存储内部，且切片存活期间没有对同一区间
    ///   的就地写入（单线程模型下即“读取期间不要 pack 同一区域”）。
    pub(crate) unsafe fn bytes(&self, start: usize, len: usize) -> &[u8] {
        debug_assert!(start.checked_add(len).is_some_and(|end| end <= self.len()));
        unsafe { core::slice::from_raw_parts(self.base_ptr().add(start), len) }
    }

    /// 指向 `start` 处的只读裸指针，供描述符层派生 `(ptr, len)` 对。
    pub(crate) fn ptr_at(&self, start: usize) -> *const u8 {
        debug_assert!(start <= self.len());
        // 指针算术不解引用，越界由上层不变式保证。
        unsafe { self.base_ptr().add(start) as *const u8 }
    }

    /// 将 `[start, start+dst.len())` 拷贝进 `dst`。
    pub(crate) fn read_into(&self, start: usize, dst: &mut [u8]) {
        debug_assert!(start.checked_add(dst.len()).is_some_and(|end| end <= self.len()));
        // SAFETY: 区间由调用方（同 crate）预先校验；目标切片独占可写。
        unsafe {
            core::ptr::copy_nonoverlapping(self.base_ptr().add(start), dst.as_mut_ptr(), dst.len());
        }
    }

    /// 将 `src` 写入 `[start, start+src.len())`。
    ///
    /// 别名约束见类型级文档：写入期间不得存在依赖旧内容的读取方。
    pub(crate) fn write_from(&self, start: usize, src: &[u8]) {
        debug_assert!(start.checked_add(src.len()).is_some_and(|end| end <= self.len()));
        // SAFETY: 区间已校验；UnsafeCell 允许共享引用下的指针写入。
        unsafe {
            core::ptr::copy_nonoverlapping(src.as_ptr(), self.base_ptr().add(start), src.len());
        }
    }

    /// 将 `[start, start+len)` 清零，pack 的 padding 与字符串补齐路径使用。
    pub(crate) fn fill_zero(&self, start: usize, len: usize) {
        debug_assert!(start.checked_add(len).is_some_and(|end| end <= self.len()));
        // SAFETY: 同 `write_from`。
        unsafe {
            core::ptr::write_bytes(self.base_ptr().add(start), 0, len);
        }
    }
}
