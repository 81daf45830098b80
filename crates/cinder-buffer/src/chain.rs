use alloc::collections::VecDeque;

use crate::trunk::IoVecTrunk;
use crate::view::BufView;

/// `BufChain` 以有序的视图段序列表达一条逻辑字节流。
///
/// # 设计背景（Why）
/// - 网络收发路径上，一条消息往往由多次 I/O 交付的片段拼接而成；
///   链只登记各段视图而不搬运字节，使拼接、消费均为零拷贝。
/// - 段的全部可变操作只发生在头尾两端，访问模式与双端队列完全吻合，
///   故以自有的 `VecDeque<BufView>` 组织段序列，无需侵入式链表的
///   手工摘链与节点分配。
///
/// # 契约说明（What）
/// - 不变式：`length == Σ segment.len()`，且所有段非空；
/// - 段仅在头尾两端可变（首段缩头、尾段扩尾），内部段一经插入即不再
///   改动；
/// - 链持有各段存储的引用，链销毁时级联释放。
///
/// # 风险提示（Trade-offs）
/// - `push_back`/`push_front` 的致密合并将顺序写入的相邻段折叠为单段，
///   避免段数随写入次数无界增长；代价是合并检查常数开销。
#[derive(Default)]
pub struct BufChain {
    length: usize,
    segs: VecDeque<BufView>,
}

impl BufChain {
    /// 构造空链。
    pub fn new() -> Self {
        Self::default()
    }

    /// 链的逻辑总长度（字节）。
    pub fn len(&self) -> usize {
        self.length
    }

    /// 链是否为空。
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 当前段数，致密合并的观测口径。
    pub fn segment_count(&self) -> usize {
        self.segs.len()
    }

    /// 按顺序遍历各段视图。
    pub fn segments(&self) -> impl Iterator<Item = &BufView> {
        self.segs.iter()
    }

    /// 尾部追加一段；共享语义由调用方传入 `view.clone()` 表达。
    ///
    /// # 逻辑解析（How）
    /// - 空视图直接丢弃；
    /// - 若新段与当前尾段致密（同一存储且区间相邻），仅就地扩展尾段
    ///   的 `end`——不新增段、不触碰引用计数净值，顺序填充场景由此
    ///   保持 O(1) 摊还；
    /// - 否则作为新段入列，视图所有权移入链。
    pub fn push_back(&mut self, view: BufView) {
        if view.is_empty() {
            return;
        }
        self.length += view.len();
        if let Some(tail) = self.segs.back_mut() {
            if tail.is_solid_with(&view) {
                tail.extend_end(view.end_offset());
                return;
            }
        }
        self.segs.push_back(view);
    }

    /// 头部插入一段，镜像 [`push_back`](Self::push_back) 的致密检查。
    pub fn push_front(&mut self, view: BufView) {
        if view.is_empty() {
            return;
        }
        self.length += view.len();
        if let Some(head) = self.segs.front_mut() {
            if view.is_solid_with(head) {
                head.extend_start(view.start_offset());
                return;
            }
        }
        self.segs.push_front(view);
    }

    /// 将 `other` 的全部段拼接到尾部并清空 `other`，长度相加。
    pub fn concat(&mut self, other: &mut BufChain) {
        if other.length == 0 {
            return;
        }
        self.length += other.length;
        other.length = 0;
        self.segs.append(&mut other.segs);
    }

    /// 自头部移出至多 `n` 字节，组成新链返回。
    ///
    /// # 逻辑解析（How）
    /// - 预算内能整段容纳的段直接摘下移入结果链；
    /// - 跨越预算边界的首段通过 [`BufView::shift`] 部分消费：前缀进入
    ///   结果链，剩余部分留在原链首；
    /// - `n >= len()` 时整链排空。对 `n` 跨零段、单段、多段均成立。
    pub fn shift(&mut self, n: usize) -> BufChain {
        let n = n.min(self.length);
        let mut out = BufChain::new();
        let mut remaining = n;
        while remaining > 0 {
            let Some(mut seg) = self.segs.pop_front() else {
                break;
            };
            let seg_len = seg.len();
            if remaining >= seg_len {
                remaining -= seg_len;
                out.push_back(seg);
            } else {
                out.push_back(seg.shift(remaining));
                self.segs.push_front(seg);
                remaining = 0;
            }
        }
        self.length -= n;
        out
    }

    /// 自头部丢弃至多 `n` 字节（无接收方的消费），返回实际丢弃数。
    pub fn skip(&mut self, n: usize) -> usize {
        let n = n.min(self.length);
        let mut remaining = n;
        while remaining > 0 {
            let Some(mut seg) = self.segs.pop_front() else {
                break;
            };
            let seg_len = seg.len();
            if remaining >= seg_len {
                remaining -= seg_len;
            } else {
                let _ = seg.shift(remaining);
                self.segs.push_front(seg);
                remaining = 0;
            }
        }
        self.length -= n;
        n
    }

    /// 自头部消费字节并拷贝进扁平目的地，消费量为
    /// `min(dst.len(), self.len())`，返回拷贝字节数。
    pub fn shift_into(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.length);
        let mut copied = 0;
        while copied < n {
            let Some(mut seg) = self.segs.pop_front() else {
                break;
            };
            let seg_len = seg.len();
            let want = n - copied;
            if want >= seg_len {
                seg.read_into(0, &mut dst[copied..copied + seg_len]);
                copied += seg_len;
            } else {
                seg.read_into(0, &mut dst[copied..n]);
                let _ = seg.shift(want);
                self.segs.push_front(seg);
                copied = n;
            }
        }
        self.length -= n;
        n
    }

    /// 自头部消费至多 `n` 字节并按引用交接给描述符干线，不拷贝字节。
    ///
    /// 整段直接移交所有权；跨界首段移交其前缀视图。交接后字节的
    /// 存活由干线保持，直到其 `clear` 或销毁。
    pub fn shift_into_trunk(&mut self, n: usize, trunk: &mut IoVecTrunk) -> usize {
        let n = n.min(self.length);
        let mut remaining = n;
        while remaining > 0 {
            let Some(mut seg) = self.segs.pop_front() else {
                break;
            };
            let seg_len = seg.len();
            if remaining >= seg_len {
                remaining -= seg_len;
                trunk.push(seg);
            } else {
                trunk.push(seg.shift(remaining));
                self.segs.push_front(seg);
                remaining = 0;
            }
        }
        self.length -= n;
        n
    }

    /// 自尾部丢弃至多 `n` 字节（截断），返回实际丢弃数。
    pub fn pop_tail(&mut self, n: usize) -> usize {
        let n = n.min(self.length);
        let mut remaining = n;
        while remaining > 0 {
            let Some(mut seg) = self.segs.pop_back() else {
                break;
            };
            let seg_len = seg.len();
            if remaining >= seg_len {
                remaining -= seg_len;
            } else {
                let _ = seg.pop(remaining);
                self.segs.push_back(seg);
                remaining = 0;
            }
        }
        self.length -= n;
        n
    }

    /// 窥视头部 `n` 字节而不消费。
    ///
    /// # 逻辑解析（How）
    /// - 首段已覆盖 `n` 时返回其前缀的共享视图，零拷贝；
    /// - 跨段时退化为一次扁平化拷贝，返回独立存储的视图。
    pub fn peek(&self, n: usize) -> BufView {
        let n = n.min(self.length);
        if n == 0 {
            return BufView::new();
        }
        if let Some(front) = self.segs.front() {
            if front.len() >= n {
                return front.prefix(n);
            }
        }
        let mut out = BufView::zeroed(n);
        let mut off = 0;
        for seg in &self.segs {
            if off == n {
                break;
            }
            let take = seg.len().min(n - off);
            out.write_at(off, &seg.as_bytes()[..take]);
            off += take;
        }
        out
    }

    /// 跨段扫描首个等于 `byte` 的字节，返回链内累计偏移。
    pub fn find(&self, byte: u8) -> Option<usize> {
        let mut base = 0;
        for seg in &self.segs {
            if let Some(i) = seg.find(byte) {
                return Some(base + i);
            }
            base += seg.len();
        }
        None
    }
}

impl core::fmt::Debug for BufChain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufChain")
            .field("length", &self.length)
            .field("segments", &self.segs.len())
            .finish()
    }
}
