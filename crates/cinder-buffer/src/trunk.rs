use alloc::vec::Vec;

use crate::view::BufView;

/// 描述符数组的初始容量，溢出时由 `Vec` 按倍增策略扩容。
const INITIAL_DESCRIPTORS: usize = 4;

/// `IoVecTrunk` 将一组视图扁平化为向量化 I/O 的描述符序列。
///
/// # 设计背景（Why）
/// - 批量写出（writev 一类调用）需要 `(指针, 长度)` 描述符数组，
///   同时必须保证数组指向的存储在整个调用期间不被释放；
/// - 描述符与存储引用若分存两个平行数组则需时刻保持同步；此处
///   二者合一：留存的 [`BufView`] 本身就是存储引用，描述符按需
///   从视图派生，同步负担随之消失。
///
/// # 契约说明（What）
/// - 自 `push` 起到 [`clear`](Self::clear)（或析构）为止，每个描述符
///   指向的内存保持有效——这正是向量化 I/O 无需拷贝链段的机制；
/// - `clear` 释放全部留存引用并复位长度，对空干线调用亦安全；
/// - 干线仅为一次批量 I/O 的生命周期而存在，不做跨调用复用语义。
#[derive(Default)]
pub struct IoVecTrunk {
    length: usize,
    views: Vec<BufView>,
}

impl IoVecTrunk {
    /// 以默认初始容量构造空干线。
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_DESCRIPTORS)
    }

    /// 以给定描述符容量构造空干线。
    pub fn with_capacity(descriptors: usize) -> Self {
        Self {
            length: 0,
            views: Vec::with_capacity(descriptors),
        }
    }

    /// 追加一个视图：登记其当前字节区间并留存存储引用。
    ///
    /// 共享语义由调用方传入 `view.clone()` 表达；空视图为无操作
    /// （空描述符对向量化 I/O 没有意义）。
    pub fn push(&mut self, view: BufView) {
        if view.is_empty() {
            return;
        }
        self.length += view.len();
        self.views.push(view);
    }

    /// 释放全部留存引用并复位为空；幂等。
    pub fn clear(&mut self) {
        self.views.clear();
        self.length = 0;
    }

    /// 描述符覆盖的总字节数。
    pub fn len(&self) -> usize {
        self.length
    }

    /// 干线是否为空。
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 当前描述符条数。
    pub fn descriptor_count(&self) -> usize {
        self.views.len()
    }

    /// 按顺序遍历留存的视图。
    pub fn iter(&self) -> impl Iterator<Item = &BufView> {
        self.views.iter()
    }

    /// 派生 `(指针, 长度)` 描述符序列，供不经 `std` 的宿主直接下发。
    ///
    /// 指针的有效期与干线留存的引用一致：在 `clear`/析构之前始终合法。
    pub fn descriptors(&self) -> impl Iterator<Item = (*const u8, usize)> + '_ {
        self.views.iter().filter_map(BufView::raw_parts)
    }

    /// 以 [`std::io::IoSlice`] 形式暴露描述符，生命周期绑定到干线借用，
    /// 可直接交给 `write_vectored` 一类调用。
    #[cfg(feature = "std")]
    pub fn io_slices(&self) -> Vec<std::io::IoSlice<'_>> {
        self.views
            .iter()
            .map(|view| std::io::IoSlice::new(view.as_bytes()))
            .collect()
    }
}

impl core::fmt::Debug for IoVecTrunk {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IoVecTrunk")
            .field("length", &self.length)
            .field("descriptors", &self.views.len())
            .finish()
    }
}
