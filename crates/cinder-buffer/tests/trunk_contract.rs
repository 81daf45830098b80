//! `trunk_contract` 集成测试：聚焦 [`IoVecTrunk`] 的描述符与留存契约。
//!
//! # 测试总览（Why）
//! - 校验 push/clear 生命周期：描述符计数、总长度与幂等复位；
//! - 验证 `shift_into_trunk` 的零拷贝交接：整段移交与跨界前缀拆分；
//! - 确认描述符序列与底层字节严格一致，可直接交给向量化写出。

use cinder_buffer::{BufChain, BufView, IoVecTrunk};

fn trunk_bytes(trunk: &IoVecTrunk) -> Vec<u8> {
    let mut out = Vec::with_capacity(trunk.len());
    for view in trunk.iter() {
        out.extend_from_slice(&view.to_vec());
    }
    out
}

/// push 登记区间与引用，clear 幂等复位。
#[test]
fn push_then_clear_resets_idempotently() {
    let mut trunk = IoVecTrunk::new();
    trunk.clear();
    assert!(trunk.is_empty(), "空干线上 clear 必须安全");

    trunk.push(BufView::from_slice(b"abc"));
    trunk.push(BufView::new());
    trunk.push(BufView::from_slice(b"de"));
    assert_eq!(trunk.descriptor_count(), 2, "空视图不产生描述符");
    assert_eq!(trunk.len(), 5);
    assert_eq!(trunk_bytes(&trunk), b"abcde");

    trunk.clear();
    assert_eq!(trunk.descriptor_count(), 0);
    assert_eq!(trunk.len(), 0);
    trunk.clear();
    assert!(trunk.is_empty());
}

/// 共享推入（clone）不影响来源视图的可用性。
#[test]
fn shared_push_retains_source_view() {
    let view = BufView::from_slice(b"hello");
    let mut trunk = IoVecTrunk::new();
    trunk.push(view.clone());
    assert_eq!(view.to_vec(), b"hello", "来源视图保持可读");
    trunk.clear();
    assert_eq!(view.to_vec(), b"hello", "clear 仅释放干线自己的引用");
}

/// 描述符容量自小常数起按倍增扩容，push 数量不受初始容量限制。
#[test]
fn descriptor_array_grows_beyond_initial_capacity() {
    let mut trunk = IoVecTrunk::new();
    for i in 0..33u8 {
        trunk.push(BufView::from_slice(&[i]));
    }
    assert_eq!(trunk.descriptor_count(), 33);
    assert_eq!(trunk.len(), 33);
}

/// `shift_into_trunk`：整段按引用移交，跨界段移交前缀，不拷贝字节。
#[test]
fn chain_handoff_splits_at_budget_boundary() {
    let mut chain = BufChain::new();
    chain.push_back(BufView::from_slice(b"abc"));
    chain.push_back(BufView::from_slice(b"defgh"));
    chain.push_back(BufView::from_slice(b"ij"));

    let mut trunk = IoVecTrunk::new();
    assert_eq!(chain.shift_into_trunk(4, &mut trunk), 4);
    assert_eq!(trunk.descriptor_count(), 2, "首段整移 + 次段前缀");
    assert_eq!(trunk_bytes(&trunk), b"abcd");
    assert_eq!(chain.len(), 6);

    assert_eq!(chain.shift_into_trunk(100, &mut trunk), 6, "超量交接按链长截断");
    assert_eq!(trunk_bytes(&trunk), b"abcdefghij");
    assert!(chain.is_empty());
}

/// 描述符序列与留存视图逐条对应，长度之和等于总长。
#[test]
fn descriptors_mirror_retained_views() {
    let mut trunk = IoVecTrunk::new();
    trunk.push(BufView::from_slice(b"ab"));
    trunk.push(BufView::from_slice(b"cdef"));
    let lens: Vec<usize> = trunk.descriptors().map(|(_, len)| len).collect();
    assert_eq!(lens, vec![2, 4]);
    assert_eq!(lens.iter().sum::<usize>(), trunk.len());
}

/// `io_slices` 输出与描述符字节一致，可直接用于向量化写出。
#[test]
fn io_slices_expose_same_bytes() {
    let mut trunk = IoVecTrunk::new();
    trunk.push(BufView::from_slice(b"abc"));
    trunk.push(BufView::from_slice(b"de"));
    let slices = trunk.io_slices();
    assert_eq!(slices.len(), 2);
    let joined: Vec<u8> = slices.iter().flat_map(|s| s.iter().copied()).collect();
    assert_eq!(joined, b"abcde");
}
