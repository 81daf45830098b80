//! `view_contract` 集成测试：聚焦 [`BufView`] 的切片、消费与越界契约。
//!
//! # 测试总览（Why）
//! - 校验共享/转移两种切片语义对源视图的影响是否符合约定；
//! - 覆盖负索引折算、越界错误路径，确保返回 `buffer.range` 且状态不变；
//! - 验证头尾消费在部分/整段/零字节三种形态下的行为。

use cinder_buffer::BufView;
use cinder_core::error::codes;

/// 合法区间切片的长度恒等于 `end - start`，且源视图保持不变。
#[test]
fn slice_length_matches_range_and_source_intact() {
    let view = BufView::from_slice(b"0123456789");
    for (s, e) in [(0, 0), (0, 10), (3, 7), (9, 10)] {
        let part = view.slice(s, e).expect("合法区间不应失败");
        assert_eq!(part.len(), (e - s) as usize);
    }
    assert_eq!(view.len(), 10);
    assert_eq!(view.to_vec(), b"0123456789");
}

/// 越界切片返回 `buffer.range`，且不改变源视图。
#[test]
fn out_of_range_slice_fails_without_mutation() {
    let mut view = BufView::from_slice(b"abcde");
    for (s, e) in [(0, 6), (6, 6), (3, 2), (-6, 2)] {
        let err = view.slice(s, e).expect_err("越界必须报错");
        assert_eq!(err.code(), codes::BUFFER_RANGE);
    }
    let err = view.take_slice(2, 9).expect_err("转移切片同样校验区间");
    assert_eq!(err.code(), codes::BUFFER_RANGE);
    assert_eq!(view.to_vec(), b"abcde", "失败路径不得清空源视图");
}

/// `mid` 的负数 `n` 表示“直到末尾”。
#[test]
fn mid_negative_count_means_rest() {
    let view = BufView::from_slice(b"abcdef");
    assert_eq!(view.mid(2, -1).expect("取余下全部").to_vec(), b"cdef");
    assert_eq!(view.mid(0, 3).expect("取前缀").to_vec(), b"abc");
    assert!(view.mid(4, 3).is_err(), "count 超出剩余长度应报错");
}

/// `copy_out`/`copy_in` 的边界校验与就地写回。
#[test]
fn copy_out_and_copy_in_validate_bounds() {
    let mut view = BufView::zeroed(6);
    view.copy_in(1, b"abcd").expect("写入界内区间");
    let mut out = [0u8; 6];
    view.copy_out(0, &mut out).expect("整段拷出");
    assert_eq!(&out, b"\0abcd\0");

    let mut overrun = [0u8; 4];
    assert_eq!(
        view.copy_out(3, &mut overrun).expect_err("拷出越界").code(),
        codes::BUFFER_RANGE
    );
    assert_eq!(
        view.copy_in(5, b"xy").expect_err("写入越界").code(),
        codes::BUFFER_RANGE
    );
    assert_eq!(view.to_vec(), b"\0abcd\0", "失败路径不写入任何字节");
}

/// 消费计数饱和于视图长度：超量 `shift`/`pop` 等价于取整段。
#[test]
fn shift_and_pop_saturate_at_view_length() {
    let mut view = BufView::from_slice(b"abc");
    let none = view.shift(0);
    assert!(none.is_empty());
    assert_eq!(view.len(), 3);

    let all = view.shift(17);
    assert_eq!(all.to_vec(), b"abc");
    assert!(view.is_empty());

    let mut view = BufView::from_slice(b"abc");
    let tail = view.pop(99);
    assert_eq!(tail.to_vec(), b"abc");
    assert!(view.is_empty());
}

/// `find` 返回首个匹配的视图内偏移。
#[test]
fn find_scans_within_window() {
    let whole = BufView::from_slice(b"xxabcx");
    assert_eq!(whole.find(b'a'), Some(2));
    assert_eq!(whole.find(b'z'), None);
    let inner = whole.slice(2, 5).expect("内窗口");
    assert_eq!(inner.find(b'x'), None, "窗口外的字节不可见");
    assert_eq!(inner.find(b'c'), Some(2));
}

/// 空视图上所有读取操作退化为无操作。
#[test]
fn empty_view_is_inert() {
    let mut view = BufView::new();
    assert_eq!(view.len(), 0);
    assert!(view.shift(4).is_empty());
    assert!(view.pop(4).is_empty());
    assert_eq!(view.find(0), None);
    assert_eq!(view.slice(0, 0).expect("空切片").len(), 0);
    let mut out = [];
    assert_eq!(view.copy_out(0, &mut out).expect("零字节拷出"), 0);
}
