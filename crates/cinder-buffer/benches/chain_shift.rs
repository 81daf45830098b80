use cinder_buffer::{BufChain, BufView, IoVecTrunk};
use criterion::{Criterion, black_box};
use std::{env, time::Duration};

/// 基准：顺序填充 + 按预算消费的典型收包路径。
///
/// # 设计背景（Why）
/// - 链的核心性能假设是“顺序填充时段数不随写入次数增长、消费成本
///   与触及段数成正比”；基准用于在改动合并/遍历逻辑时捕捉回归。
///
/// # 逻辑解析（How）
/// - 每轮构造一条由同一存储切片致密填充的链与一条离散段链，
///   分别执行 `shift` 与 `shift_into_trunk`，覆盖合并与拆分两条路径。
fn bench_chain_shift(c: &mut Criterion) {
    c.bench_function("chain_shift_solid_fill", |b| {
        let backing = BufView::from_slice(&[0u8; 4096]);
        b.iter(|| {
            let mut chain = BufChain::new();
            for i in 0..16isize {
                let seg = backing.slice(i * 256, (i + 1) * 256).expect("界内切片");
                chain.push_back(seg);
            }
            let moved = chain.shift(1500);
            black_box((moved.len(), chain.segment_count()))
        });
    });

    c.bench_function("chain_shift_into_trunk", |b| {
        b.iter(|| {
            let mut chain = BufChain::new();
            for _ in 0..16 {
                chain.push_back(BufView::from_slice(&[7u8; 256]));
            }
            let mut trunk = IoVecTrunk::new();
            let moved = chain.shift_into_trunk(1500, &mut trunk);
            black_box((moved, trunk.descriptor_count()))
        });
    });
}

fn main() {
    let mut quick_mode = false;
    for arg in env::args().skip(1) {
        if arg == "--quick" {
            quick_mode = true;
        }
    }

    let mut criterion = Criterion::default();
    if quick_mode {
        criterion = criterion
            .sample_size(10)
            .warm_up_time(Duration::from_millis(100))
            .measurement_time(Duration::from_millis(250));
    }

    bench_chain_shift(&mut criterion);
    criterion.final_summary();
}
