use cinder_buffer::BufView;
use cinder_codec_struct::{FieldValue, StructLayout, pack, unpack};
use criterion::{Criterion, black_box};
use std::{env, time::Duration};

/// 基准：典型协议头布局的编译复用与 pack/unpack 热路径。
///
/// # 设计背景（Why）
/// - 编解码器的性能前提是“编译一次、多次执行”，执行阶段无解析、
///   无序判断；基准用于在改动测量/执行两阶段逻辑时捕捉回归。
fn bench_struct_roundtrip(c: &mut Criterion) {
    let layout = StructLayout::compile(">BBHLQs8").expect("合法格式");
    let values = vec![
        FieldValue::UInt(2),
        FieldValue::UInt(0x7F),
        FieldValue::UInt(0xBEEF),
        FieldValue::UInt(0xDEAD_BEEF),
        FieldValue::UInt(0x0123_4567_89AB_CDEF),
        FieldValue::from("payload"),
    ];

    c.bench_function("struct_pack_header", |b| {
        let mut view = BufView::zeroed(layout.fixed_len());
        b.iter(|| {
            pack(&layout, &mut view, 0, black_box(&values)).expect("界内打包");
            black_box(view.len())
        });
    });

    c.bench_function("struct_unpack_header", |b| {
        let mut view = BufView::zeroed(layout.fixed_len());
        pack(&layout, &mut view, 0, &values).expect("界内打包");
        b.iter(|| {
            let fields = unpack(&layout, black_box(&view), 0, &[]).expect("界内解包");
            black_box(fields.len())
        });
    });

    c.bench_function("struct_compile_format", |b| {
        b.iter(|| StructLayout::compile(black_box(">BBHLQs8")).expect("合法格式"));
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

    bench_struct_roundtrip(&mut criterion);
    criterion.final_summary();
}
