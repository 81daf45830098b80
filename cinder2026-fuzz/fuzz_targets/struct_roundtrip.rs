#![no_main]

use arbitrary::Arbitrary;
use cinder_buffer::BufView;
use cinder_codec_struct::{FieldValue, StructLayout, pack, unpack};
use libfuzzer_sys::fuzz_target;

/// Fuzz 用例：结构化描述一条布局与配套取值。
///
/// - **Why**：直接喂任意格式串很难同时构造匹配的参数序列；以字段
///   规格建模后，格式串、pack 参数与期望的 unpack 结果由同一来源
///   派生，可做严格的差分断言。
/// - **How**：宽度经取模收敛到小区间，保证用例快速且覆盖边界
///   （截断、补零、零终止、跨宽度数值）。
#[derive(Debug, Arbitrary)]
struct RoundtripCase {
    network_order: bool,
    offset: u8,
    fields: Vec<FieldSpec>,
}

#[derive(Debug, Arbitrary)]
enum FieldSpec {
    Pad(u8),
    Bytes { width: u8, data: Vec<u8> },
    ZBytes { width: u8, data: Vec<u8> },
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F64(f64),
}

fn field_width(spec: &FieldSpec) -> usize {
    match spec {
        FieldSpec::Pad(n) => (*n as usize % 8) + 1,
        FieldSpec::Bytes { width, .. } | FieldSpec::ZBytes { width, .. } => {
            (*width as usize % 16) + 1
        }
        _ => 0,
    }
}

/// 定长字符串字段的期望解包内容：截断到 n 并补零。
fn expected_bytes(data: &[u8], n: usize) -> Vec<u8> {
    let mut out = vec![0u8; n];
    let take = data.len().min(n);
    out[..take].copy_from_slice(&data[..take]);
    out
}

fuzz_target!(|case: RoundtripCase| {
    if case.fields.is_empty() || case.fields.len() > 32 {
        return;
    }

    let mut format = String::from(if case.network_order { ">" } else { "<" });
    let mut args = Vec::new();
    let mut expected = Vec::new();
    for spec in &case.fields {
        match spec {
            FieldSpec::Pad(_) => {
                format.push_str(&format!("x{}", field_width(spec)));
            }
            FieldSpec::Bytes { data, .. } => {
                let n = field_width(spec);
                format.push_str(&format!("s{n}"));
                args.push(FieldValue::Bytes(data.clone()));
                expected.push(FieldValue::Bytes(expected_bytes(data, n)));
            }
            FieldSpec::ZBytes { data, .. } => {
                let n = field_width(spec);
                format.push_str(&format!("z{n}"));
                args.push(FieldValue::Bytes(data.clone()));
                expected.push(FieldValue::Bytes(expected_bytes(data, n)));
            }
            FieldSpec::I16(v) => {
                format.push('h');
                args.push(FieldValue::Int((*v).into()));
                expected.push(FieldValue::Int((*v).into()));
            }
            FieldSpec::U16(v) => {
                format.push('H');
                args.push(FieldValue::UInt((*v).into()));
                expected.push(FieldValue::UInt((*v).into()));
            }
            FieldSpec::I32(v) => {
                format.push('l');
                args.push(FieldValue::Int((*v).into()));
                expected.push(FieldValue::Int((*v).into()));
            }
            FieldSpec::U32(v) => {
                format.push('L');
                args.push(FieldValue::UInt((*v).into()));
                expected.push(FieldValue::UInt((*v).into()));
            }
            FieldSpec::I64(v) => {
                format.push('q');
                args.push(FieldValue::Int(*v));
                expected.push(FieldValue::Int(*v));
            }
            FieldSpec::U64(v) => {
                format.push('Q');
                args.push(FieldValue::UInt(*v));
                expected.push(FieldValue::UInt(*v));
            }
            FieldSpec::F64(v) => {
                if v.is_nan() {
                    return;
                }
                format.push('d');
                args.push(FieldValue::Float(*v));
                expected.push(FieldValue::Float(*v));
            }
        }
    }

    let layout = StructLayout::compile(&format).expect("派生格式串必然合法");
    let offset = case.offset as usize % 4;
    let mut view = BufView::zeroed(offset + layout.fixed_len().max(1));
    pack(&layout, &mut view, offset, &args).expect("预算内打包不得失败");
    let fields = unpack(&layout, &view, offset, &[]).expect("预算内解包不得失败");
    assert_eq!(fields, expected, "pack/unpack 往返必须保值");
});
