use alloc::vec;
use alloc::vec::Vec;
use cinder_buffer::BufView;
use cinder_core::{CoreError, Result, error::codes};

use crate::layout::{FieldOp, NumKind, StructLayout};
use crate::value::FieldValue;

fn range_error(message: &'static str) -> CoreError {
    CoreError::new(codes::BUFFER_RANGE, message)
}

fn argument_error(message: &'static str) -> CoreError {
    CoreError::new(codes::STRUCT_ARGUMENT, message)
}

/// 参数游标：操作码按声明顺序消费参数，两端越界都是 `struct.argument`。
struct Args<'a> {
    rest: &'a [FieldValue],
}

impl<'a> Args<'a> {
    fn new(values: &'a [FieldValue]) -> Self {
        Self { rest: values }
    }

    fn next(&mut self) -> Result<&'a FieldValue> {
        let (first, rest) = self
            .rest
            .split_first()
            .ok_or_else(|| argument_error("missing field argument"))?;
        self.rest = rest;
        Ok(first)
    }

    fn finish(self) -> Result<()> {
        if self.rest.is_empty() {
            Ok(())
        } else {
            Err(argument_error("unconsumed field arguments"))
        }
    }
}

fn array<const N: usize>(buf: &[u8; 8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[..N]);
    out
}

/// 将数值参数按字段宽度编码进 `out` 前缀，返回写入宽度。
///
/// 整型按位保持截断到声明宽度（与既有线上写者一致），`f` 字段
/// 窄化为单精度；`swap` 为真时翻转字节完成序转换。
fn encode_num(kind: NumKind, swap: bool, value: &FieldValue, out: &mut [u8; 8]) -> Result<usize> {
    match kind {
        NumKind::I8 => out[..1].copy_from_slice(&(value.as_i64()? as i8).to_ne_bytes()),
        NumKind::U8 => out[..1].copy_from_slice(&(value.as_u64()? as u8).to_ne_bytes()),
        NumKind::I16 => out[..2].copy_from_slice(&(value.as_i64()? as i16).to_ne_bytes()),
        NumKind::U16 => out[..2].copy_from_slice(&(value.as_u64()? as u16).to_ne_bytes()),
        NumKind::I32 => out[..4].copy_from_slice(&(value.as_i64()? as i32).to_ne_bytes()),
        NumKind::U32 => out[..4].copy_from_slice(&(value.as_u64()? as u32).to_ne_bytes()),
        NumKind::I64 => out[..8].copy_from_slice(&value.as_i64()?.to_ne_bytes()),
        NumKind::U64 => out[..8].copy_from_slice(&value.as_u64()?.to_ne_bytes()),
        NumKind::F32 => out[..4].copy_from_slice(&(value.as_f64()? as f32).to_ne_bytes()),
        NumKind::F64 => out[..8].copy_from_slice(&value.as_f64()?.to_ne_bytes()),
    }
    let width = kind.width();
    if swap {
        out[..width].reverse();
    }
    Ok(width)
}

/// 自 `buf` 前缀解码一个数值字段。
///
/// 有符号种类产出 `Int`、无符号种类产出 `UInt`（宽度窄于 64 位时
/// 零扩展），单精度拓宽为 `Float(f64)`。
fn decode_num(kind: NumKind, swap: bool, buf: &mut [u8; 8]) -> FieldValue {
    if swap {
        buf[..kind.width()].reverse();
    }
    match kind {
        NumKind::I8 => FieldValue::Int(i64::from(i8::from_ne_bytes(array::<1>(buf)))),
        NumKind::U8 => FieldValue::UInt(u64::from(u8::from_ne_bytes(array::<1>(buf)))),
        NumKind::I16 => FieldValue::Int(i64::from(i16::from_ne_bytes(array::<2>(buf)))),
        NumKind::U16 => FieldValue::UInt(u64::from(u16::from_ne_bytes(array::<2>(buf)))),
        NumKind::I32 => FieldValue::Int(i64::from(i32::from_ne_bytes(array::<4>(buf)))),
        NumKind::U32 => FieldValue::UInt(u64::from(u32::from_ne_bytes(array::<4>(buf)))),
        NumKind::I64 => FieldValue::Int(i64::from_ne_bytes(array::<8>(buf))),
        NumKind::U64 => FieldValue::UInt(u64::from_ne_bytes(array::<8>(buf))),
        NumKind::F32 => FieldValue::Float(f64::from(f32::from_ne_bytes(array::<4>(buf)))),
        NumKind::F64 => FieldValue::Float(f64::from_ne_bytes(array::<8>(buf))),
    }
}

fn grow(total: usize, add: usize) -> Result<usize> {
    total
        .checked_add(add)
        .ok_or_else(|| range_error("record length overflows"))
}

/// 测量阶段（pack 方向）：逐操作码核对参数类型与个数并累计线上宽度。
///
/// 该阶段不触碰目标缓冲，任何违例在此报出即保证后续执行阶段
/// 不会写入任何字节。
fn measure_pack(layout: &StructLayout, values: &[FieldValue]) -> Result<usize> {
    let mut args = Args::new(values);
    let mut total = 0usize;
    for op in layout.ops() {
        let width = match op {
            FieldOp::Padding(n) => *n,
            FieldOp::PaddingDyn => args.next()?.as_len()?,
            FieldOp::Str(n) => {
                args.next()?.as_bytes()?;
                *n
            }
            FieldOp::StrDyn => {
                let n = args.next()?.as_len()?;
                args.next()?.as_bytes()?;
                n
            }
            FieldOp::ZStr(n) => {
                args.next()?.as_bytes()?;
                grow(*n, 1)?
            }
            FieldOp::ZStrDyn => {
                let n = args.next()?.as_len()?;
                args.next()?.as_bytes()?;
                grow(n, 1)?
            }
            FieldOp::Num { kind, .. } => {
                match kind {
                    NumKind::F32 | NumKind::F64 => {
                        args.next()?.as_f64()?;
                    }
                    _ => {
                        args.next()?.as_i64()?;
                    }
                }
                kind.width()
            }
        };
        total = grow(total, width)?;
    }
    args.finish()?;
    Ok(total)
}

/// 测量阶段（unpack 方向）：参数只提供动态字段长度。
fn measure_unpack(layout: &StructLayout, values: &[FieldValue]) -> Result<usize> {
    let mut args = Args::new(values);
    let mut total = 0usize;
    for op in layout.ops() {
        let width = match op {
            FieldOp::Padding(n) => *n,
            FieldOp::Str(n) => *n,
            FieldOp::ZStr(n) => grow(*n, 1)?,
            FieldOp::PaddingDyn | FieldOp::StrDyn => args.next()?.as_len()?,
            FieldOp::ZStrDyn => grow(args.next()?.as_len()?, 1)?,
            FieldOp::Num { kind, .. } => kind.width(),
        };
        total = grow(total, width)?;
    }
    args.finish()?;
    Ok(total)
}

/// 定长字符串字段写入：拷贝 `min(data, n)` 字节并将余量补零。
fn write_field_bytes(view: &mut BufView, at: usize, n: usize, data: &[u8]) -> Result<()> {
    let take = data.len().min(n);
    view.copy_in(at, &data[..take])?;
    view.fill_zero(at + take, n - take)
}

/// 零终止字段写入：先整域清零（含终止符），再拷贝 `min(data, n)`。
///
/// 整域清零保证未用尾部为确定性的零字节，绝不泄露缓冲旧内容。
fn write_zstr_bytes(view: &mut BufView, at: usize, n: usize, data: &[u8]) -> Result<()> {
    view.fill_zero(at, n + 1)?;
    let take = data.len().min(n);
    view.copy_in(at, &data[..take])
}

/// 按布局将参数序列就地编码进 `view` 自 `offset` 起的区间。
///
/// # 契约说明（What）
/// - **前置条件**：`0 <= offset < view.len()`，否则 `buffer.range`；
/// - **原子性**：先走测量阶段解析全部动态长度、核对参数类型/个数、
///   校验 `offset + 总宽 <= view.len()`，任一违例立即返回且目标
///   缓冲保持原样——绝不产出半写记录；
/// - **别名义务**：写入期间不得有其他读者依赖该区间旧内容，
///   由调用方保证（见缓冲层文档）。
///
/// # 逻辑解析（How）
/// - 填充字段写零；字符串字段截断/补零到声明宽度；零终止字段
///   整域清零后拷贝，游标前进 `n + 1`；
/// - 数值字段经原生序编码 + 编译期折算的翻转标志落盘，执行期
///   不再判断序标记。
pub fn pack(
    layout: &StructLayout,
    view: &mut BufView,
    offset: usize,
    values: &[FieldValue],
) -> Result<()> {
    let len = view.len();
    if offset >= len {
        return Err(range_error("pack offset out of view bounds"));
    }
    let total = measure_pack(layout, values)?;
    if total > len - offset {
        return Err(range_error("packed record exceeds view"));
    }

    let mut args = Args::new(values);
    let mut cursor = offset;
    for op in layout.ops() {
        match op {
            FieldOp::Padding(n) => {
                view.fill_zero(cursor, *n)?;
                cursor += n;
            }
            FieldOp::PaddingDyn => {
                let n = args.next()?.as_len()?;
                view.fill_zero(cursor, n)?;
                cursor += n;
            }
            FieldOp::Str(n) => {
                write_field_bytes(view, cursor, *n, args.next()?.as_bytes()?)?;
                cursor += n;
            }
            FieldOp::StrDyn => {
                let n = args.next()?.as_len()?;
                write_field_bytes(view, cursor, n, args.next()?.as_bytes()?)?;
                cursor += n;
            }
            FieldOp::ZStr(n) => {
                write_zstr_bytes(view, cursor, *n, args.next()?.as_bytes()?)?;
                cursor += n + 1;
            }
            FieldOp::ZStrDyn => {
                let n = args.next()?.as_len()?;
                write_zstr_bytes(view, cursor, n, args.next()?.as_bytes()?)?;
                cursor += n + 1;
            }
            FieldOp::Num { kind, swap } => {
                let mut scratch = [0u8; 8];
                let width = encode_num(*kind, *swap, args.next()?, &mut scratch)?;
                view.copy_in(cursor, &scratch[..width])?;
                cursor += width;
            }
        }
    }
    Ok(())
}

/// 按布局自 `view` 的 `offset` 起解码一条记录，返回字段值序列。
///
/// # 契约说明（What）
/// - **前置条件**：`0 <= offset < view.len()`，否则 `buffer.range`；
/// - 参数序列只提供动态字段（`x#`/`s#`/`z#`）的长度，个数严格
///   匹配，多余或缺失均为 `struct.argument`；
/// - **原子性**：测量阶段校验全部长度后才开始读取，失败时不产出
///   任何字段值。
///
/// # 逻辑解析（How）
/// - 填充字段只前进游标；字符串字段原样返回 `n` 字节；零终止
///   字段返回 `n` 字节（不含终止符）并前进 `n + 1`；
/// - 数值字段按符号保真解码：有符号产出 `Int`、无符号产出
///   `UInt`、浮点统一为 `Float(f64)`。
pub fn unpack(
    layout: &StructLayout,
    view: &BufView,
    offset: usize,
    values: &[FieldValue],
) -> Result<Vec<FieldValue>> {
    let len = view.len();
    if offset >= len {
        return Err(range_error("unpack offset out of view bounds"));
    }
    let total = measure_unpack(layout, values)?;
    if total > len - offset {
        return Err(range_error("unpacked record exceeds view"));
    }

    let mut args = Args::new(values);
    let mut out = Vec::new();
    let mut cursor = offset;
    for op in layout.ops() {
        match op {
            FieldOp::Padding(n) => cursor += n,
            FieldOp::PaddingDyn => cursor += args.next()?.as_len()?,
            FieldOp::Str(n) => {
                let mut data = vec![0u8; *n];
                view.copy_out(cursor, &mut data)?;
                out.push(FieldValue::Bytes(data));
                cursor += n;
            }
            FieldOp::StrDyn => {
                let n = args.next()?.as_len()?;
                let mut data = vec![0u8; n];
                view.copy_out(cursor, &mut data)?;
                out.push(FieldValue::Bytes(data));
                cursor += n;
            }
            FieldOp::ZStr(n) => {
                let mut data = vec![0u8; *n];
                view.copy_out(cursor, &mut data)?;
                out.push(FieldValue::Bytes(data));
                cursor += n + 1;
            }
            FieldOp::ZStrDyn => {
                let n = args.next()?.as_len()?;
                let mut data = vec![0u8; n];
                view.copy_out(cursor, &mut data)?;
                out.push(FieldValue::Bytes(data));
                cursor += n + 1;
            }
            FieldOp::Num { kind, swap } => {
                let width = kind.width();
                let mut scratch = [0u8; 8];
                view.copy_out(cursor, &mut scratch[..width])?;
                out.push(decode_num(*kind, *swap, &mut scratch));
                cursor += width;
            }
        }
    }
    Ok(out)
}
