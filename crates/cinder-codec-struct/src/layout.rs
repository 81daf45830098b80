use alloc::vec::Vec;
use cinder_core::{CoreError, Result, error::codes};

/// 数值字段的种类与宽度，字节序在编译期独立解析。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumKind {
    /// 有符号 8 位。
    I8,
    /// 无符号 8 位。
    U8,
    /// 有符号 16 位。
    I16,
    /// 无符号 16 位。
    U16,
    /// 有符号 32 位。
    I32,
    /// 无符号 32 位。
    U32,
    /// 有符号 64 位。
    I64,
    /// 无符号 64 位。
    U64,
    /// IEEE754 单精度。
    F32,
    /// IEEE754 双精度。
    F64,
}

impl NumKind {
    /// 字段在线格式中的字节宽度。
    pub fn width(self) -> usize {
        match self {
            NumKind::I8 | NumKind::U8 => 1,
            NumKind::I16 | NumKind::U16 => 2,
            NumKind::I32 | NumKind::U32 | NumKind::F32 => 4,
            NumKind::I64 | NumKind::U64 | NumKind::F64 => 8,
        }
    }
}

/// 格式程序的单条操作码。
///
/// # 设计背景（Why）
/// - 若将操作码编码为整型数组（操作码 + 可选操作数交错存放），
///   解释器需按约定回读；以带标签的枚举表达同一信息后，
///   操作数与操作码的配对关系由类型系统保证。
/// - 字节序在编译期折算进 `swap` 标志：解释器对每个字段只做
///   “原生序写入”或“翻转写入”两种动作，运行期不再判断序标记。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// `n` 字节填充，不消费参数。
    Padding(usize),
    /// 填充长度由运行期参数给出（`x#`）。
    PaddingDyn,
    /// 定长 `n` 字节字符串字段。
    Str(usize),
    /// 动态长度字符串字段（`s#`），长度由运行期参数给出。
    StrDyn,
    /// 定长零终止字符串字段，线格式占 `n + 1` 字节。
    ZStr(usize),
    /// 动态长度零终止字符串字段（`z#`）。
    ZStrDyn,
    /// 数值字段；`swap` 为真表示按与平台相反的字节序存取。
    Num {
        /// 数值种类与宽度。
        kind: NumKind,
        /// 编译期解析出的翻转标志。
        swap: bool,
    },
}

/// `StructLayout` 是格式串编译产物：一次编译、多次执行的字段计划。
///
/// # 设计背景（Why）
/// - 线格式记录的 pack/unpack 位于热路径，不应重复解析格式串；
///   编译产物不可变、无内部状态，可被任意多次复用。
///
/// # 契约说明（What）
/// - [`fixed_len`](Self::fixed_len) 是所有静态定长字段的字节和
///   （`z` 字段含终止符，动态字段计 0），调用方据此预分配缓冲；
/// - 编译失败统一返回 `struct.format`，绝不产出半成品程序。
///
/// # 线格式兼容（Consistency）
/// - 格式串方言与既有线上读者约定一致：序标记 `@ < > !`，字段
///   `x s z b B h H l L q Q f d`，十进制重复计数与 `#` 动态标记。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    fixed_len: usize,
    ops: Vec<FieldOp>,
}

fn format_error(message: &'static str) -> CoreError {
    CoreError::new(codes::STRUCT_FORMAT, message)
}

/// 定长累计的受控加法：溢出视为格式错误而非环绕。
fn grow(total: usize, add: usize) -> Result<usize> {
    total
        .checked_add(add)
        .ok_or_else(|| format_error("fixed length overflows"))
}

/// 小端标记在当前平台下是否需要翻转。
const SWAP_FOR_LITTLE: bool = cfg!(target_endian = "big");
/// 大端（网络序）标记在当前平台下是否需要翻转。
const SWAP_FOR_BIG: bool = cfg!(target_endian = "little");

/// 字段后缀：无、十进制重复计数、或 `#` 动态标记。
enum Suffix {
    None,
    Repeat(usize),
    Dynamic,
}

struct Parser<'a> {
    rest: &'a [u8],
}

impl<'a> Parser<'a> {
    fn next(&mut self) -> Option<u8> {
        let (first, rest) = self.rest.split_first()?;
        self.rest = rest;
        Some(*first)
    }

    /// 解析字段后缀。重复计数首位必须为 1-9，溢出视为格式错误。
    fn suffix(&mut self) -> Result<Suffix> {
        match self.rest.first() {
            Some(b'#') => {
                self.rest = &self.rest[1..];
                Ok(Suffix::Dynamic)
            }
            Some(d @ b'1'..=b'9') => {
                let mut value = (*d - b'0') as usize;
                self.rest = &self.rest[1..];
                while let Some(d @ b'0'..=b'9') = self.rest.first() {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add((*d - b'0') as usize))
                        .ok_or_else(|| format_error("repeat count overflows"))?;
                    self.rest = &self.rest[1..];
                }
                Ok(Suffix::Repeat(value))
            }
            _ => Ok(Suffix::None),
        }
    }
}

impl StructLayout {
    /// 将格式串编译为可复用的操作码程序。
    ///
    /// # 契约说明（What）
    /// - **输入**：可选序标记与字段序列组成的格式串；空串直接报
    ///   `struct.format`（空格式几乎总是调用方笔误，不产出零字段程序）；
    /// - **错误路径**：未知字段字符、悬空的重复数字、缺少长度的
    ///   `s`/`z`、数值字段接 `#`，均返回 `struct.format` 且不产出
    ///   任何程序；
    /// - **后置条件**：成功时操作码序列与 `fixed_len` 一致地描述
    ///   全部静态字段。
    ///
    /// # 逻辑解析（How）
    /// - 序标记只改变后续字段的 `swap` 折算，自身不生成操作码；
    /// - 数值字段的重复计数展开为 N 条相同操作码（等价于把字段
    ///   连写 N 次），保持解释器单遍直行。
    pub fn compile(format: &str) -> Result<Self> {
        if format.is_empty() {
            return Err(format_error("empty format string"));
        }
        let mut parser = Parser {
            rest: format.as_bytes(),
        };
        let mut ops = Vec::new();
        let mut fixed_len = 0usize;
        let mut swap = false;

        while let Some(ch) = parser.next() {
            match ch {
                b'@' => swap = false,
                b'<' => swap = SWAP_FOR_LITTLE,
                b'>' | b'!' => swap = SWAP_FOR_BIG,
                b'x' => match parser.suffix()? {
                    Suffix::None => {
                        ops.push(FieldOp::Padding(1));
                        fixed_len = grow(fixed_len, 1)?;
                    }
                    Suffix::Repeat(n) => {
                        ops.push(FieldOp::Padding(n));
                        fixed_len = grow(fixed_len, n)?;
                    }
                    Suffix::Dynamic => ops.push(FieldOp::PaddingDyn),
                },
                b's' => match parser.suffix()? {
                    Suffix::None => return Err(format_error("string field requires a length")),
                    Suffix::Repeat(n) => {
                        ops.push(FieldOp::Str(n));
                        fixed_len = grow(fixed_len, n)?;
                    }
                    Suffix::Dynamic => ops.push(FieldOp::StrDyn),
                },
                b'z' => match parser.suffix()? {
                    Suffix::None => return Err(format_error("string field requires a length")),
                    Suffix::Repeat(n) => {
                        ops.push(FieldOp::ZStr(n));
                        fixed_len = grow(grow(fixed_len, n)?, 1)?;
                    }
                    Suffix::Dynamic => ops.push(FieldOp::ZStrDyn),
                },
                b'b' | b'B' | b'h' | b'H' | b'l' | b'L' | b'q' | b'Q' | b'f' | b'd' => {
                    let kind = match ch {
                        b'b' => NumKind::I8,
                        b'B' => NumKind::U8,
                        b'h' => NumKind::I16,
                        b'H' => NumKind::U16,
                        b'l' => NumKind::I32,
                        b'L' => NumKind::U32,
                        b'q' => NumKind::I64,
                        b'Q' => NumKind::U64,
                        b'f' => NumKind::F32,
                        _ => NumKind::F64,
                    };
                    // 单字节字段不存在序，统一按原生写入。
                    let swap = swap && kind.width() > 1;
                    let repeat = match parser.suffix()? {
                        Suffix::None => 1,
                        Suffix::Repeat(n) => n,
                        Suffix::Dynamic => {
                            return Err(format_error("numeric field cannot be dynamic"));
                        }
                    };
                    let span = kind
                        .width()
                        .checked_mul(repeat)
                        .ok_or_else(|| format_error("fixed length overflows"))?;
                    for _ in 0..repeat {
                        ops.push(FieldOp::Num { kind, swap });
                    }
                    fixed_len = grow(fixed_len, span)?;
                }
                b'0'..=b'9' => return Err(format_error("repeat count without a field")),
                b'#' => return Err(format_error("dynamic marker without a field")),
                _ => return Err(format_error("unknown format character")),
            }
        }

        Ok(Self { fixed_len, ops })
    }

    /// 全部静态定长字段的字节和；动态字段计 0。
    pub fn fixed_len(&self) -> usize {
        self.fixed_len
    }

    /// 编译产出的操作码序列。
    pub fn ops(&self) -> &[FieldOp] {
        &self.ops
    }
}
