use alloc::vec::Vec;
use cinder_core::{CoreError, Result, error::codes};

/// `FieldValue` 是 pack/unpack 与宿主封送层交换的类型化参数。
///
/// # 设计背景（Why）
/// - 编解码器按操作码顺序消费/产出一列值；封送层（本库范围之外）
///   负责宿主表示与 `FieldValue` 的互转；
/// - 类型不匹配在进入字节写入之前即以 `struct.argument` 报出，
///   绝不产出损坏的线上字节。
///
/// # 契约说明（What）
/// - 整型字段接受 `Int`/`UInt`（位保持互转，窄化时按宽度截断，
///   与既有线上语义一致）；
/// - 浮点字段额外接受整型值；字节字段要求 `Bytes`；
/// - 动态长度参数要求非负整型。
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 有符号整数（64 位承载，按字段宽度截断）。
    Int(i64),
    /// 无符号整数。
    UInt(u64),
    /// 浮点数（64 位承载，`f` 字段窄化为单精度）。
    Float(f64),
    /// 原始字节序列。
    Bytes(Vec<u8>),
}

fn argument_error(message: &'static str) -> CoreError {
    CoreError::new(codes::STRUCT_ARGUMENT, message)
}

impl FieldValue {
    /// 以有符号整数取值；`UInt` 做位保持转换。
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            FieldValue::Int(v) => Ok(*v),
            FieldValue::UInt(v) => Ok(*v as i64),
            _ => Err(argument_error("integer value expected")),
        }
    }

    /// 以无符号整数取值；`Int` 做位保持转换。
    pub fn as_u64(&self) -> Result<u64> {
        match self {
            FieldValue::UInt(v) => Ok(*v),
            FieldValue::Int(v) => Ok(*v as u64),
            _ => Err(argument_error("integer value expected")),
        }
    }

    /// 以浮点数取值；整型值按数值语义拓宽。
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            FieldValue::Float(v) => Ok(*v),
            FieldValue::Int(v) => Ok(*v as f64),
            FieldValue::UInt(v) => Ok(*v as f64),
            FieldValue::Bytes(_) => Err(argument_error("numeric value expected")),
        }
    }

    /// 以字节序列取值。
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            FieldValue::Bytes(v) => Ok(v),
            _ => Err(argument_error("byte string value expected")),
        }
    }

    /// 以动态字段长度取值：必须是非负整型。
    pub fn as_len(&self) -> Result<usize> {
        match self {
            FieldValue::Int(v) => {
                usize::try_from(*v).map_err(|_| argument_error("length must be non-negative"))
            }
            FieldValue::UInt(v) => {
                usize::try_from(*v).map_err(|_| argument_error("length exceeds address space"))
            }
            _ => Err(argument_error("length argument must be an integer")),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::UInt(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(v: &[u8]) -> Self {
        FieldValue::Bytes(v.to_vec())
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Bytes(v.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        FieldValue::Bytes(v)
    }
}
