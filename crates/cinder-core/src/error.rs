use alloc::borrow::Cow;
use core::fmt;

/// `CoreError` 是缓冲层与结构体编解码层共享的稳定错误域。
///
/// # 设计背景（Why）
/// - 视图切片、链式消费与 pack/unpack 在不同层次产生的故障需要合流为
///   统一的错误码，便于日志、指标与告警系统执行自动化治理。
/// - 底层库需兼容 `no_std + alloc`，因此仅依赖 `core::error::Error`。
///
/// # 逻辑解析（How）
/// - 错误码 `code` 始终为 `'static` 字符串，承载稳定语义；`message`
///   面向排障人员，允许静态字面量或一次堆分配的动态描述。
/// - [`kind`](Self::kind) 根据错误码前缀映射到 [`ErrorKind`]，
///   调用方无需解析字符串即可分类处置。
///
/// # 契约说明（What）
/// - **前置条件**：调用方必须使用 [`codes`] 模块中备案的常量，
///   或遵循 `<域>.<语义>` 约定的自定义码值。
/// - **后置条件**：返回的错误拥有独立所有权（`Send + Sync + 'static`），
///   构造过程不携带任何部分完成的状态——检测到违规时，
///   相关操作保证未写入字节、未改变引用计数。
///
/// # 设计取舍（Trade-offs）
/// - 采用 `Cow` 保存消息，静态文案零分配，动态文案仅一次堆分配。
#[derive(Debug)]
pub struct CoreError {
    code: &'static str,
    message: Cow<'static, str>,
}

impl CoreError {
    /// 构造核心错误。
    ///
    /// # 契约定义（What）
    /// - `code`：遵循 `<域>.<语义>` 约定的稳定错误码；
    /// - `message`：面向排障人员的自然语言描述，可为 `&'static str`
    ///   或堆分配字符串；不应包含敏感信息。
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 返回人类可读的描述。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 根据错误码归类错误层次，驱动调用方的自动化处置。
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            codes::BUFFER_RANGE => ErrorKind::Range,
            codes::BUFFER_ALLOC => ErrorKind::Allocation,
            codes::STRUCT_FORMAT => ErrorKind::Format,
            codes::STRUCT_ARGUMENT => ErrorKind::Argument,
            _ => ErrorKind::Other,
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl core::error::Error for CoreError {}

/// 按处置策略划分的错误类别。
///
/// # 设计背景（Why）
/// - 错误码粒度面向可观测系统，类别粒度面向调用方的容错分支；
///   将两者解耦可避免调用端硬编码字符串比较。
///
/// # 契约说明（What）
/// - `Range`/`Format`/`Argument` 均为可恢复错误：操作在检测点返回，
///   未污染任何全局状态；
/// - `Allocation` 按约定视为致命故障：默认全局分配器在 OOM 时直接中止，
///   该类别仅保留给提供可失败分配的宿主环境。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 偏移、长度或切片参数越界。
    Range,
    /// 结构体格式串在编译期即不合法。
    Format,
    /// 参数值、类型或数量与格式程序不匹配。
    Argument,
    /// 底层存储分配失败。
    Allocation,
    /// 未归档的扩展错误码。
    Other,
}

/// 框架内置的错误码常量集合，确保可观测性系统具有稳定识别符。
///
/// # 契约说明（What）
/// - **使用前提**：错误码应封装进 [`CoreError`] 并携带完整上下文；
/// - **返回承诺**：调用方收到这些错误码后可据此决定重试、修正参数
///   或直接上报。
pub mod codes {
    /// 缓冲区偏移/长度/切片参数越界。
    pub const BUFFER_RANGE: &str = "buffer.range";
    /// 底层存储分配或再分配失败（按约定为致命故障）。
    pub const BUFFER_ALLOC: &str = "buffer.alloc";
    /// 结构体格式串编译失败。
    pub const STRUCT_FORMAT: &str = "struct.format";
    /// pack/unpack 参数与格式程序不匹配。
    pub const STRUCT_ARGUMENT: &str = "struct.argument";
}

/// 统一的结果别名，下游 crate 不再各自定义错误类型。
pub type Result<T> = core::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_registered_codes() {
        assert_eq!(
            CoreError::new(codes::BUFFER_RANGE, "start out of range").kind(),
            ErrorKind::Range
        );
        assert_eq!(
            CoreError::new(codes::STRUCT_FORMAT, "bad field").kind(),
            ErrorKind::Format
        );
        assert_eq!(
            CoreError::new(codes::STRUCT_ARGUMENT, "missing value").kind(),
            ErrorKind::Argument
        );
        assert_eq!(
            CoreError::new("custom.reason", "ad-hoc").kind(),
            ErrorKind::Other
        );
    }

    #[test]
    fn display_carries_code_and_message() {
        let err = CoreError::new(codes::BUFFER_RANGE, "slice end before start");
        assert_eq!(alloc::format!("{err}"), "[buffer.range] slice end before start");
    }
}
