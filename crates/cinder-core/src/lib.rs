#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! `cinder-core` 汇聚缓冲层与编解码层共享的错误契约。
//!
//! # 模块定位（Why）
//! - `cinder-buffer` 与 `cinder-codec-struct` 位于消息运行时的最底层，
//!   两者产生的越界、格式、参数类故障需要合流为统一错误码，
//!   以便上层日志与指标系统执行精确聚合。
//! - 框架需兼容 `no_std + alloc` 场景，因此不依赖 `std::error::Error`，
//!   而是基于 `core::error::Error` 提供轻量实现。
//!
//! # 设计总览（How）
//! - [`error`] 定义 [`CoreError`]、稳定错误码命名空间 [`error::codes`]
//!   以及按规约分层的 [`ErrorKind`]。
//! - 所有下游 crate 统一使用 [`Result`] 别名传播错误，不引入各自的错误类型。
//!
//! # 线程模型（Consistency）
//! - 本工作区的缓冲与编解码组件均为单线程同步库；错误类型本身
//!   `Send + Sync`，可自由穿越线程边界用于上报。

extern crate alloc;

pub mod error;

pub use error::{CoreError, ErrorKind, Result};
