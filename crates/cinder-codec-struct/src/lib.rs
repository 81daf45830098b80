#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! `cinder-codec-struct` 提供结构体格式串编译器与就地 pack/unpack 解释器。
//!
//! # 模块定位（Why）
//! - 位于缓冲层之上的定长记录编解码器：协议头、定长记录等二进制
//!   结构通过紧凑的格式串描述一次，随后在共享缓冲（[`BufView`]）
//!   内就地读写，不经过中间分配。
//! - 格式串仅编译一次：[`StructLayout`] 是不可变的操作码程序，
//!   字节序在编译期折算为翻转标志，热路径上无解析、无序判断。
//!
//! # 设计总览（How）
//! - [`layout`] 将格式串编译为 [`FieldOp`] 序列并累计定长宽度；
//! - [`value`] 定义与宿主封送层交换的类型化参数 [`FieldValue`]；
//! - [`codec`] 以“先测量、后执行”的两阶段解释器实现 [`pack`] 与
//!   [`unpack`]：测量阶段核对参数类型/个数、解析动态长度并校验
//!   区间，执行阶段才触碰字节——失败是原子的，绝不产出半写记录。
//!
//! # 契约说明（What）
//! - 错误域：格式串违例报 `struct.format`，参数违例报
//!   `struct.argument`，区间违例报 `buffer.range`（复用缓冲层错误域）；
//! - 线程模型与别名义务继承自 `cinder-buffer`：单线程前提由
//!   `!Send`/`!Sync` 强制，就地写入期间的别名约束是调用方义务。
//!
//! [`BufView`]: cinder_buffer::BufView

extern crate alloc;

pub mod codec;
pub mod layout;
pub mod value;

pub use codec::{pack, unpack};
pub use layout::{FieldOp, NumKind, StructLayout};
pub use value::FieldValue;
