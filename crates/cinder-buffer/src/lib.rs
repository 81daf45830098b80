#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! `cinder-buffer` 提供零拷贝的字节视图、缓冲链与向量化 I/O 描述符。
//!
//! # 模块定位（Why）
//! - 位于消息运行时之下的缓冲管理层：I/O 交付的字节被包装为
//!   [`BufView`]，在 [`BufChain`] 中零拷贝地拼接、切分与消费，
//!   最终经 [`IoVecTrunk`] 扁平化为向量化写出的描述符序列。
//! - 所有共享均以引用计数表达：视图克隆即共享，消费式方法即转移，
//!   引用存续期间底层存储绝不释放。
//!
//! # 设计总览（How）
//! - `storage`（crate 私有）承载定长的引用计数字节分配；
//! - [`view`] 定义视图的切片/消费/查找契约与致密（可合并）谓词；
//! - [`chain`] 以自有段序列实现逻辑字节流，携带相邻段合并优化；
//! - [`trunk`] 留存视图引用并派生 `(指针, 长度)` 描述符。
//!
//! # 线程模型（What）
//! - **硬性前提**：本库是单线程同步数据结构库，引用计数为非原子
//!   `Rc`。所有类型因此 `!Send`/`!Sync`——跨线程共享会被编译器拒绝，
//!   如确有需要须由调用方在更高层完成所有权移交与同步。
//! - 所有操作均为有限的、与触及字节/段数成正比的内存计算，
//!   不存在阻塞、挂起或并发交错。
//!
//! # 风险提示（Trade-offs）
//! - 就地写入（[`BufView::copy_in`] 与结构体 pack）要求调用方保证
//!   没有其他视图依赖目标区间的旧内容；该别名约束是调用方义务，
//!   运行时不做检查。

extern crate alloc;

mod storage;

pub mod chain;
pub mod trunk;
pub mod view;

pub use chain::BufChain;
pub use trunk::IoVecTrunk;
pub use view::BufView;
