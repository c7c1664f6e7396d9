#![cfg_attr(not(feature = "std"), no_std)]

//! `spark-dynbuf` 提供自动管理容量、始终零终止的动态字节串。
//!
//! # 模块定位（Why）
//! - 取代“定长数组 + 手工长度”的拼接写法：追加、插入、格式化写入时容量自动增长，
//!   截断与整体赋值后容量自动回收；
//! - 内容末尾始终保留一个零字节，随时可作为 C 字符串交给外部接口。
//!
//! # 设计概要（How）
//! - `buffer` 模块实现 [`DynBuffer`]，所有容量变化都汇聚到同一个阶梯算法：
//!   容量始终是不小于 [`MIN_CAPACITY`] 的 2 的幂，且恰好是覆盖内容与终止符的最小档位；
//! - `format` 模块提供有界且可测量的格式化写入器，支撑“写入空闲区、不足则精确扩容后重试”；
//! - `handle` 模块以 `Option<DynBuffer>` 表达“可能尚未创建”的句柄，写操作自动创建；
//! - `config` 模块提供 [`BufferLimits`]，在受限环境下为容量设置上限。
//!
//! # 使用示例
//! ```
//! use spark_dynbuf::{appendf, handle, DynBuffer};
//!
//! let mut greeting: Option<DynBuffer> = None;
//! handle::append_raw(&mut greeting, b"Hello, World").unwrap();
//! handle::append_byte(&mut greeting, b'!').unwrap();
//! appendf!(&mut greeting, " x{}", 2).unwrap();
//! assert_eq!(handle::content_view(greeting.as_ref()), Some(&b"Hello, World! x2\0"[..]));
//!
//! handle::release(&mut greeting);
//! assert_eq!(handle::length_of(greeting.as_ref()), 0);
//! ```

extern crate alloc;

mod buffer;
mod config;
mod error;
mod format;
pub mod handle;
mod ladder;

pub use buffer::DynBuffer;
pub use config::{BufferLimits, DEFAULT_MAX_CAPACITY, MIN_CAPACITY};
pub use error::{DynBufError, Result};
pub use handle::{
    append_byte, append_formatted, append_raw, append_raw_opt, concat, content_view, equals,
    length_of, new_empty, prepend, release, set, truncate,
};

/// 向 `&mut Option<DynBuffer>` 句柄追加格式化内容，参数与 `format!` 相同。
///
/// 返回 [`Result<()>`](crate::Result)：格式化实现报错或扩容失败时内容保持原状。
#[macro_export]
macro_rules! appendf {
    ($handle:expr, $($arg:tt)*) => {
        $crate::handle::append_formatted($handle, ::core::format_args!($($arg)*))
    };
}
