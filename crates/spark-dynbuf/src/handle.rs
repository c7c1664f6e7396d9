//! # handle 模块说明
//!
//! ## 角色定位（Why）
//! - 调用方常以“可能尚未创建”的句柄持有缓冲：`Option<DynBuffer>` 的 `None` 即“没有缓冲”；
//! - 本模块把“首次写入时自动创建”的约定集中实现，避免每个调用点重复 `get_or_insert` 样板。
//!
//! ## 契约（What）
//! - 写操作接收 `&mut Option<DynBuffer>`：句柄为空时先创建空缓冲并存回句柄，再执行操作，
//!   即使随后的操作本身是 no-op（例如追加空切片）；
//! - `truncate` 例外：空句柄没有可截断的内容，不会为此分配；
//! - 只读操作把 `None` 视为空缓冲（或直接返回 `None`），从不分配；
//! - `release` 释放缓冲并把句柄置回 `None`，之后的写操作会重新创建。

use core::fmt;

use crate::{buffer::DynBuffer, config::BufferLimits, error::Result};

/// 取出句柄中的缓冲；句柄为空时先创建一个默认配置的空缓冲。
fn materialize(handle: &mut Option<DynBuffer>) -> Result<&mut DynBuffer> {
    let buffer = match handle.take() {
        Some(buffer) => buffer,
        None => DynBuffer::try_with_limits(BufferLimits::default())?,
    };
    Ok(handle.insert(buffer))
}

/// 向句柄追加格式化内容，通常经由 [`appendf!`](crate::appendf) 调用。
pub fn append_formatted(handle: &mut Option<DynBuffer>, args: fmt::Arguments<'_>) -> Result<()> {
    materialize(handle)?.append_formatted(args)
}

/// 向句柄追加原始字节。
pub fn append_raw(handle: &mut Option<DynBuffer>, bytes: &[u8]) -> Result<()> {
    materialize(handle)?.append_raw(bytes)
}

/// 同 [`append_raw`]，`None` 视为空切片。
pub fn append_raw_opt(handle: &mut Option<DynBuffer>, bytes: Option<&[u8]>) -> Result<()> {
    append_raw(handle, bytes.unwrap_or_default())
}

/// 向句柄追加单个字节。
pub fn append_byte(handle: &mut Option<DynBuffer>, byte: u8) -> Result<()> {
    materialize(handle)?.append_byte(byte)
}

/// 在句柄内容头部插入 `head`。
pub fn prepend(handle: &mut Option<DynBuffer>, head: &[u8]) -> Result<()> {
    materialize(handle)?.prepend(head)
}

/// 截断句柄内容；空句柄直接返回。
pub fn truncate(handle: &mut Option<DynBuffer>, maxlen: usize) {
    if let Some(buffer) = handle.as_mut() {
        buffer.truncate(maxlen);
    }
}

/// 以 `value` 替换句柄内容，`None` 清空。
pub fn set(handle: &mut Option<DynBuffer>, value: Option<&[u8]>) -> Result<()> {
    materialize(handle)?.set(value)
}

/// 把 `other` 接到句柄内容末尾。
pub fn concat(handle: &mut Option<DynBuffer>, other: Option<&DynBuffer>) -> Result<()> {
    materialize(handle)?.concat(other)
}

/// 比较两个可能缺失的缓冲。
///
/// 两者都缺失视为相等；仅一方缺失视为不等，即使另一方为空串。
pub fn equals(a: Option<&DynBuffer>, b: Option<&DynBuffer>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            if a.len() != b.len() {
                return false;
            }
            a.is_empty() || a.as_bytes() == b.as_bytes()
        }
        _ => false,
    }
}

/// 内容长度；缺失的缓冲长度为 0。
pub fn length_of(buffer: Option<&DynBuffer>) -> usize {
    buffer.map_or(0, DynBuffer::len)
}

/// 含终止符的内容视图；缺失的缓冲返回 `None`。
pub fn content_view(buffer: Option<&DynBuffer>) -> Option<&[u8]> {
    buffer.map(DynBuffer::as_bytes_with_nul)
}

/// 创建一个空缓冲。
pub fn new_empty() -> DynBuffer {
    DynBuffer::new()
}

/// 释放句柄持有的缓冲并将其置空。
pub fn release(handle: &mut Option<DynBuffer>) {
    *handle = None;
}
