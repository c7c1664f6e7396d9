//! 容量配置：最小容量下限与可选的容量上限。
//!
//! # 设计概要（How）
//! - `MIN_CAPACITY` 为阶梯的固定下限，新建缓冲即以此容量起步；
//! - [`BufferLimits`] 只约束上限，用于在受限环境下让容量阶梯提前失败，
//!   而不是把压力留给全局分配器。

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DynBufError, Result};

/// 容量阶梯的最小档位（字节，包含零终止符槽位）。
pub const MIN_CAPACITY: usize = 32;

/// 默认容量上限：`usize` 可表达的次高位 2 的幂，实际由分配器先行拒绝。
pub const DEFAULT_MAX_CAPACITY: usize = 1 << (usize::BITS - 2);

/// `BufferLimits` 描述单个缓冲允许占用的最大容量。
///
/// # 契约说明（What）
/// - `max_capacity` 必须是不小于 [`MIN_CAPACITY`] 的 2 的幂，否则构造返回
///   [`DynBufError::InvalidLimits`]；
/// - 容量阶梯计算出的档位一旦超过上限，即按分配失败处理，缓冲保持原状。
///
/// # 设计权衡（Trade-offs）
/// - 上限取 2 的幂，保证“容量总是 2 的幂”与“容量不超过上限”可以同时成立；
/// - 启用 `serde` 特性后可从配置文件加载，反序列化同样经过校验。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawBufferLimits", into = "RawBufferLimits")
)]
pub struct BufferLimits {
    max_capacity: usize,
}

impl BufferLimits {
    /// 以给定上限构造配置，并校验其合法性。
    pub fn new(max_capacity: usize) -> Result<Self> {
        if max_capacity < MIN_CAPACITY || !max_capacity.is_power_of_two() {
            return Err(DynBufError::InvalidLimits { max_capacity });
        }
        Ok(Self { max_capacity })
    }

    /// 不额外设限，仅受分配器约束。
    pub const fn unbounded() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }

    /// 返回容量上限。
    pub const fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// 判断某个阶梯档位是否在上限之内。
    pub(crate) fn admits(&self, capacity: usize) -> bool {
        capacity <= self.max_capacity
    }
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// 序列化时的原始形态，反序列化后经 [`BufferLimits::new`] 校验。
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawBufferLimits {
    max_capacity: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBufferLimits> for BufferLimits {
    type Error = DynBufError;

    fn try_from(raw: RawBufferLimits) -> Result<Self> {
        BufferLimits::new(raw.max_capacity)
    }
}

#[cfg(feature = "serde")]
impl From<BufferLimits> for RawBufferLimits {
    fn from(limits: BufferLimits) -> Self {
        Self {
            max_capacity: limits.max_capacity,
        }
    }
}
