//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为 `DynBuffer` 的全部公开操作提供集中定义的错误语义；
//! - 区分“容量阶梯无法满足”“格式化实现自身失败”“配置非法”三类情形，调用方可据此决定是否视为致命。
//!
//! ## 设计要求（What）
//! - 错误类型派生 `thiserror::Error`，在 `no_std` 下依赖 `core::error::Error` 同样可用；
//! - 所有变体只携带 `usize` 上下文，保持 `Clone + Eq`，便于测试直接断言；
//! - 除截断时的“尽力缩容”外，任何失败都必须经由 `Result` 返回，不得静默吞掉。

use thiserror::Error;

/// 本 crate 的统一 `Result` 别名。
pub type Result<T, E = DynBufError> = core::result::Result<T, E>;

/// 动态字节串的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：容量管理是唯一可能失败的环节（格式化实现除外），
///   因此错误枚举刻意保持精简，每个变体都对应一个可观测的失败来源。
/// - **契约 (What)**：
///   - 返回任何错误后，缓冲仍满足 `length < capacity` 与零终止符不变量；
///   - `AllocationFailure` 发生时内容与容量均保持调用前状态；
///   - `Format` 发生时内容被终止在 `retained` 字节处，与调用前一致。
/// - **设计权衡 (Trade-offs)**：句柄以 `&mut Option<DynBuffer>` 表达，引用本身不可能为空，
///   因此不存在“句柄引用缺失”这一变体。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DynBufError {
    /// 容量阶梯计算出的目标无法分配。
    ///
    /// - `requested`：经过钳制后的最小目标字节数；
    /// - `current`：失败时缓冲保持的容量。
    ///
    /// 触发来源包括：分配器拒绝、`usize` 溢出、超过 [`BufferLimits`](crate::BufferLimits) 上限。
    #[error("allocation failure: cannot grow buffer from {current} bytes to hold {requested} bytes")]
    AllocationFailure { requested: usize, current: usize },

    /// 某个 `Display`/`Debug` 实现返回了 `fmt::Error`。
    #[error("formatting failed; buffer kept its first {retained} bytes")]
    Format { retained: usize },

    /// `BufferLimits` 的上限不是不小于最小容量的 2 的幂。
    #[error("invalid capacity limit {max_capacity}: expected a power of two >= 32")]
    InvalidLimits { max_capacity: usize },
}

impl DynBufError {
    /// 是否为容量不足导致的失败，便于调用方决定降级或直接终止。
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, DynBufError::AllocationFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_carry_context() {
        let err = DynBufError::AllocationFailure {
            requested: 100,
            current: 64,
        };
        assert!(err.is_allocation_failure());
        assert!(err.to_string().contains("64"));
        assert!(err.to_string().contains("100"));

        let fmt_err = DynBufError::Format { retained: 5 };
        assert!(!fmt_err.is_allocation_failure());
        assert!(fmt_err.to_string().contains('5'));
    }
}
