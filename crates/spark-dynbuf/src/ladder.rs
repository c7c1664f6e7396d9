//! 容量阶梯：由当前容量出发，沿 2 的幂上下移动，求出覆盖目标的最小档位。

use crate::config::MIN_CAPACITY;

/// 阶梯计算的输入与结果。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct LadderStep {
    /// 钳制后的最小目标（至少 `length + 1`，至少 [`MIN_CAPACITY`]）。
    pub(crate) target: usize,
    /// 覆盖 `target` 的最小 2 的幂档位。
    pub(crate) capacity: usize,
}

/// 计算新的容量档位。
///
/// # 契约说明（What）
/// - `current` 必须是不小于 [`MIN_CAPACITY`] 的 2 的幂；
/// - 返回的档位满足 `capacity >= target` 且 `capacity / 2 < target`；
/// - 倍增溢出 `usize` 时返回 `Err(target)`，由调用方报告分配失败。
///
/// # 逻辑解析（How）
/// 1. `requested` 不足以容纳现有内容与终止符时，钳制到 `length + 1`；
/// 2. 不足下限时抬升到 [`MIN_CAPACITY`]；
/// 3. 先倍增直到覆盖目标，再在“一半仍能覆盖目标”时减半。
pub(crate) fn step(current: usize, length: usize, requested: usize) -> Result<LadderStep, usize> {
    debug_assert!(current.is_power_of_two() && current >= MIN_CAPACITY);

    // length < capacity 恒成立，length + 1 不会溢出
    let target = requested.max(length + 1).max(MIN_CAPACITY);

    let mut capacity = current;
    while capacity < target {
        capacity = capacity.checked_mul(2).ok_or(target)?;
    }
    while capacity / 2 >= target {
        capacity /= 2;
    }
    Ok(LadderStep { target, capacity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_to_smallest_covering_power_of_two() {
        assert_eq!(step(32, 0, 33).map(|s| s.capacity), Ok(64));
        assert_eq!(step(32, 0, 64).map(|s| s.capacity), Ok(64));
        assert_eq!(step(32, 0, 65).map(|s| s.capacity), Ok(128));
        assert_eq!(step(32, 10, 1000).map(|s| s.capacity), Ok(1024));
    }

    #[test]
    fn floor_and_no_op_when_already_minimal() {
        assert_eq!(step(32, 0, 0), Ok(LadderStep { target: 32, capacity: 32 }));
        assert_eq!(step(32, 5, 7).map(|s| s.capacity), Ok(32));
    }

    #[test]
    fn shrinks_through_the_same_ladder() {
        assert_eq!(step(1024, 5, 0).map(|s| s.capacity), Ok(32));
        assert_eq!(step(1024, 100, 0).map(|s| s.capacity), Ok(128));
        // 恰好一半仍能覆盖目标时继续减半
        assert_eq!(step(128, 31, 0).map(|s| s.capacity), Ok(32));
    }

    #[test]
    fn never_drops_live_bytes_or_sentinel() {
        let result = step(64, 63, 1).expect("不应溢出");
        assert_eq!(result.target, 64);
        assert_eq!(result.capacity, 64);

        let result = step(64, 64 - 1, 64).expect("不应溢出");
        assert!(result.capacity > 63);
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(step(32, 0, usize::MAX), Err(usize::MAX));
    }
}
