use alloc::vec::Vec;
use core::{
    ffi::CStr,
    fmt::{self, Write},
};

use bytes::Bytes;
use tracing::{debug, trace};

use crate::{
    config::{BufferLimits, MIN_CAPACITY},
    error::{DynBufError, Result},
    format::{Measured, MeasuredWriter},
    ladder,
};

/// `DynBuffer` 是按 2 的幂阶梯自动伸缩、始终以零字节结尾的动态字节串。
///
/// # 设计动机（Why）
/// - 替代手工维护定长数组与长度变量的写法：调用方只描述“要追加什么”，
///   容量何时增长、何时回收由缓冲自行决定；
/// - 始终保留零终止符，使内容随时可以作为 C 字符串交给外部接口。
///
/// # 架构关系（How）
/// - `payload` 的长度即逻辑容量，超出 `length` 的区域是可直接写入的空闲空间；
/// - 所有容量变化都经由 `resize`，它是唯一调用分配器的位置；
/// - 格式化追加把 `fmt::Arguments` 直接渲染进空闲空间，不足时按精确长度扩容后重试。
///
/// # 契约说明（What）
/// - `length < capacity`，且 `payload[length] == 0`；
/// - `capacity` 是不小于 [`MIN_CAPACITY`] 的 2 的幂，且不超过 [`BufferLimits`] 上限；
/// - 任一操作失败时内容保持调用前状态（格式化失败时同样终止于原长度）。
///
/// # 风险与取舍（Trade-offs）
/// - 元数据与负载分开存放，牺牲“单次分配”换取安全的 `Vec` 语义；
/// - 内容按字节处理，允许包含零字节，此时 [`as_c_str`](Self::as_c_str) 只能看到第一个零字节之前的部分。
#[derive(Clone)]
pub struct DynBuffer {
    payload: Vec<u8>,
    length: usize,
    limits: BufferLimits,
}

impl DynBuffer {
    /// 创建空缓冲，容量为 [`MIN_CAPACITY`]。
    pub fn new() -> Self {
        Self::with_limits(BufferLimits::default())
    }

    /// 创建受 `limits` 约束的空缓冲。
    pub fn with_limits(limits: BufferLimits) -> Self {
        Self {
            payload: alloc::vec![0; MIN_CAPACITY],
            length: 0,
            limits,
        }
    }

    /// 可失败的构造：分配器拒绝首块内存时返回 [`DynBufError::AllocationFailure`]。
    pub fn try_with_limits(limits: BufferLimits) -> Result<Self> {
        let mut payload = Vec::new();
        payload
            .try_reserve_exact(MIN_CAPACITY)
            .map_err(|_| DynBufError::AllocationFailure {
                requested: MIN_CAPACITY,
                current: 0,
            })?;
        payload.resize(MIN_CAPACITY, 0);
        Ok(Self {
            payload,
            length: 0,
            limits,
        })
    }

    /// 内容字节数，不含终止符。
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 当前容量，包含终止符槽位。
    pub fn capacity(&self) -> usize {
        self.payload.len()
    }

    pub fn limits(&self) -> BufferLimits {
        self.limits
    }

    /// 内容视图，不含终止符。
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload[..self.length]
    }

    /// 内容视图，包含末尾的零终止符。
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.payload[..=self.length]
    }

    /// C 字符串视图，截止于第一个零字节。
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(self.as_bytes_with_nul()).unwrap_or_default()
    }

    /// 将容量调整为覆盖 `requested` 字节的最小阶梯档位。
    ///
    /// # 逻辑解析（How）
    /// 1. 目标不足以容纳现有内容与终止符时钳制到 `length + 1`，不足下限时抬升到 [`MIN_CAPACITY`]；
    /// 2. 从当前容量出发倍增、再减半，得到覆盖目标的最小 2 的幂；
    /// 3. 档位不变时直接返回，避免无谓的重新分配；
    /// 4. 扩容经 `try_reserve_exact` 申请，失败或超出上限时报告
    ///    [`DynBufError::AllocationFailure`]，缓冲保持原状。
    ///
    /// # 契约说明（What）
    /// - 永远不会丢弃 `length` 之内的字节与终止符；
    /// - 目标为 0 表示“收缩到刚好容纳现有内容”。
    pub(crate) fn resize(&mut self, requested: usize) -> Result<()> {
        let current = self.capacity();
        let step = ladder::step(current, self.length, requested)
            .map_err(|target| self.allocation_failure(target))?;

        if step.capacity == current {
            return Ok(());
        }

        if step.capacity > current {
            if !self.limits.admits(step.capacity) {
                return Err(self.allocation_failure(step.target));
            }
            self.payload
                .try_reserve_exact(step.capacity - current)
                .map_err(|_| self.allocation_failure(step.target))?;
            self.payload.resize(step.capacity, 0);
        } else {
            self.payload.truncate(step.capacity);
            self.payload.shrink_to(step.capacity);
        }

        trace!(
            from = current,
            to = step.capacity,
            length = self.length,
            "dynbuf capacity moved"
        );
        Ok(())
    }

    fn allocation_failure(&self, requested: usize) -> DynBufError {
        debug!(
            requested,
            current = self.capacity(),
            max_capacity = self.limits.max_capacity(),
            "dynbuf allocation refused"
        );
        DynBufError::AllocationFailure {
            requested,
            current: self.capacity(),
        }
    }

    /// 写入终止符；调用前需保证 `length < capacity`。
    fn terminate(&mut self) {
        self.payload[self.length] = 0;
    }

    /// 追加格式化内容。
    ///
    /// # 逻辑解析（How）
    /// - 每轮把 `args` 渲染进 `[length, capacity)` 空闲区，由 `MeasuredWriter` 报告完整长度；
    /// - 完整长度不小于空闲区时，说明输出被截断或没有给终止符留位：
    ///   先在原长度处重新终止，再按 `length + required + 1` 扩容并重新渲染；
    /// - 循环不假设只重试一次：同一 `Display` 实现两次渲染的长度可能不同。
    ///
    /// # 契约说明（What）
    /// - 格式化实现报错时返回 [`DynBufError::Format`]，内容终止于原长度；
    /// - 扩容失败时返回 [`DynBufError::AllocationFailure`]，内容保持原状。
    pub fn append_formatted(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        loop {
            let start = self.length;
            let free = self.capacity() - start;
            match MeasuredWriter::measure(&mut self.payload[start..], args) {
                Measured::Failed => {
                    self.terminate();
                    return Err(DynBufError::Format { retained: start });
                }
                Measured::Required(required) if required >= free => {
                    self.terminate();
                    let target = start
                        .checked_add(required)
                        .and_then(|n| n.checked_add(1))
                        .ok_or_else(|| self.allocation_failure(usize::MAX))?;
                    self.resize(target)?;
                    trace!(required, free, "dynbuf formatted append retrying after growth");
                }
                Measured::Required(required) => {
                    self.length = start + required;
                    self.terminate();
                    return Ok(());
                }
            }
        }
    }

    /// 追加原始字节；空切片不触发任何容量调整。
    pub fn append_raw(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.resize(self.length + bytes.len() + 1)?;
        let start = self.length;
        self.payload[start..start + bytes.len()].copy_from_slice(bytes);
        self.length += bytes.len();
        self.terminate();
        Ok(())
    }

    /// 追加单个字节。
    pub fn append_byte(&mut self, byte: u8) -> Result<()> {
        self.resize(self.length + 2)?;
        self.payload[self.length] = byte;
        self.length += 1;
        self.terminate();
        Ok(())
    }

    /// 在头部插入 `head`，现有内容（连同终止符）整体右移。
    ///
    /// 源与目标区间在 `head.len() < length` 时重叠，移动使用 `copy_within`。
    pub fn prepend(&mut self, head: &[u8]) -> Result<()> {
        if head.is_empty() {
            return Ok(());
        }
        let shift = head.len();
        self.resize(self.length + shift + 1)?;
        self.payload.copy_within(0..=self.length, shift);
        self.payload[..shift].copy_from_slice(head);
        self.length += shift;
        Ok(())
    }

    /// 截断到最多 `maxlen` 字节，随后尽力收缩容量。
    ///
    /// 收缩失败不会上报：内容在收缩前已经处于合法状态。
    pub fn truncate(&mut self, maxlen: usize) {
        if maxlen >= self.length {
            return;
        }
        self.length = maxlen;
        self.terminate();
        self.shrink_best_effort();
    }

    fn shrink_best_effort(&mut self) {
        if let Err(err) = self.resize(0) {
            debug!(error = %err, length = self.length, "dynbuf shrink skipped");
        }
    }

    /// 以 `value` 替换全部内容；`None` 等价于清空。
    ///
    /// # 契约说明（What）
    /// - 需要扩容时先扩容再覆盖，扩容失败则旧内容原样保留；
    /// - 覆盖完成后按新长度收缩容量，保证容量不超过新内容所需的两倍。
    pub fn set(&mut self, value: Option<&[u8]>) -> Result<()> {
        let value = value.unwrap_or_default();
        if value.len() >= self.capacity() {
            self.resize(value.len() + 1)?;
        }
        self.payload[..value.len()].copy_from_slice(value);
        self.length = value.len();
        self.terminate();
        self.shrink_best_effort();
        Ok(())
    }

    /// 把 `other` 的内容接到末尾；`None` 视为空串。
    ///
    /// 扩容失败时 `self` 完全不变，不会出现部分拷贝。
    pub fn concat(&mut self, other: Option<&DynBuffer>) -> Result<()> {
        let Some(other) = other else {
            return Ok(());
        };
        self.resize(self.length + other.length + 1)?;
        let start = self.length;
        self.payload[start..=start + other.length].copy_from_slice(other.as_bytes_with_nul());
        self.length += other.length;
        Ok(())
    }

    /// 交出内容（不含终止符），供 `bytes` 流水线零拷贝消费。
    pub fn into_bytes(self) -> Bytes {
        let mut payload = self.payload;
        payload.truncate(self.length);
        Bytes::from(payload)
    }
}

impl Default for DynBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for DynBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DynBuffer {}

impl fmt::Debug for DynBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynBuffer")
            .field("length", &self.length)
            .field("capacity", &self.capacity())
            .field("content", &format_args!("{}", self.as_bytes().escape_ascii()))
            .finish()
    }
}

impl Write for DynBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_raw(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl From<DynBuffer> for Bytes {
    fn from(buffer: DynBuffer) -> Self {
        buffer.into_bytes()
    }
}

impl TryFrom<&[u8]> for DynBuffer {
    type Error = DynBufError;

    fn try_from(value: &[u8]) -> Result<Self> {
        let mut buffer = DynBuffer::try_with_limits(BufferLimits::default())?;
        buffer.set(Some(value))?;
        Ok(buffer)
    }
}

impl TryFrom<&str> for DynBuffer {
    type Error = DynBufError;

    fn try_from(value: &str) -> Result<Self> {
        DynBuffer::try_from(value.as_bytes())
    }
}
