#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spark_dynbuf::{BufferLimits, DynBuffer, MIN_CAPACITY};

/// Fuzz 指令：一次 `DynBuffer` 写操作。
///
/// - **Why**：容量阶梯在扩容、收缩、失败回退三条路径上共享同一段计算，随机交错最容易暴露终止符或长度错位；
/// - **How**：两个缓冲分别使用默认配置与 4 KiB 上限，后者会频繁触发分配失败路径；
/// - **What**：每步之后与影子 `Vec<u8>` 比对内容，并检查阶梯不变量。
#[derive(Debug, Arbitrary)]
struct DynBufCase {
    ops: Vec<BufferOp>,
}

#[derive(Debug, Arbitrary)]
enum BufferOp {
    Raw { target: bool, bytes: Vec<u8> },
    Byte { target: bool, byte: u8 },
    Prepend { target: bool, bytes: Vec<u8> },
    Truncate { target: bool, maxlen: u16 },
    Set { target: bool, bytes: Option<Vec<u8>> },
    Format { target: bool, value: u64, width: u16 },
    /// 把一个缓冲接到另一个末尾。
    Concat { target: bool },
}

struct Slot {
    buffer: DynBuffer,
    model: Vec<u8>,
}

impl Slot {
    fn check(&self) {
        assert_eq!(self.buffer.as_bytes(), self.model.as_slice());
        assert_eq!(self.buffer.as_bytes_with_nul().last(), Some(&0));
        let capacity = self.buffer.capacity();
        let minimal = (self.buffer.len() + 1).max(MIN_CAPACITY);
        assert!(capacity.is_power_of_two());
        assert!(capacity >= minimal && capacity < 2 * minimal);
        assert!(capacity <= self.buffer.limits().max_capacity());
    }
}

fuzz_target!(|case: DynBufCase| {
    let bounded = BufferLimits::new(4096).expect("4 KiB 是合法上限");
    let mut slots = [
        Slot {
            buffer: DynBuffer::new(),
            model: Vec::new(),
        },
        Slot {
            buffer: DynBuffer::with_limits(bounded),
            model: Vec::new(),
        },
    ];

    for op in case.ops {
        match op {
            BufferOp::Raw { target, bytes } => {
                let slot = &mut slots[target as usize];
                if slot.buffer.append_raw(&bytes).is_ok() {
                    slot.model.extend_from_slice(&bytes);
                }
            }
            BufferOp::Byte { target, byte } => {
                let slot = &mut slots[target as usize];
                if slot.buffer.append_byte(byte).is_ok() {
                    slot.model.push(byte);
                }
            }
            BufferOp::Prepend { target, bytes } => {
                let slot = &mut slots[target as usize];
                if slot.buffer.prepend(&bytes).is_ok() {
                    slot.model = [bytes.as_slice(), slot.model.as_slice()].concat();
                }
            }
            BufferOp::Truncate { target, maxlen } => {
                let slot = &mut slots[target as usize];
                slot.buffer.truncate(usize::from(maxlen));
                slot.model.truncate(usize::from(maxlen));
            }
            BufferOp::Set { target, bytes } => {
                let slot = &mut slots[target as usize];
                if slot.buffer.set(bytes.as_deref()).is_ok() {
                    slot.model = bytes.unwrap_or_default();
                }
            }
            BufferOp::Format {
                target,
                value,
                width,
            } => {
                let slot = &mut slots[target as usize];
                let width = usize::from(width);
                if slot
                    .buffer
                    .append_formatted(format_args!("{value:>width$}"))
                    .is_ok()
                {
                    slot.model
                        .extend_from_slice(format!("{value:>width$}").as_bytes());
                }
            }
            BufferOp::Concat { target } => {
                let [first, second] = &mut slots;
                let (dst, src) = if target {
                    (second, &*first)
                } else {
                    (first, &*second)
                };
                if dst.buffer.concat(Some(&src.buffer)).is_ok() {
                    dst.model.extend_from_slice(&src.model);
                }
            }
        }
        for slot in &slots {
            slot.check();
        }
    }
});
