//! 有界且可测量的格式化写入器。
//!
//! # 设计动机（Why）
//! - 格式化追加需要“直接写进剩余空间，同时报告完整输出所需长度”的原语，
//!   才能在空间不足时按精确长度扩容后重试；
//! - `core::fmt::Write` 本身不报告长度，因此由 [`MeasuredWriter`] 在写入时同步计数。
//!
//! # 契约说明（What）
//! - 写入不超过目标切片长度，超出部分被丢弃但仍计入 `required`；
//! - `fmt::Error` 只可能来自被格式化值自身的实现，写入器本身从不失败。

use core::fmt::{self, Write};

/// 一次格式化尝试的结果。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Measured {
    /// 完整输出所需的字节数（可能大于实际写入量）。
    Required(usize),
    /// 值的格式化实现报告了错误。
    Failed,
}

/// 向借用切片写入并统计完整长度的写入器。
pub(crate) struct MeasuredWriter<'a> {
    buf: &'a mut [u8],
    required: usize,
}

impl<'a> MeasuredWriter<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, required: 0 }
    }

    /// 对 `args` 做一次完整格式化尝试。
    pub(crate) fn measure(buf: &'a mut [u8], args: fmt::Arguments<'_>) -> Measured {
        let mut writer = Self::new(buf);
        match writer.write_fmt(args) {
            Ok(()) => Measured::Required(writer.required),
            Err(fmt::Error) => Measured::Failed,
        }
    }
}

impl Write for MeasuredWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let start = self.required.min(self.buf.len());
        let room = self.buf.len() - start;
        let n = bytes.len().min(room);
        self.buf[start..start + n].copy_from_slice(&bytes[..n]);
        self.required = self.required.saturating_add(bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("part")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn fits_entirely() {
        let mut buf = [0u8; 16];
        let measured = MeasuredWriter::measure(&mut buf, format_args!("{}-{}", 12, "ab"));
        assert_eq!(measured, Measured::Required(5));
        assert_eq!(&buf[..5], b"12-ab");
    }

    #[test]
    fn truncates_but_reports_full_length() {
        let mut buf = [0u8; 4];
        let measured = MeasuredWriter::measure(&mut buf, format_args!("hello {}", "world"));
        assert_eq!(measured, Measured::Required(11));
        assert_eq!(&buf, b"hell");
    }

    #[test]
    fn zero_sized_target_still_measures() {
        let mut buf = [0u8; 0];
        let measured = MeasuredWriter::measure(&mut buf, format_args!("{:>8}", 1));
        assert_eq!(measured, Measured::Required(8));
    }

    #[test]
    fn formatter_error_is_surfaced() {
        let mut buf = [0u8; 16];
        assert_eq!(
            MeasuredWriter::measure(&mut buf, format_args!("{}", Broken)),
            Measured::Failed
        );
    }
}
