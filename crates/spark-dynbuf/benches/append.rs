use criterion::{Criterion, black_box};
use spark_dynbuf::DynBuffer;
use std::{env, time::Duration};

/// 追加路径基准：观察容量阶梯在高频小写入下的摊销成本。
///
/// # 设计背景（Why）
/// - 逐字节追加与格式化追加是最常见的两种写入方式，二者都会沿阶梯多次扩容；
/// - 与 `Vec<u8>` 的同等写入对比，便于发现阶梯计算或零终止维护带来的回归。
fn bench_append(c: &mut Criterion) {
    c.bench_function("dynbuf_append_byte_4k", |b| {
        b.iter(|| {
            let mut buffer = DynBuffer::new();
            for i in 0..4096u32 {
                buffer.append_byte(i as u8 | 1).unwrap();
            }
            black_box(buffer.len())
        });
    });

    c.bench_function("dynbuf_append_formatted_1k", |b| {
        b.iter(|| {
            let mut buffer = DynBuffer::new();
            for i in 0..1024u32 {
                buffer.append_formatted(format_args!("{i:>6},")).unwrap();
            }
            black_box(buffer.len())
        });
    });

    c.bench_function("vec_push_4k_baseline", |b| {
        b.iter(|| {
            let mut vec = Vec::new();
            for i in 0..4096u32 {
                vec.push(i as u8 | 1);
            }
            black_box(vec.len())
        });
    });
}

fn bench_prepend(c: &mut Criterion) {
    c.bench_function("dynbuf_prepend_256", |b| {
        b.iter(|| {
            let mut buffer = DynBuffer::new();
            for _ in 0..256 {
                buffer.prepend(b"head:").unwrap();
            }
            black_box(buffer.len())
        });
    });
}

fn main() {
    let mut quick_mode = false;
    for arg in env::args().skip(1) {
        if arg == "--quick" {
            quick_mode = true;
        }
    }

    let mut criterion = Criterion::default();
    if quick_mode {
        criterion = criterion
            .sample_size(10)
            .warm_up_time(Duration::from_millis(100))
            .measurement_time(Duration::from_millis(250));
    }

    bench_append(&mut criterion);
    bench_prepend(&mut criterion);
    criterion.final_summary();
}
