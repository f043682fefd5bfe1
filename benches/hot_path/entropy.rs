//! Benchmarks for entropy draws.

use std::hint::black_box;

use coil_interrupter::rng::{EntropySource, RngVariant};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_entropy(c: &mut Criterion) {
    let mut group = c.benchmark_group("core/entropy");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0u8; size];

        // Stretched - one permutation per four bytes
        let mut rng = EntropySource::new(RngVariant::Stretched, 1_000);
        group.bench_with_input(BenchmarkId::new("stretched_bytes", size), &size, |b, _| {
            b.iter(|| {
                for byte in buffer.iter_mut() {
                    *byte = rng.next_byte();
                }
                black_box(&buffer);
            })
        });

        // Plain - permutation on every byte
        let mut rng = EntropySource::new(RngVariant::Plain, 1_000);
        group.bench_with_input(BenchmarkId::new("plain_bytes", size), &size, |b, _| {
            b.iter(|| {
                for byte in buffer.iter_mut() {
                    *byte = rng.next_byte();
                }
                black_box(&buffer);
            })
        });
    }

    let mut rng = EntropySource::new(RngVariant::Stretched, 1_000);
    group.bench_function("stretched_u32", |b| b.iter(|| black_box(rng.next_u32())));

    group.finish();
}
