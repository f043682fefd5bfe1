//! Benchmarks for the interrupter core.
//!
//! Run with: cargo bench
//!
//! The host binary ticks the core once per audio frame, so a block of ticks
//! has to finish well inside the callback deadline.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 frames  = 1.33ms deadline
//!   - 256 frames = 5.33ms deadline
//!   - 512 frames = 10.67ms deadline
//!
//! Benchmark groups:
//!   - core/entropy  Byte and word draws per variant
//!   - core/voices   Allocation, release, lookup
//!   - core/timing   Scheduler ticks per mode

use criterion::{criterion_group, criterion_main};

mod hot_path;

/// Ticks per benchmarked block, matching common audio buffer sizes.
pub const BLOCK_SIZES: &[usize] = &[64, 256, 512];

criterion_group!(
    benches,
    hot_path::bench_entropy,
    hot_path::bench_voices,
    hot_path::bench_timing,
);
criterion_main!(benches);
