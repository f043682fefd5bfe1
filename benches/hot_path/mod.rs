//! Benchmarks for the per-frame hot path.

mod entropy;
mod timing;
mod voices;

pub use entropy::bench_entropy;
pub use timing::bench_timing;
pub use voices::bench_voices;
