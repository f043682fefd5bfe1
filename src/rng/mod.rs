//! Entropy for bend and pink-noise jitter.
//!
//! A fast, reproducible xorshift generator. It is seeded from uptime so runs
//! differ, but it is not unpredictable and must never be used for anything
//! that needs real randomness.

/// Xorshift32 permutation and the byte-stretching entropy source.
pub mod xorshift;

pub use xorshift::{xorshift32, EntropySource, RngVariant, RNG_MAGIC};
