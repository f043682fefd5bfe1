pub mod clock;
pub mod config;
pub mod display; // Two-line status display adapter
pub mod engine; // Mode policy, pulse timing, the interrupter context
pub mod io;
pub mod rng; // Entropy for bend/pink jitter
pub mod synth; // Voice table and allocation

/// Number of voices the interrupter can multiplex at once.
pub const NOTE_ARRAY_SIZE: usize = 6;

/// Floor for free-running periods (10 kHz): the setpoint and every bent
/// period are clamped to it. MIDI voices use their table period unchanged,
/// which goes down to 80us at the top of the range.
pub const MIN_PERIOD_US: u32 = 100;
