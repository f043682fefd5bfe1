//! Time sources for the interrupter core.
//!
//! The core never reads a hardware timer directly. Everything that needs "now"
//! goes through [`Clock`], so the timing path can run off a sample counter in
//! the host binary and off a hand-advanced clock in tests.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic microsecond/millisecond time source.
pub trait Clock {
    /// Fine timestamp used for pulse deadlines and voice phase.
    fn micros(&self) -> u64;

    /// Coarse timestamp used for voice start times, RNG seeding and display
    /// debouncing.
    fn millis(&self) -> u64 {
        self.micros() / 1_000
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn micros(&self) -> u64 {
        (**self).micros()
    }

    fn millis(&self) -> u64 {
        (**self).millis()
    }
}

/// Wall-clock uptime measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    boot: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            boot: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn micros(&self) -> u64 {
        self.boot.elapsed().as_micros() as u64
    }
}

/// Clock that only moves when told to.
///
/// The host binary drives one of these from the audio callback's frame
/// counter; tests drive it by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_us: Cell<u64>,
}

impl ManualClock {
    pub fn new(now_us: u64) -> Self {
        Self {
            now_us: Cell::new(now_us),
        }
    }

    pub fn set_micros(&self, now_us: u64) {
        self.now_us.set(now_us);
    }

    pub fn advance_micros(&self, delta_us: u64) {
        self.now_us.set(self.now_us.get().saturating_add(delta_us));
    }

    pub fn advance_millis(&self, delta_ms: u64) {
        self.advance_micros(delta_ms.saturating_mul(1_000));
    }
}

impl Clock for ManualClock {
    fn micros(&self) -> u64 {
        self.now_us.get()
    }
}
