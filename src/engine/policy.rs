#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::InterrupterConfig, engine::mode::SystemMode, rng::EntropySource, MIN_PERIOD_US,
};

/*
Pulse Period Policy
===================

In the frequency modes a single setpoint decides how often the coil fires.
"Bend" nudges that setpoint before every pulse using bytes from the entropy
source, which gives the arc a rough, noisy character instead of a pure tone.

Uniform bend
------------

One byte per pulse, centred on 128:

    offset = (byte - 128) * depth / 128        range [-depth, +depth)

Pink bend
---------

Voss-McCartney: four rows of random bytes, summed. Row k is redrawn every 2^k
pulses (the row is picked by the trailing zeros of a pulse counter), so low
rows wander fast and high rows wander slowly. The sum is centred and scaled to
the same +/- depth window as the uniform shape.

    pulse:   1  2  3  4  5  6  7  8
    row 0:   x     x     x     x
    row 1:      x           x
    row 2:            x
    row 3:                        x

Clamp
-----

Depth is user-configurable and may exceed the base period. Whatever comes out
is clamped to MIN_PERIOD_US, so the timing path never sees a zero or negative
period.

MIDI modes don't use the setpoint at all: every active voice brings its own
period and the scheduler interleaves them.
*/

const PINK_ROWS: usize = 4;
const PINK_CENTRE: i64 = (PINK_ROWS as i64 * 255) / 2;

/// Shape of the jitter applied when bend is active.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JitterShape {
    #[default]
    Uniform,
    Pink,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BendConfig {
    /// Jitter the fixed-frequency mode. Pink mode always jitters.
    pub enabled: bool,
    /// Maximum deviation from the setpoint, in microseconds.
    pub depth_us: u32,
    /// Shape used by the fixed-frequency mode.
    pub shape: JitterShape,
}

impl Default for BendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            depth_us: 1_000,
            shape: JitterShape::Uniform,
        }
    }
}

/// Clamp a signed period candidate into `[MIN_PERIOD_US, u32::MAX]`.
#[inline]
pub fn clamp_period(period_us: i64) -> u32 {
    period_us.clamp(i64::from(MIN_PERIOD_US), i64::from(u32::MAX)) as u32
}

/// Uniform bend of `base_us` by one entropy byte.
#[inline]
pub fn bend_period(base_us: u32, depth_us: u32, byte: u8) -> u32 {
    let offset = (i64::from(byte) - 128) * i64::from(depth_us) / 128;
    clamp_period(i64::from(base_us) + offset)
}

#[derive(Debug, Clone)]
struct PinkRows {
    rows: [u8; PINK_ROWS],
    counter: u32,
    primed: bool,
}

impl PinkRows {
    fn new() -> Self {
        Self {
            rows: [0; PINK_ROWS],
            counter: 0,
            primed: false,
        }
    }

    fn next_offset(&mut self, depth_us: u32, rng: &mut EntropySource) -> i64 {
        if self.primed {
            self.counter = self.counter.wrapping_add(1);
            let row = (self.counter.trailing_zeros() as usize).min(PINK_ROWS - 1);
            self.rows[row] = rng.next_byte();
        } else {
            for row in &mut self.rows {
                *row = rng.next_byte();
            }
            self.primed = true;
        }

        let sum: i64 = self.rows.iter().copied().map(i64::from).sum();
        (sum - PINK_CENTRE) * i64::from(depth_us) / PINK_CENTRE
    }
}

/// Decides the output period and pulse width from the current mode and
/// setpoints.
#[derive(Debug, Clone)]
pub struct PulsePolicy {
    mode: SystemMode,
    pulse_width_us: u32,
    pulse_period_us: u32,
    bend: BendConfig,
    pink: PinkRows,
    last_period_us: u32,
}

impl PulsePolicy {
    pub fn new(config: &InterrupterConfig) -> Self {
        let pulse_period_us = config.pulse_period_us.max(MIN_PERIOD_US);
        Self {
            mode: config.mode,
            pulse_width_us: config.pulse_width_us.max(1),
            pulse_period_us,
            bend: config.bend,
            pink: PinkRows::new(),
            last_period_us: pulse_period_us,
        }
    }

    pub fn mode(&self) -> SystemMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SystemMode) {
        self.mode = mode;
    }

    pub fn pulse_width_us(&self) -> u32 {
        self.pulse_width_us
    }

    pub fn set_pulse_width_us(&mut self, width_us: u32) {
        self.pulse_width_us = width_us.max(1);
    }

    pub fn pulse_period_us(&self) -> u32 {
        self.pulse_period_us
    }

    pub fn set_pulse_period_us(&mut self, period_us: u32) {
        self.pulse_period_us = period_us.max(MIN_PERIOD_US);
    }

    pub fn bend(&self) -> BendConfig {
        self.bend
    }

    pub fn set_bend_enabled(&mut self, enabled: bool) {
        self.bend.enabled = enabled;
    }

    /// Shape of the jitter the current mode applies, if any.
    pub fn jitter_shape(&self) -> Option<JitterShape> {
        match self.mode {
            SystemMode::FreqPink => Some(JitterShape::Pink),
            SystemMode::FreqFixed if self.bend.enabled => Some(self.bend.shape),
            _ => None,
        }
    }

    /// Period until the next free-running pulse. Draws entropy only when
    /// jitter is active.
    pub fn next_period_us(&mut self, rng: &mut EntropySource) -> u32 {
        let base = self.pulse_period_us;
        let period = match self.jitter_shape() {
            None => base,
            Some(JitterShape::Uniform) => bend_period(base, self.bend.depth_us, rng.next_byte()),
            Some(JitterShape::Pink) => {
                let offset = self.pink.next_offset(self.bend.depth_us, rng);
                clamp_period(i64::from(base) + offset)
            }
        };
        self.last_period_us = period;
        period
    }

    /// Most recent free-running period handed to the scheduler.
    pub fn last_period_us(&self) -> u32 {
        self.last_period_us
    }

    /// On-time for a pulse inside a period of `period_us`.
    ///
    /// Capped at half the period so the output can never latch on.
    pub fn pulse_width_for(&self, period_us: u32) -> u32 {
        self.pulse_width_us.min(period_us / 2).max(1)
    }
}
