#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::{
    display::{DisplayLayout, ReadoutUnit},
    engine::{mode::SystemMode, policy::BendConfig},
    rng::RngVariant,
    MIN_PERIOD_US,
};

/// Everything the firmware used to pick at compile time, as one value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterrupterConfig {
    pub mode: SystemMode,
    /// On-time of each pulse.
    pub pulse_width_us: u32,
    /// Free-running period for the frequency modes.
    pub pulse_period_us: u32,
    pub bend: BendConfig,
    pub readout: ReadoutUnit,
    pub layout: DisplayLayout,
    /// Minimum interval between bottom-line refreshes.
    pub display_refresh_ms: u64,
    pub rng: RngVariant,
    /// Only accept MIDI on this channel (0-15). `None` listens to all.
    pub midi_channel: Option<u8>,
}

impl Default for InterrupterConfig {
    fn default() -> Self {
        Self {
            mode: SystemMode::FreqFixed,
            pulse_width_us: 50,
            pulse_period_us: 10_000,
            bend: BendConfig::default(),
            readout: ReadoutUnit::Hz,
            layout: DisplayLayout::Interocitor,
            display_refresh_ms: 250,
            rng: RngVariant::Stretched,
            midi_channel: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroPulseWidth,
    PeriodTooShort { period_us: u32 },
    WidthExceedsPeriod { width_us: u32, period_us: u32 },
    InvalidMidiChannel(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPulseWidth => write!(f, "pulse width must be at least 1us"),
            ConfigError::PeriodTooShort { period_us } => write!(
                f,
                "pulse period {period_us}us is below the {MIN_PERIOD_US}us floor"
            ),
            ConfigError::WidthExceedsPeriod {
                width_us,
                period_us,
            } => write!(
                f,
                "pulse width {width_us}us must be under half the {period_us}us period"
            ),
            ConfigError::InvalidMidiChannel(channel) => {
                write!(f, "MIDI channel {channel} is out of range (0-15)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl InterrupterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pulse_width_us == 0 {
            return Err(ConfigError::ZeroPulseWidth);
        }
        if self.pulse_period_us < MIN_PERIOD_US {
            return Err(ConfigError::PeriodTooShort {
                period_us: self.pulse_period_us,
            });
        }
        if self.pulse_width_us > self.pulse_period_us / 2 {
            return Err(ConfigError::WidthExceedsPeriod {
                width_us: self.pulse_width_us,
                period_us: self.pulse_period_us,
            });
        }
        if let Some(channel) = self.midi_channel.filter(|&c| c > 15) {
            return Err(ConfigError::InvalidMidiChannel(channel));
        }
        Ok(())
    }
}
