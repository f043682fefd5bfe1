#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What drives the interrupter. Exactly one mode is active at a time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemMode {
    /// Notes from the USB MIDI port.
    MidiUsb,
    /// Notes from the 5-pin DIN jack.
    MidiJack,
    /// Free-running at the manual period setpoint.
    #[default]
    FreqFixed,
    /// Free-running with entropy jitter on every period.
    FreqPink,
}

impl SystemMode {
    pub const ALL: [SystemMode; 4] = [
        SystemMode::MidiUsb,
        SystemMode::MidiJack,
        SystemMode::FreqFixed,
        SystemMode::FreqPink,
    ];

    pub fn is_midi(self) -> bool {
        matches!(self, SystemMode::MidiUsb | SystemMode::MidiJack)
    }

    pub fn is_frequency(self) -> bool {
        !self.is_midi()
    }

    /// Mode selector order, wrapping.
    pub fn next(self) -> Self {
        match self {
            SystemMode::MidiUsb => SystemMode::MidiJack,
            SystemMode::MidiJack => SystemMode::FreqFixed,
            SystemMode::FreqFixed => SystemMode::FreqPink,
            SystemMode::FreqPink => SystemMode::MidiUsb,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SystemMode::MidiUsb => "MIDI USB",
            SystemMode::MidiJack => "MIDI JACK",
            SystemMode::FreqFixed => "FIXED",
            SystemMode::FreqPink => "PINK",
        }
    }
}
