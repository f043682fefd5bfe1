use crate::io::period_table::period_us;

/// Raw pitch value reported for an empty slot.
///
/// Never a valid MIDI pitch, so it can't collide with a real note.
pub const EMPTY_PITCH: u8 = 255;

/// Timing state of one sounding note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub channel: u8,
    pub pitch: u8,
    pub velocity: u8,
    /// Fixed per-pitch period, looked up once at assignment.
    pub period_us: u32,
    /// Offset inside the period at which this voice fires. Always
    /// `< period_us`.
    pub phase_us: u32,
    pub start_ms: u64,
}

impl Note {
    /// Start a note at `now_us`/`now_ms`.
    ///
    /// The phase is captured from the running clock so the voice's first pulse
    /// lands on the note-on instant and later pulses stay on that grid.
    pub fn start(channel: u8, pitch: u8, velocity: u8, now_us: u64, now_ms: u64) -> Self {
        let period_us = period_us(pitch);
        Self {
            channel,
            pitch,
            velocity,
            period_us,
            phase_us: (now_us % u64::from(period_us)) as u32,
            start_ms: now_ms,
        }
    }

    /// First instant `>= from_us` at which this voice fires.
    pub fn next_fire_us(&self, from_us: u64) -> u64 {
        let period = u64::from(self.period_us);
        let phase = u64::from(self.phase_us);
        let wait = (phase + period - from_us % period) % period;
        from_us + wait
    }
}

/// One polyphonic slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Voice {
    #[default]
    Empty,
    Active(Note),
}

impl Voice {
    pub fn is_empty(&self) -> bool {
        matches!(self, Voice::Empty)
    }

    pub fn note(&self) -> Option<&Note> {
        match self {
            Voice::Empty => None,
            Voice::Active(note) => Some(note),
        }
    }

    /// Pitch as the display and diagnostics see it: [`EMPTY_PITCH`] when empty.
    pub fn pitch_raw(&self) -> u8 {
        self.note().map_or(EMPTY_PITCH, |n| n.pitch)
    }

    /// Velocity, 0 when empty.
    pub fn velocity(&self) -> u8 {
        self.note().map_or(0, |n| n.velocity)
    }

    pub fn channel(&self) -> u8 {
        self.note().map_or(0, |n| n.channel)
    }

    /// Period of the slot; an empty slot reports the pitch-0 period.
    pub fn period_us(&self) -> u32 {
        self.note().map_or_else(|| period_us(0), |n| n.period_us)
    }

    pub fn phase_us(&self) -> u32 {
        self.note().map_or(0, |n| n.phase_us)
    }

    pub fn start_ms(&self) -> u64 {
        self.note().map_or(0, |n| n.start_ms)
    }
}
