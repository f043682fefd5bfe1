#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::engine::mode::SystemMode;

/// Commands from the control path (UI, MIDI input) to the timing path.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    NoteOff { channel: u8, pitch: u8 },
    /// Release a slot directly by index.
    ReleaseSlot { index: usize },
    AllNotesOff,
    SetMode(SystemMode),
    SetPulseWidth { width_us: u32 },
    SetPulsePeriod { period_us: u32 },
    SetBend(bool),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}

impl MessageReceiver for std::collections::VecDeque<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        self.pop_front()
    }
}
