/// Channel voice messages the interrupter understands.
///
/// Anything else on the wire (program change, pitch bend, aftertouch, system
/// messages) decodes to `None` and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

/// Controller number for "All Notes Off".
pub const CC_ALL_NOTES_OFF: u8 = 123;
/// Controller number for "All Sound Off".
pub const CC_ALL_SOUND_OFF: u8 = 120;

impl MidiEvent {
    /// Decode one complete channel message.
    ///
    /// A note-on with velocity 0 is reported as a note-off, which is how most
    /// keyboards send releases under running status.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status & 0x80 == 0 {
            return None;
        }

        let channel = status & 0x0F;
        let data1 = data.first().map(|b| b & 0x7F);
        let data2 = data.get(1).map(|b| b & 0x7F);

        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data1?,
                velocity: data2?,
            }),
            0x90 => {
                let (key, velocity) = (data1?, data2?);
                if velocity == 0 {
                    Some(MidiEvent::NoteOff {
                        channel,
                        key,
                        velocity: 0,
                    })
                } else {
                    Some(MidiEvent::NoteOn {
                        channel,
                        key,
                        velocity,
                    })
                }
            }
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data1?,
                value: data2?,
            }),
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. } => channel,
        }
    }
}
