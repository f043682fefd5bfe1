use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF},
    synth::message::ControlMessage,
};

/// Map a decoded MIDI event onto the interrupter's control vocabulary.
///
/// `channel_filter` of `None` listens on every channel (omni).
pub fn midi_to_control(midi: MidiEvent, channel_filter: Option<u8>) -> Option<ControlMessage> {
    if channel_filter.is_some_and(|wanted| wanted != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } => Some(ControlMessage::NoteOn {
            channel,
            pitch: key,
            velocity,
        }),
        MidiEvent::NoteOff { channel, key, .. } => Some(ControlMessage::NoteOff {
            channel,
            pitch: key,
        }),
        MidiEvent::ControlChange { controller, .. }
            if controller == CC_ALL_NOTES_OFF || controller == CC_ALL_SOUND_OFF =>
        {
            Some(ControlMessage::AllNotesOff)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_channel() {
        let event = MidiEvent::NoteOn {
            channel: 2,
            key: 60,
            velocity: 90,
        };
        assert_eq!(midi_to_control(event, Some(1)), None);
        assert_eq!(
            midi_to_control(event, Some(2)),
            Some(ControlMessage::NoteOn {
                channel: 2,
                pitch: 60,
                velocity: 90
            })
        );
        assert!(midi_to_control(event, None).is_some());
    }

    #[test]
    fn all_notes_off_controller() {
        let event = MidiEvent::ControlChange {
            channel: 0,
            controller: CC_ALL_NOTES_OFF,
            value: 0,
        };
        assert_eq!(midi_to_control(event, None), Some(ControlMessage::AllNotesOff));

        let modwheel = MidiEvent::ControlChange {
            channel: 0,
            controller: 1,
            value: 64,
        };
        assert_eq!(midi_to_control(modwheel, None), None);
    }

    #[test]
    fn note_off_keeps_channel() {
        let event = MidiEvent::NoteOff {
            channel: 9,
            key: 38,
            velocity: 64,
        };
        assert_eq!(
            midi_to_control(event, Some(9)),
            Some(ControlMessage::NoteOff {
                channel: 9,
                pitch: 38
            })
        );
    }
}
