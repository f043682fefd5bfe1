//! The interrupter core: mode policy, pulse timing and the context object
//! that owns all of it.
//!
//! [`Interrupter`] is the single owner of the voice table and the entropy
//! source. Whoever holds it is the timing path; everyone else talks to it
//! through [`ControlMessage`]s and reads it through [`Snapshot`]s. That keeps
//! one writer per resource without locks.

pub mod mode;
pub mod policy;
pub mod scheduler;

use crate::{
    clock::Clock,
    config::InterrupterConfig,
    rng::EntropySource,
    synth::{
        message::{ControlMessage, MessageReceiver},
        Voice, VoiceTable,
    },
    NOTE_ARRAY_SIZE,
};

use self::{
    mode::SystemMode,
    policy::PulsePolicy,
    scheduler::{Pulse, Scheduler},
};

/// Read-only copy of the interrupter state, cheap to hand across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<const N: usize = NOTE_ARRAY_SIZE> {
    pub mode: SystemMode,
    pub pulse_width_us: u32,
    pub pulse_period_us: u32,
    /// Most recent free-running period, after bend.
    pub last_period_us: u32,
    pub bend_enabled: bool,
    pub voices: [Voice; N],
    pub dropped_notes: u32,
    pub pulses_fired: u64,
    pub firing: bool,
}

pub struct Interrupter<C: Clock, const N: usize = NOTE_ARRAY_SIZE> {
    clock: C,
    voices: VoiceTable<N>,
    rng: EntropySource,
    policy: PulsePolicy,
    scheduler: Scheduler,
    dropped_notes: u32,
}

impl<C: Clock, const N: usize> Interrupter<C, N> {
    /// Power-on: seed the entropy source from the clock's uptime and start
    /// with every slot empty.
    pub fn new(config: &InterrupterConfig, clock: C) -> Self {
        let seed_ms = clock.millis();
        Self::with_seed(config, clock, seed_ms)
    }

    /// Like [`new`](Self::new), but seeds the entropy source from `seed_ms`
    /// instead of the clock. For timing clocks that always start at zero.
    pub fn with_seed(config: &InterrupterConfig, clock: C, seed_ms: u64) -> Self {
        let rng = EntropySource::new(config.rng, seed_ms);
        log::debug!(
            "interrupter up: {} voices, mode {:?}, rng {:?}, seed {}ms",
            N,
            config.mode,
            config.rng,
            seed_ms
        );

        Self {
            clock,
            voices: VoiceTable::new(),
            rng,
            policy: PulsePolicy::new(config),
            scheduler: Scheduler::new(),
            dropped_notes: 0,
        }
    }

    pub fn handle_message(&mut self, msg: ControlMessage) {
        match msg {
            ControlMessage::NoteOn {
                channel,
                pitch,
                velocity,
            } => {
                self.note_on(channel, pitch, velocity);
            }
            ControlMessage::NoteOff { channel, pitch } => {
                self.note_off(channel, pitch);
            }
            ControlMessage::ReleaseSlot { index } => self.release_slot(index),
            ControlMessage::AllNotesOff => self.all_notes_off(),
            ControlMessage::SetMode(mode) => self.set_mode(mode),
            ControlMessage::SetPulseWidth { width_us } => self.policy.set_pulse_width_us(width_us),
            ControlMessage::SetPulsePeriod { period_us } => {
                self.policy.set_pulse_period_us(period_us);
                self.scheduler.replan();
            }
            ControlMessage::SetBend(enabled) => self.policy.set_bend_enabled(enabled),
        }
    }

    /// Apply every queued control message. Returns how many were applied.
    pub fn drain<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) -> usize {
        let mut applied = 0;
        while let Some(msg) = rx.pop() {
            self.handle_message(msg);
            applied += 1;
        }
        applied
    }

    /// Start a note. Ignored outside the MIDI modes; dropped (and counted)
    /// when every slot is busy. Velocity 0 is treated as a note-off.
    pub fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8) -> Option<usize> {
        if velocity == 0 {
            self.note_off(channel, pitch);
            return None;
        }
        if !self.policy.mode().is_midi() {
            return None;
        }

        match self.voices.allocate(channel, pitch, velocity, &self.clock) {
            Some(index) => {
                self.scheduler.replan();
                Some(index)
            }
            None => {
                self.dropped_notes = self.dropped_notes.wrapping_add(1);
                None
            }
        }
    }

    pub fn note_off(&mut self, channel: u8, pitch: u8) -> Option<usize> {
        let index = self.voices.release_note(channel, pitch)?;
        self.scheduler.replan();
        Some(index)
    }

    pub fn release_slot(&mut self, index: usize) {
        self.voices.release(index);
        self.scheduler.replan();
    }

    pub fn all_notes_off(&mut self) {
        self.voices.release_all();
        self.scheduler.replan();
    }

    /// Switch modes. Any sounding voices are released so nothing hangs across
    /// the switch.
    pub fn set_mode(&mut self, mode: SystemMode) {
        if mode == self.policy.mode() {
            return;
        }
        self.voices.release_all();
        self.policy.set_mode(mode);
        self.scheduler.reset();
    }

    /// Run the timing path at the clock's current time.
    pub fn tick(&mut self) -> Option<Pulse> {
        let now_us = self.clock.micros();
        self.scheduler
            .poll(now_us, &self.voices, &mut self.policy, &mut self.rng)
    }

    /// Output level after the last [`tick`](Self::tick).
    pub fn is_firing(&self) -> bool {
        self.scheduler.is_firing()
    }

    pub fn snapshot(&self) -> Snapshot<N> {
        Snapshot {
            mode: self.policy.mode(),
            pulse_width_us: self.policy.pulse_width_us(),
            pulse_period_us: self.policy.pulse_period_us(),
            last_period_us: self.policy.last_period_us(),
            bend_enabled: self.policy.bend().enabled,
            voices: self.voices.snapshot(),
            dropped_notes: self.dropped_notes,
            pulses_fired: self.scheduler.pulses_fired(),
            firing: self.scheduler.is_firing(),
        }
    }

    pub fn mode(&self) -> SystemMode {
        self.policy.mode()
    }

    pub fn voices(&self) -> &VoiceTable<N> {
        &self.voices
    }

    pub fn policy(&self) -> &PulsePolicy {
        &self.policy
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn entropy(&self) -> &EntropySource {
        &self.rng
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn dropped_notes(&self) -> u32 {
        self.dropped_notes
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::clock::ManualClock;

    fn midi_interrupter() -> Interrupter<ManualClock, 4> {
        let config = InterrupterConfig {
            mode: SystemMode::MidiUsb,
            ..InterrupterConfig::default()
        };
        Interrupter::new(&config, ManualClock::new(0))
    }

    #[test]
    fn notes_ignored_in_frequency_modes() {
        let mut coil: Interrupter<ManualClock, 4> =
            Interrupter::new(&InterrupterConfig::default(), ManualClock::new(0));
        assert_eq!(coil.note_on(0, 60, 100), None);
        assert_eq!(coil.voices().active_count(), 0);
        assert_eq!(coil.dropped_notes(), 0);
    }

    #[test]
    fn full_table_drops_and_counts() {
        let mut coil = midi_interrupter();
        for pitch in 60..64 {
            assert!(coil.note_on(0, pitch, 100).is_some());
        }
        assert_eq!(coil.note_on(0, 64, 100), None);
        assert_eq!(coil.note_on(0, 65, 100), None);
        assert_eq!(coil.dropped_notes(), 2);
        assert_eq!(coil.voices().active_count(), 4);
    }

    #[test]
    fn zero_velocity_releases() {
        let mut coil = midi_interrupter();
        coil.note_on(2, 60, 100);
        assert_eq!(coil.note_on(2, 60, 0), None);
        assert_eq!(coil.voices().active_count(), 0);
    }

    #[test]
    fn mode_switch_clears_voices() {
        let mut coil = midi_interrupter();
        coil.note_on(0, 60, 100);
        coil.note_on(0, 64, 100);

        coil.set_mode(SystemMode::FreqFixed);
        assert_eq!(coil.mode(), SystemMode::FreqFixed);
        assert!(coil.voices().iter().all(Voice::is_empty));
    }

    #[test]
    fn drain_applies_queue_in_order() {
        let mut coil = midi_interrupter();
        let mut queue: VecDeque<ControlMessage> = VecDeque::from([
            ControlMessage::NoteOn {
                channel: 0,
                pitch: 60,
                velocity: 100,
            },
            ControlMessage::NoteOn {
                channel: 0,
                pitch: 64,
                velocity: 100,
            },
            ControlMessage::NoteOff {
                channel: 0,
                pitch: 60,
            },
            ControlMessage::SetPulseWidth { width_us: 75 },
            ControlMessage::SetBend(true),
        ]);

        assert_eq!(coil.drain(&mut queue), 5);
        assert!(queue.is_empty());

        let snapshot = coil.snapshot();
        assert_eq!(snapshot.voices[0], Voice::Empty);
        assert_eq!(snapshot.voices[1].pitch_raw(), 64);
        assert_eq!(snapshot.pulse_width_us, 75);
        assert!(snapshot.bend_enabled);
    }

    #[test]
    fn tick_follows_clock() {
        let mut coil = midi_interrupter();
        coil.clock().set_micros(5_000);
        coil.note_on(0, 69, 100);

        let pulse = coil.tick().expect("note-on instant fires");
        assert_eq!(pulse.start_us, 5_000);
        assert!(coil.is_firing());

        coil.clock().advance_micros(u64::from(pulse.width_us));
        assert_eq!(coil.tick(), None);
        assert!(!coil.is_firing());
        assert_eq!(coil.snapshot().pulses_fired, 1);
    }

    #[test]
    fn seed_time_picks_the_jitter_stream() {
        let config = InterrupterConfig::default();
        let from_clock: Interrupter<ManualClock, 4> =
            Interrupter::new(&config, ManualClock::new(7_000));
        let seeded: Interrupter<ManualClock, 4> =
            Interrupter::with_seed(&config, ManualClock::new(0), 7);
        let other: Interrupter<ManualClock, 4> =
            Interrupter::with_seed(&config, ManualClock::new(0), 8);

        assert_eq!(from_clock.entropy().state(), seeded.entropy().state());
        assert_ne!(seeded.entropy().state(), other.entropy().state());
        assert_eq!(seeded.clock().micros(), 0);
    }
}
