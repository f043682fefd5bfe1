use crate::{engine::policy::PulsePolicy, rng::EntropySource, synth::VoiceTable};

/// Timing path state.
///
///   Next  -> pick the next deadline (nothing to do: stay here)
///   Wait  -> deadline reached: fire
///   Pulse -> on-time elapsed: back to Next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    Next,
    Wait,
    Pulse,
}

/// A pulse the timing path has just started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub start_us: u64,
    pub width_us: u32,
    /// Period this pulse belongs to: the voice's period in MIDI modes, the
    /// (possibly bent) setpoint in frequency modes.
    pub period_us: u32,
}

/// Decides when the coil fires and for how long.
///
/// The scheduler only reads the voice table. In MIDI modes every active
/// voice fires on its own grid (`t % period == phase`) and the scheduler
/// always chases the earliest upcoming one, so all voices interleave on one
/// output. A voice whose slot comes due while another pulse is still on is
/// absorbed into that pulse.
///
/// In frequency modes pulses are spaced by the policy's period, measured from
/// the previous deadline so polling jitter doesn't accumulate.
///
/// After every pulse the output stays off for at least as long as it was on.
/// No deadline is planned inside that window, whichever voice or bent period
/// asks for it, so back-to-back pulses can't add up to a latched output.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: MusicState,
    deadline_us: u64,
    period_us: u32,
    pulse_end_us: u64,
    /// End of the mandatory off-time after the last pulse.
    off_until_us: u64,
    last_fire_us: Option<u64>,
    pulses_fired: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            state: MusicState::Next,
            deadline_us: 0,
            period_us: 0,
            pulse_end_us: 0,
            off_until_us: 0,
            last_fire_us: None,
            pulses_fired: 0,
        }
    }

    pub fn state(&self) -> MusicState {
        self.state
    }

    /// True while the output should be high.
    pub fn is_firing(&self) -> bool {
        self.state == MusicState::Pulse
    }

    /// Pending deadline, if one has been planned.
    pub fn deadline_us(&self) -> Option<u64> {
        (self.state == MusicState::Wait).then_some(self.deadline_us)
    }

    pub fn pulses_fired(&self) -> u64 {
        self.pulses_fired
    }

    /// Drop the pending deadline so the next poll plans again. A pulse that is
    /// already on runs to completion.
    pub fn replan(&mut self) {
        if self.state == MusicState::Wait {
            self.state = MusicState::Next;
        }
    }

    /// Forget all timing history. Used on mode switches.
    ///
    /// The off-time after the last pulse still applies.
    pub fn reset(&mut self) {
        self.replan();
        self.last_fire_us = None;
    }

    /// Advance to `now_us`. Returns the pulse started by this call, if any.
    pub fn poll<const N: usize>(
        &mut self,
        now_us: u64,
        voices: &VoiceTable<N>,
        policy: &mut PulsePolicy,
        rng: &mut EntropySource,
    ) -> Option<Pulse> {
        loop {
            match self.state {
                MusicState::Next => {
                    let (deadline_us, period_us) = self.plan(now_us, voices, policy, rng)?;
                    self.deadline_us = deadline_us;
                    self.period_us = period_us;
                    self.state = MusicState::Wait;
                }
                MusicState::Wait => {
                    if now_us < self.deadline_us {
                        return None;
                    }
                    return Some(self.fire(now_us, policy));
                }
                MusicState::Pulse => {
                    if now_us < self.pulse_end_us {
                        return None;
                    }
                    self.state = MusicState::Next;
                }
            }
        }
    }

    fn plan<const N: usize>(
        &self,
        now_us: u64,
        voices: &VoiceTable<N>,
        policy: &mut PulsePolicy,
        rng: &mut EntropySource,
    ) -> Option<(u64, u32)> {
        let earliest_us = now_us.max(self.off_until_us);

        if policy.mode().is_midi() {
            return voices
                .active_notes()
                .map(|note| (note.next_fire_us(earliest_us), note.period_us))
                .min_by_key(|&(deadline, _)| deadline);
        }

        let period_us = policy.next_period_us(rng);
        let deadline_us = match self.last_fire_us {
            Some(last) => (last + u64::from(period_us)).max(self.off_until_us),
            None => earliest_us,
        };
        Some((deadline_us, period_us))
    }

    fn fire(&mut self, now_us: u64, policy: &PulsePolicy) -> Pulse {
        let width_us = policy.pulse_width_for(self.period_us);

        // More than a whole period late: resync to now instead of bursting
        // to catch up.
        let late_us = now_us - self.deadline_us;
        self.last_fire_us = Some(if late_us > u64::from(self.period_us) {
            now_us
        } else {
            self.deadline_us
        });

        self.pulse_end_us = now_us + u64::from(width_us);
        self.off_until_us = self.pulse_end_us + u64::from(width_us);
        self.pulses_fired += 1;
        self.state = MusicState::Pulse;

        Pulse {
            start_us: now_us,
            width_us,
            period_us: self.period_us,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        config::InterrupterConfig,
        engine::mode::SystemMode,
        io::period_table::period_us,
        rng::RngVariant,
    };

    struct Rig {
        scheduler: Scheduler,
        voices: VoiceTable<4>,
        policy: PulsePolicy,
        rng: EntropySource,
    }

    impl Rig {
        fn new(mode: SystemMode) -> Self {
            let config = InterrupterConfig {
                mode,
                pulse_width_us: 20,
                pulse_period_us: 1_000,
                ..InterrupterConfig::default()
            };
            Self {
                scheduler: Scheduler::new(),
                voices: VoiceTable::new(),
                policy: PulsePolicy::new(&config),
                rng: EntropySource::from_state(1, RngVariant::Stretched),
            }
        }

        fn poll(&mut self, now_us: u64) -> Option<Pulse> {
            self.scheduler
                .poll(now_us, &self.voices, &mut self.policy, &mut self.rng)
        }

        /// Poll every microsecond in `[from, to)` and collect pulse starts.
        fn run(&mut self, from: u64, to: u64) -> Vec<Pulse> {
            (from..to).filter_map(|t| self.poll(t)).collect()
        }
    }

    #[test]
    fn fixed_mode_fires_on_period() {
        let mut rig = Rig::new(SystemMode::FreqFixed);
        let pulses = rig.run(0, 3_500);

        let starts: Vec<u64> = pulses.iter().map(|p| p.start_us).collect();
        assert_eq!(starts, vec![0, 1_000, 2_000, 3_000]);
        assert!(pulses.iter().all(|p| p.width_us == 20));
    }

    #[test]
    fn output_is_high_for_width() {
        let mut rig = Rig::new(SystemMode::FreqFixed);
        assert!(rig.poll(0).is_some());
        assert!(rig.scheduler.is_firing());

        rig.poll(19);
        assert!(rig.scheduler.is_firing());

        rig.poll(20);
        assert!(!rig.scheduler.is_firing());
        assert_eq!(rig.scheduler.state(), MusicState::Wait);
        assert_eq!(rig.scheduler.deadline_us(), Some(1_000));
    }

    #[test]
    fn late_poll_resyncs_instead_of_bursting() {
        let mut rig = Rig::new(SystemMode::FreqFixed);
        rig.poll(0);
        rig.poll(50);

        // Skip far past several deadlines
        let pulse = rig.poll(10_000).expect("overdue pulse fires");
        assert_eq!(pulse.start_us, 10_000);
        assert!(rig.poll(10_500).is_none());
        assert_eq!(rig.scheduler.deadline_us(), Some(11_000));
    }

    #[test]
    fn midi_mode_idle_without_voices() {
        let mut rig = Rig::new(SystemMode::MidiUsb);
        assert!(rig.run(0, 5_000).is_empty());
        assert_eq!(rig.scheduler.state(), MusicState::Next);
    }

    #[test]
    fn single_voice_fires_on_its_grid() {
        let mut rig = Rig::new(SystemMode::MidiUsb);
        let clock = ManualClock::new(10_000);
        rig.voices.assign(0, 0, 69, 100, &clock);

        let period = u64::from(period_us(69));
        let pulses = rig.run(10_000, 10_000 + 3 * period + 1);

        let starts: Vec<u64> = pulses.iter().map(|p| p.start_us).collect();
        assert_eq!(
            starts,
            vec![10_000, 10_000 + period, 10_000 + 2 * period, 10_000 + 3 * period]
        );
        assert!(pulses.iter().all(|p| p.period_us == period_us(69)));
    }

    #[test]
    fn voices_interleave() {
        let mut rig = Rig::new(SystemMode::MidiJack);
        let clock = ManualClock::new(0);
        rig.voices.assign(0, 0, 60, 100, &clock);
        clock.set_micros(1_000);
        rig.voices.assign(1, 0, 67, 100, &clock);

        let (p60, p67) = (u64::from(period_us(60)), u64::from(period_us(67)));
        let window = 20_000;
        let pulses = rig.run(0, window);

        let from_60 = pulses.iter().filter(|p| p.period_us == period_us(60)).count() as u64;
        let from_67 = pulses.iter().filter(|p| p.period_us == period_us(67)).count() as u64;

        // Each voice fires roughly window/period times, minus any merged
        // into the other voice's pulse.
        assert!(from_60 + 1 >= window / p60 - 1, "C4 fired {from_60} times");
        assert!(from_67 + 1 >= (window - 1_000) / p67 - 1, "G4 fired {from_67} times");
        assert!(pulses.windows(2).all(|w| w[0].start_us < w[1].start_us));
    }

    #[test]
    fn released_voice_stops_after_replan() {
        let mut rig = Rig::new(SystemMode::MidiUsb);
        let clock = ManualClock::new(0);
        rig.voices.assign(0, 0, 60, 100, &clock);

        assert!(rig.poll(0).is_some());
        rig.poll(100);
        rig.voices.release(0);
        rig.scheduler.replan();

        assert!(rig.run(101, 50_000).is_empty());
    }

    /// Longest run of consecutive high microseconds in `pulses`, and the
    /// shortest gap between one pulse ending and the next starting.
    fn high_and_gap(pulses: &[Pulse]) -> (u64, u64) {
        let longest = pulses.iter().map(|p| u64::from(p.width_us)).max().unwrap_or(0);
        let gap = pulses
            .windows(2)
            .map(|w| w[1].start_us - (w[0].start_us + u64::from(w[0].width_us)))
            .min()
            .unwrap_or(u64::MAX);
        (longest, gap)
    }

    #[test]
    fn short_bent_period_waits_out_the_off_time() {
        let mut rig = Rig::new(SystemMode::FreqFixed);
        rig.policy.set_pulse_width_us(400);

        assert_eq!(rig.poll(0).map(|p| p.width_us), Some(400));

        // Next period shorter than the pulse that is still on
        rig.policy.set_pulse_period_us(150);
        rig.scheduler.replan();
        assert!(rig.run(1, 800).is_empty());

        let pulse = rig.poll(800).expect("fires once the off-time is over");
        assert_eq!(pulse.width_us, 75);
        assert_eq!(rig.scheduler.deadline_us(), None);
    }

    #[test]
    fn crowded_voices_never_merge_pulses() {
        let mut rig = Rig::new(SystemMode::MidiUsb);
        rig.policy.set_pulse_width_us(200);
        let clock = ManualClock::new(0);
        for (slot, pitch) in [100u8, 103, 107].into_iter().enumerate() {
            clock.set_micros(37 * slot as u64);
            rig.voices.assign(slot, 0, pitch, 100, &clock);
        }

        let pulses = rig.run(0, 100_000);
        assert!(pulses.len() > 100);

        let (longest, gap) = high_and_gap(&pulses);
        assert!(longest <= 200, "longest pulse {longest}us");
        assert!(
            pulses
                .windows(2)
                .all(|w| w[1].start_us - (w[0].start_us + u64::from(w[0].width_us))
                    >= u64::from(w[0].width_us)),
            "off-time shorter than on-time (min gap {gap}us)"
        );
    }

    #[test]
    fn top_pitch_keeps_its_table_period() {
        let mut rig = Rig::new(SystemMode::MidiUsb);
        let clock = ManualClock::new(0);
        rig.voices.assign(0, 0, 127, 100, &clock);

        let pulses = rig.run(0, 801);
        let starts: Vec<u64> = pulses.iter().map(|p| p.start_us).collect();
        assert_eq!(starts, (0..=10).map(|k| k * 80).collect::<Vec<u64>>());
        assert!(pulses.iter().all(|p| p.period_us == 80 && p.width_us == 20));
    }
}
