//! CoilApp - wires the interrupter core to an audio device and the TUI

use std::time::{SystemTime, UNIX_EPOCH};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::{Consumer, Producer, RingBuffer};

use coil_interrupter::{
    clock::ManualClock,
    config::InterrupterConfig,
    engine::{Interrupter, Snapshot},
    synth::message::ControlMessage,
};

use super::{midi_input, ui::UiApp};

/// Control messages buffered between the UI/MIDI threads and the timing path
const CONTROL_QUEUE: usize = 256;
/// Samples buffered for the pulse scope
const SCOPE_QUEUE: usize = 16_384;
/// Snapshots buffered for the UI (it only keeps the newest)
const SNAPSHOT_QUEUE: usize = 16;
/// Output level while the coil is firing
const PULSE_LEVEL: f32 = 0.5;

/// Application builder
pub struct CoilApp {
    config: InterrupterConfig,
    midi_port: Option<String>,
}

impl CoilApp {
    pub fn new(config: InterrupterConfig) -> Self {
        Self {
            config,
            midi_port: None,
        }
    }

    /// Listen for notes on a hardware MIDI port
    pub fn midi_port(mut self, port: Option<String>) -> Self {
        self.midi_port = port;
        self
    }

    /// Run until the user quits
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0 as f64;
        let channels = stream_config.channels() as usize;
        log::info!("audio out: {sample_rate} Hz, {channels} channels");

        let (ui_tx, ui_rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE);
        let (midi_tx, midi_rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE);
        let (snapshot_tx, snapshot_rx) = RingBuffer::<Snapshot>::new(SNAPSHOT_QUEUE);
        let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_QUEUE);

        // The timing clock counts frames from zero, so the seed comes from the
        // wall clock instead
        let coil = Interrupter::with_seed(&self.config, ManualClock::new(0), seed_ms());
        let initial = coil.snapshot();

        let mut timing = TimingPath {
            coil,
            ui_rx,
            midi_rx,
            snapshot_tx,
            scope_tx,
            frames: 0,
            sample_rate,
        };

        let stream = device.build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| timing.render(data, channels),
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;
        stream.play()?;

        // Held for the lifetime of the UI; dropping it closes the port
        let _midi = match &self.midi_port {
            Some(hint) => Some(midi_input::connect(hint, self.config.midi_channel, midi_tx)?),
            None => None,
        };

        let mut terminal = ratatui::init();
        let result = UiApp::new(ui_tx, snapshot_rx, scope_rx, initial, &self.config, sample_rate)
            .run(&mut terminal);
        ratatui::restore();
        result
    }
}

/// Wall-clock milliseconds, used once to seed the entropy source.
fn seed_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

/// Everything the audio callback owns. This is the only place the voice
/// table and entropy source are touched once the stream is running.
struct TimingPath {
    coil: Interrupter<ManualClock>,
    ui_rx: Consumer<ControlMessage>,
    midi_rx: Consumer<ControlMessage>,
    snapshot_tx: Producer<Snapshot>,
    scope_tx: Producer<f32>,
    frames: u64,
    sample_rate: f64,
}

impl TimingPath {
    fn render(&mut self, data: &mut [f32], channels: usize) {
        // Control changes land between blocks, never mid-pulse-decision
        self.coil.drain(&mut self.ui_rx);
        self.coil.drain(&mut self.midi_rx);

        for frame in data.chunks_mut(channels.max(1)) {
            let now_us = (self.frames as f64 * 1_000_000.0 / self.sample_rate) as u64;
            self.coil.clock().set_micros(now_us);
            self.coil.tick();

            let level = if self.coil.is_firing() { PULSE_LEVEL } else { 0.0 };
            frame.fill(level);

            // Scope is best-effort; drop samples when the UI falls behind
            let _ = self.scope_tx.push(level);
            self.frames += 1;
        }

        let _ = self.snapshot_tx.push(self.coil.snapshot());
    }
}
