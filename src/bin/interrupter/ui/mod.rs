//! TUI for the interrupter host
//!
//! Emulates the front panel (two-line VFD) and shows what the timing path is
//! doing: voice slots, pulse train, counters.

mod status;
mod vfd;
mod voices;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;

use coil_interrupter::{
    clock::{Clock, SystemClock},
    config::InterrupterConfig,
    display::{chord_glyphs, Display, ReadoutUnit, TextDisplay},
    engine::Snapshot,
    synth::message::ControlMessage,
    MIN_PERIOD_US, NOTE_ARRAY_SIZE,
};

use status::render_status;
use vfd::render_vfd;
use voices::render_voices;
use waveform::render_waveform;

/// Scope window, in samples
const VIS_BUFFER_SIZE: usize = 1024;
/// Pulse width change per arrow key press
const WIDTH_STEP_US: u32 = 5;
/// Velocity for notes played from the computer keyboard
const KEYBOARD_VELOCITY: u8 = 100;

/// Computer keyboard piano: one octave starting at the current base note
const PIANO_KEYS: [char; 13] = ['a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k'];

pub struct UiApp {
    /// Commands to the timing path
    control_tx: Producer<ControlMessage>,
    /// State published by the timing path
    snapshot_rx: Consumer<Snapshot>,
    /// Output level samples for the scope
    scope_rx: Consumer<f32>,
    /// Latest snapshot received
    current: Snapshot,
    scope_buffer: Vec<f32>,
    /// Front panel emulation
    display: Display<TextDisplay>,
    top_line: String,
    clock: SystemClock,
    sample_rate: f64,
    base_note: u8,
    last_dropped: u32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        control_tx: Producer<ControlMessage>,
        snapshot_rx: Consumer<Snapshot>,
        scope_rx: Consumer<f32>,
        initial: Snapshot,
        config: &InterrupterConfig,
        sample_rate: f64,
    ) -> Self {
        Self {
            control_tx,
            snapshot_rx,
            scope_rx,
            current: initial,
            scope_buffer: vec![0.0; VIS_BUFFER_SIZE],
            display: Display::new(TextDisplay::new(), config),
            top_line: String::new(),
            clock: SystemClock::new(),
            sample_rate,
            base_note: 60,
            last_dropped: initial.dropped_notes,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();
            self.poll_snapshots();
            self.refresh_panel();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_scope(&mut self) {
        let mut fresh = Vec::new();
        while let Ok(sample) = self.scope_rx.pop() {
            fresh.push(sample);
        }

        if !fresh.is_empty() {
            self.scope_buffer.extend(fresh);
            if self.scope_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.scope_buffer.len() - VIS_BUFFER_SIZE;
                self.scope_buffer.drain(0..excess);
            }
        }
    }

    fn poll_snapshots(&mut self) {
        while let Ok(snapshot) = self.snapshot_rx.pop() {
            self.current = snapshot;
        }

        if self.current.dropped_notes != self.last_dropped {
            log::debug!(
                "voice table full: {} notes dropped so far",
                self.current.dropped_notes
            );
            self.last_dropped = self.current.dropped_notes;
        }
    }

    /// Push the latest state to the panel emulation
    fn refresh_panel(&mut self) {
        let mut top = String::from(self.current.mode.label());
        if self.current.mode.is_midi() {
            top.push(' ');
            top.push_str(&chord_glyphs(&self.current));
        } else if self.current.bend_enabled {
            top.push_str(" BEND");
        }

        if top != self.top_line {
            self.display.update_top_line(&top);
            self.top_line = top;
        }
        self.display
            .update_bottom_line(self.clock.millis(), &self.current);
    }

    fn send(&mut self, msg: ControlMessage) {
        if self.control_tx.push(msg).is_err() {
            log::warn!("control queue full, dropped {msg:?}");
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                let mode = self.current.mode.next();
                log::info!("mode -> {}", mode.label());
                self.send(ControlMessage::SetMode(mode));
            }
            KeyCode::Right => {
                let width_us = self.current.pulse_width_us.saturating_add(WIDTH_STEP_US);
                self.send(ControlMessage::SetPulseWidth { width_us });
            }
            KeyCode::Left => {
                let width_us = self.current.pulse_width_us.saturating_sub(WIDTH_STEP_US).max(1);
                self.send(ControlMessage::SetPulseWidth { width_us });
            }
            KeyCode::Up => {
                // Shorter period, higher pitch
                let period = self.current.pulse_period_us;
                let period_us = (period - period / 16).max(MIN_PERIOD_US);
                self.send(ControlMessage::SetPulsePeriod { period_us });
            }
            KeyCode::Down => {
                let period = self.current.pulse_period_us;
                let period_us = period.saturating_add((period / 16).max(1));
                self.send(ControlMessage::SetPulsePeriod { period_us });
            }
            KeyCode::Char('b') => {
                self.send(ControlMessage::SetBend(!self.current.bend_enabled));
            }
            KeyCode::Char('r') => {
                let readout = match self.display.readout() {
                    ReadoutUnit::Hz => ReadoutUnit::Ms,
                    ReadoutUnit::Ms => ReadoutUnit::Hz,
                };
                self.display.set_readout(readout);
            }
            KeyCode::Char('z') => self.base_note = self.base_note.saturating_sub(12).max(12),
            KeyCode::Char('x') => self.base_note = (self.base_note + 12).min(108),
            KeyCode::Char(' ') => self.send(ControlMessage::AllNotesOff),
            KeyCode::Char(c) => {
                if let Some(offset) = PIANO_KEYS.iter().position(|&k| k == c) {
                    self.toggle_note(self.base_note + offset as u8);
                }
            }
            _ => {}
        }
    }

    /// Terminals don't report key releases, so keys latch: press once to
    /// start a note, again to stop it.
    fn toggle_note(&mut self, pitch: u8) {
        let sounding = self
            .current
            .voices
            .iter()
            .any(|v| v.channel() == 0 && v.pitch_raw() == pitch);

        if sounding {
            self.send(ControlMessage::NoteOff { channel: 0, pitch });
        } else {
            self.send(ControlMessage::NoteOn {
                channel: 0,
                pitch,
                velocity: KEYBOARD_VELOCITY,
            });
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                          // Status bar
                Constraint::Length(4),                          // VFD
                Constraint::Length(NOTE_ARRAY_SIZE as u16 + 3), // Voice slots
                Constraint::Min(6),                             // Scope
                Constraint::Length(1),                          // Help bar
            ])
            .split(area);

        render_status(frame, chunks[0], &self.current);
        render_vfd(frame, chunks[1], self.display.sink());
        render_voices(frame, chunks[2], &self.current);
        render_waveform(frame, chunks[3], &self.scope_buffer, self.sample_rate);

        let help = Paragraph::new(concat!(
            " [Q] Quit  [Tab] Mode  [\u{2190}\u{2192}] Width  [\u{2191}\u{2193}] Period",
            "  [B] Bend  [R] Hz/ms  [A-K] Notes  [Z/X] Octave  [Space] All off",
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
