//! Two-line status display.
//!
//! The display is a character-cell device driven through a cursor, like an
//! HD44780 or a VFD: position the cursor, print, and whatever was on the
//! line before stays there unless it is overwritten. [`DisplaySink`] is that
//! interface; [`TextDisplay`] is an in-memory implementation used by the TUI
//! and the tests.
//!
//! [`Display`] knows what goes on each line for both device generations and
//! rate-limits the bottom line so a slow panel doesn't flicker.

/// Minimum-interval gate for refreshes.
pub mod limiter;
/// Pitch class names and glyphs.
pub mod notes;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{config::InterrupterConfig, engine::Snapshot};

pub use limiter::RateLimiter;
pub use notes::{note_glyph, note_name, NOTE_GLYPHS, NOTE_NAMES};

pub const DISPLAY_COLS: usize = 20;
pub const DISPLAY_ROWS: usize = 2;

/// Character the panel uses for "micro".
const MU: &str = "\u{b5}";

/// How the frequency modes show the period setpoint. Purely cosmetic: the
/// timing math never sees this.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadoutUnit {
    #[default]
    Hz,
    Ms,
}

/// Which device generation's screen layout to draw.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayLayout {
    /// `W<` width, frequency or note names from column 8, top line blanked
    /// before each write.
    #[default]
    Interocitor,
    /// `W:` width, `T:` frequency in the frequency modes, top line written
    /// over whatever is there.
    Turboencabulator,
}

/// Cursor-addressed character display.
pub trait DisplaySink {
    fn set_cursor(&mut self, col: usize, row: usize);

    /// Print at the cursor and advance it.
    fn print(&mut self, text: &str);
}

/// In-memory character cells.
#[derive(Debug, Clone)]
pub struct TextDisplay {
    cells: [[char; DISPLAY_COLS]; DISPLAY_ROWS],
    col: usize,
    row: usize,
}

impl TextDisplay {
    pub fn new() -> Self {
        Self {
            cells: [[' '; DISPLAY_COLS]; DISPLAY_ROWS],
            col: 0,
            row: 0,
        }
    }

    pub fn clear(&mut self) {
        self.cells = [[' '; DISPLAY_COLS]; DISPLAY_ROWS];
        self.col = 0;
        self.row = 0;
    }

    /// Row contents, trailing cells included.
    pub fn line(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for TextDisplay {
    fn set_cursor(&mut self, col: usize, row: usize) {
        self.col = col;
        self.row = row.min(DISPLAY_ROWS - 1);
    }

    fn print(&mut self, text: &str) {
        // Characters past the last column are lost.
        for ch in text.chars() {
            if let Some(cell) = self.cells[self.row].get_mut(self.col) {
                *cell = ch;
            }
            self.col += 1;
        }
    }
}

/// Period setpoint as the panel prints it.
pub fn format_period(period_us: u32, unit: ReadoutUnit) -> String {
    match unit {
        ReadoutUnit::Ms => format!("{}ms  ", period_us / 1_000),
        ReadoutUnit::Hz => format!("{:.2}Hz   ", 1_000_000.0 / period_us.max(1) as f32),
    }
}

/// Glyphs for every sounding voice, in slot order.
pub fn chord_glyphs<const N: usize>(snapshot: &Snapshot<N>) -> String {
    snapshot
        .voices
        .iter()
        .filter(|v| v.velocity() > 0)
        .map(|v| note_glyph(v.pitch_raw()))
        .collect()
}

/// Drives a [`DisplaySink`] with the interrupter's status lines.
pub struct Display<S: DisplaySink> {
    sink: S,
    layout: DisplayLayout,
    readout: ReadoutUnit,
    limiter: RateLimiter,
}

impl<S: DisplaySink> Display<S> {
    pub fn new(sink: S, config: &InterrupterConfig) -> Self {
        Self {
            sink,
            layout: config.layout,
            readout: config.readout,
            limiter: RateLimiter::new(config.display_refresh_ms),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn readout(&self) -> ReadoutUnit {
        self.readout
    }

    pub fn set_readout(&mut self, readout: ReadoutUnit) {
        self.readout = readout;
    }

    /// Free-form status text on the top line. Not rate-limited.
    pub fn update_top_line(&mut self, text: &str) {
        self.sink.set_cursor(0, 0);
        if self.layout == DisplayLayout::Interocitor {
            self.sink.print("                ");
            self.sink.set_cursor(0, 0);
        }
        self.sink.print(text);
    }

    /// Pulse width and frequency/notes on the bottom line.
    ///
    /// Returns `false` without touching the panel when called again before
    /// the refresh interval has elapsed.
    pub fn update_bottom_line<const N: usize>(
        &mut self,
        now_ms: u64,
        snapshot: &Snapshot<N>,
    ) -> bool {
        if !self.limiter.ready(now_ms) {
            return false;
        }

        match self.layout {
            DisplayLayout::Interocitor => self.draw_interocitor(snapshot),
            DisplayLayout::Turboencabulator => self.draw_turboencabulator(snapshot),
        }

        self.limiter.try_fire(now_ms)
    }

    fn draw_width(&mut self, label: &str, width_us: u32, tail: &str) {
        self.sink.set_cursor(0, 1);
        self.sink.print(label);
        self.sink.set_cursor(2, 1);
        self.sink.print(&width_us.to_string());
        self.sink.print(MU);
        self.sink.print(tail);
    }

    fn draw_interocitor<const N: usize>(&mut self, snapshot: &Snapshot<N>) {
        self.draw_width("W<     ", snapshot.pulse_width_us, "s ");

        if snapshot.mode.is_frequency() {
            self.sink.set_cursor(7, 1);
            self.sink.print("          ");
            self.sink.set_cursor(8, 1);
            self.sink
                .print(&format_period(snapshot.pulse_period_us, self.readout));
        } else {
            self.sink.set_cursor(8, 1);
            for voice in &snapshot.voices {
                if voice.velocity() == 0 {
                    self.sink.print("  ");
                } else {
                    self.sink.print(note_name(voice.pitch_raw()));
                }
            }
        }
    }

    fn draw_turboencabulator<const N: usize>(&mut self, snapshot: &Snapshot<N>) {
        self.draw_width("W:      ", snapshot.pulse_width_us, "s  ");

        if snapshot.mode.is_frequency() {
            self.sink.set_cursor(8, 1);
            self.sink.print("T:      ");
            self.sink.set_cursor(10, 1);
            self.sink
                .print(&format_period(snapshot.pulse_period_us, self.readout));
        }
    }
}
