/// Two-cell note names, indexed by `pitch % 12`.
pub const NOTE_NAMES: [&str; 12] = [
    "C ", "C#", "D ", "D#", "E ", "F ", "F#", "G ", "G#", "A ", "A#", "B ",
];

/// Single-cell glyphs, indexed by `pitch % 12`. Sharps are lower case.
pub const NOTE_GLYPHS: [char; 12] = ['C', 'c', 'D', 'd', 'E', 'F', 'f', 'G', 'g', 'A', 'a', 'B'];

pub fn note_name(pitch: u8) -> &'static str {
    NOTE_NAMES[(pitch % 12) as usize]
}

pub fn note_glyph(pitch: u8) -> char {
    NOTE_GLYPHS[(pitch % 12) as usize]
}
