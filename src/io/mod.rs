// Purpose - external interfaces: MIDI input, pitch lookup

pub mod converter;
pub mod midi;
pub mod period_table;
