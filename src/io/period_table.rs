/// Oscillation period in microseconds for every MIDI pitch, equal temperament
/// with A4 = 440 Hz, rounded to the nearest microsecond.
///
/// Every entry is strictly positive; the timing path divides by these.
pub const MIDI_PERIOD_US: [u32; 128] = [
    122312, 115447, 108968, 102852, 97079, 91631, 86488, 81634,
    77052, 72727, 68645, 64793, 61156, 57724, 54484, 51426,
    48540, 45815, 43244, 40817, 38526, 36364, 34323, 32396,
    30578, 28862, 27242, 25713, 24270, 22908, 21622, 20408,
    19263, 18182, 17161, 16198, 15289, 14431, 13621, 12856,
    12135, 11454, 10811, 10204, 9631, 9091, 8581, 8099,
    7645, 7215, 6810, 6428, 6067, 5727, 5405, 5102,
    4816, 4545, 4290, 4050, 3822, 3608, 3405, 3214,
    3034, 2863, 2703, 2551, 2408, 2273, 2145, 2025,
    1911, 1804, 1703, 1607, 1517, 1432, 1351, 1276,
    1204, 1136, 1073, 1012, 956, 902, 851, 804,
    758, 716, 676, 638, 602, 568, 536, 506,
    478, 451, 426, 402, 379, 358, 338, 319,
    301, 284, 268, 253, 239, 225, 213, 201,
    190, 179, 169, 159, 150, 142, 134, 127,
    119, 113, 106, 100, 95, 89, 84, 80,
];

/// Period for `pitch`. Total over `u8`: the top bit is masked off, so an
/// out-of-range pitch aliases into the table instead of indexing past it.
#[inline]
pub fn period_us(pitch: u8) -> u32 {
    MIDI_PERIOD_US[(pitch & 0x7F) as usize]
}
