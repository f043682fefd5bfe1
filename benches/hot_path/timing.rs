//! Benchmarks for timing path ticks.

use std::hint::black_box;

use coil_interrupter::{
    clock::ManualClock,
    config::InterrupterConfig,
    engine::{mode::SystemMode, policy::BendConfig, Interrupter},
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

/// Microseconds per frame at 48kHz, rounded.
const FRAME_US: u64 = 21;

fn run_block(coil: &mut Interrupter<ManualClock>, frames: usize) {
    for _ in 0..frames {
        coil.clock().advance_micros(FRAME_US);
        black_box(coil.tick());
    }
}

pub fn bench_timing(c: &mut Criterion) {
    let mut group = c.benchmark_group("core/timing");

    for &size in BLOCK_SIZES {
        // Fixed frequency, no jitter - baseline
        let mut fixed = Interrupter::new(&InterrupterConfig::default(), ManualClock::new(0));
        group.bench_with_input(BenchmarkId::new("fixed", size), &size, |b, &frames| {
            b.iter(|| run_block(&mut fixed, frames))
        });

        // Fixed frequency with uniform bend
        let config = InterrupterConfig {
            pulse_period_us: 1_000,
            bend: BendConfig {
                enabled: true,
                ..BendConfig::default()
            },
            ..InterrupterConfig::default()
        };
        let mut bent = Interrupter::new(&config, ManualClock::new(0));
        group.bench_with_input(BenchmarkId::new("bend", size), &size, |b, &frames| {
            b.iter(|| run_block(&mut bent, frames))
        });

        // MIDI with every slot sounding - worst case deadline search
        let config = InterrupterConfig {
            mode: SystemMode::MidiUsb,
            ..InterrupterConfig::default()
        };
        let mut chord = Interrupter::new(&config, ManualClock::new(0));
        for (i, pitch) in [48u8, 55, 60, 64, 67, 72].into_iter().enumerate() {
            chord.clock().advance_micros(97 * i as u64);
            chord.note_on(0, pitch, 100);
        }
        group.bench_with_input(BenchmarkId::new("midi_full", size), &size, |b, &frames| {
            b.iter(|| run_block(&mut chord, frames))
        });
    }

    group.finish();
}
