//! Benchmarks for voice table operations.

use std::hint::black_box;

use coil_interrupter::{clock::ManualClock, synth::VoiceTable};
use criterion::Criterion;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("core/voices");
    let clock = ManualClock::new(0);

    // Fill then empty a six-slot table
    group.bench_function("fill_and_release", |b| {
        let mut table: VoiceTable<6> = VoiceTable::new();
        b.iter(|| {
            for pitch in 60..66 {
                black_box(table.allocate(0, pitch, 100, &clock));
            }
            for pitch in 60..66 {
                black_box(table.release_note(0, pitch));
            }
        })
    });

    // Worst case scan: table full, allocation fails
    let mut full: VoiceTable<6> = VoiceTable::new();
    for pitch in 60..66 {
        full.allocate(0, pitch, 100, &clock);
    }
    group.bench_function("allocate_full", |b| {
        b.iter(|| black_box(full.allocate(0, 72, 100, &clock)))
    });

    group.bench_function("snapshot", |b| b.iter(|| black_box(full.snapshot())));

    group.finish();
}
