//! # Serialization Benchmark
//!
//! Measures the producer's per-frame cost: advance the wave, then write
//! the whole scene into a slot-sized region.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use inflight_scene::{FrameUpdater, Layout, VisualTemplate, WaveAnimator};

fn bench_update_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_serialize");

    for entity_count in [1_000, 100_000, 1_000_000] {
        let updater = FrameUpdater::new(
            VisualTemplate::triangle(64.0),
            Layout::fixed(entity_count),
            Box::new(WaveAnimator::default()),
        )
        .unwrap();
        let mut state = updater.generate(1920, 1080);
        let mut region = vec![0u8; updater.region_size()];

        group.throughput(Throughput::Bytes(updater.region_size() as u64));
        group.bench_with_input(
            BenchmarkId::new("triangles", entity_count),
            &entity_count,
            |b, _| {
                b.iter(|| {
                    updater.update(&mut state, 0.05);
                    black_box(updater.serialize(&state, &mut region).unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_update_serialize);
criterion_main!(benches);
