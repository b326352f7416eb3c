// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{BenchmarkId, Criterion, Throughput};
use rxsensor_core::{LatestSlot, SensorAccuracy, SensorKind, SensorSample};
use std::hint::black_box;

fn sample(i: usize) -> SensorSample {
    SensorSample::new(
        SensorKind::Accelerometer,
        vec![i as f32, 0.0, 9.81],
        SensorAccuracy::High,
        i as i64,
    )
}

pub fn bench_latest_slot(c: &mut Criterion) {
    let mut group = c.benchmark_group("latest_slot");

    // Offers per take: 1 means the consumer keeps up, larger values model a stalled consumer.
    for &burst in &[1usize, 8, 64] {
        group.throughput(Throughput::Elements(burst as u64));
        let id = BenchmarkId::from_parameter(format!("offers_per_take_{burst}"));
        group.bench_with_input(id, &burst, |bencher, &burst| {
            let slot = LatestSlot::new();
            bencher.iter(|| {
                for i in 0..burst {
                    black_box(slot.offer(sample(i)));
                }
                black_box(slot.try_take());
            });
        });
    }

    group.finish();
}
