// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::latest_slot_bench::bench_latest_slot;
use criterion::{criterion_group, criterion_main};

mod latest_slot_bench;

criterion_group!(benches, bench_latest_slot);
criterion_main!(benches);
