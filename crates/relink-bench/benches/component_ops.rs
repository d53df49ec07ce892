//! Connectivity-finder benchmarks.

use criterion::{criterion_group, criterion_main, Criterion};
use relink_bench::striped_values;
use relink_graph::Components;
use relink_grid::{FourConnected, PartialGrid};

fn bench_raster_labeling(c: &mut Criterion) {
    let mut group = c.benchmark_group("components");
    for size in [64u32, 256] {
        let grid = PartialGrid::new(size, size, &[]).expect("grid");
        let values = striped_values(size, size);
        group.bench_function(format!("raster_{size}x{size}"), |b| {
            b.iter(|| Components::of_raster(&grid, &FourConnected, &values, 1).expect("label"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_raster_labeling);
criterion_main!(benches);
