//! Enclosing-circle benchmarks.

use criterion::{criterion_group, criterion_main, Criterion};
use relink_bench::scatter_points;
use relink_filters::EnclosingCircle;

fn bench_enclosing_circle(c: &mut Criterion) {
    let mut group = c.benchmark_group("circle");
    for n in [100usize, 10_000] {
        let points = scatter_points(n);
        group.bench_function(format!("batch_{n}"), |b| {
            b.iter(|| EnclosingCircle::with_seed(&points, 42))
        });
        group.bench_function(format!("incremental_{n}"), |b| {
            let (head, tail) = points.split_at(n / 2);
            b.iter(|| {
                let mut ec = EnclosingCircle::with_seed(head, 42);
                for &p in tail {
                    ec.add_point(p);
                }
                ec
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_enclosing_circle);
criterion_main!(benches);
