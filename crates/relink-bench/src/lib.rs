//! Benchmark inputs shared across the relink bench suites.

#![forbid(unsafe_code)]

use relink_filters::Point;

/// Deterministic pseudo-random points on a bounded plane.
///
/// A Weyl sequence keeps the inputs reproducible without seeding an RNG
/// in every bench.
pub fn scatter_points(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let a = (i as f64 * 0.754_877_666) % 1.0;
            let b = (i as f64 * 0.569_840_291) % 1.0;
            Point::new(a * 1000.0, b * 1000.0)
        })
        .collect()
}

/// A striped habitat raster: roughly 3 habitat rows out of every 7.
pub fn striped_values(rows: u32, cols: u32) -> Vec<i32> {
    (0..rows * cols)
        .map(|cell| if (cell / cols) % 7 < 3 { 1 } else { 0 })
        .collect()
}
