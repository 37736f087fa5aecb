//! Criterion benchmarks for the encoding pipeline.
//!
//! Benchmarks:
//! 1. Grid composition across grid sizes
//! 2. Full day encode (validate, normalize, sign, compose) plus pixel mapping

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricepix_core::{compose, encode_day, ColorCode, DayWindow, GridSize, PixelGrid, PriceObservation};

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    for n in [10usize, 32, 100] {
        let grid = GridSize::new(n).unwrap();
        let prices: Vec<ColorCode> = (0..grid.price_cells() as i64)
            .map(|v| ColorCode::new(v % 0xFF_FFFF).unwrap())
            .collect();
        let signature = vec![ColorCode::new(492_023).unwrap(); 4];
        group.bench_with_input(BenchmarkId::from_parameter(n), &grid, |b, &grid| {
            b.iter(|| compose(black_box(&prices), black_box(&signature), grid).unwrap())
        });
    }
    group.finish();
}

fn bench_encode_day(c: &mut Criterion) {
    let grid = GridSize::default();
    let date = NaiveDate::from_ymd_opt(2023, 4, 9).unwrap();
    let window = DayWindow::for_date(date, grid.price_cells()).unwrap();
    let observations: Vec<PriceObservation> = window
        .expected_times()
        .enumerate()
        .map(|(i, time)| PriceObservation {
            time,
            close: 28_000.0 + (i as f64 * 0.1).sin() * 250.0,
        })
        .collect();

    c.bench_function("encode_day_10x10", |b| {
        b.iter(|| {
            let seq = encode_day(black_box(&observations), &window, grid).unwrap();
            PixelGrid::from_sequence(&seq, grid).unwrap()
        })
    });
}

criterion_group!(benches, bench_compose, bench_encode_day);
criterion_main!(benches);
