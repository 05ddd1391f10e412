//! Benchmarks for frame selection, stitching and GIF encoding.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features

use std::hint::black_box;

use criterion::Criterion;
use framestitch::{GifOptions, encode_gif_to_memory, sample_indices_by_time, stitch_pair};
use image::{DynamicImage, Rgb, RgbImage};

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn benchmark_sampling(criterion: &mut Criterion) {
    let constant = vec![33u32; 3_000];
    let variable: Vec<u32> = (0..3_000).map(|i| 20 + (i % 7) * 10).collect();

    criterion.bench_function("sample 3000 constant frames to 12 fps", |bencher| {
        bencher.iter(|| sample_indices_by_time(black_box(&constant), black_box(12.0)).unwrap());
    });

    criterion.bench_function("sample 3000 variable frames to 12 fps", |bencher| {
        bencher.iter(|| sample_indices_by_time(black_box(&variable), black_box(12.0)).unwrap());
    });

    criterion.bench_function("upsample 3000 frames to 120 fps", |bencher| {
        bencher.iter(|| sample_indices_by_time(black_box(&constant), black_box(120.0)).unwrap());
    });
}

fn benchmark_stitching(criterion: &mut Criterion) {
    let left = gradient(640, 480);
    let right = gradient(640, 360);

    let mut group = criterion.benchmark_group("stitch pair");
    group.sample_size(20);
    group.bench_function("640x480 + 640x360", |bencher| {
        bencher.iter(|| stitch_pair(black_box(&left), black_box(&right), 1.0).unwrap());
    });
    group.bench_function("640x480 + 640x360 at half scale", |bencher| {
        bencher.iter(|| stitch_pair(black_box(&left), black_box(&right), 0.5).unwrap());
    });
    group.finish();
}

fn benchmark_gif_encoding(criterion: &mut Criterion) {
    let frames: Vec<DynamicImage> = (0..8).map(|_| gradient(160, 120)).collect();

    let mut group = criterion.benchmark_group("gif encoding");
    group.sample_size(10);
    for speed in [10, 30] {
        let options = GifOptions::new().speed(speed);
        group.bench_function(format!("8 frames 160x120 speed {speed}"), |bencher| {
            bencher.iter(|| encode_gif_to_memory(black_box(&frames), &options).unwrap());
        });
    }
    group.finish();
}

criterion::criterion_group!(
    benches,
    benchmark_sampling,
    benchmark_stitching,
    benchmark_gif_encoding,
);
criterion::criterion_main!(benches);
