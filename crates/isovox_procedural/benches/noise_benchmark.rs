//! Benchmark for density generation.
//!
//! Run with: cargo bench --package isovox_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use isovox_procedural::{BlockTerrain, HeightmapTerrain, SimplexNoise, SimplexTerrain, WorldSeed};
use isovox_core::DensitySource;

fn benchmark_samples(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));
    let mut group = c.benchmark_group("simplex");
    group.throughput(Throughput::Elements(1));

    group.bench_function("sample2", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.37;
            black_box(noise.sample2(black_box(x), black_box(x * 0.7)))
        });
    });
    group.bench_function("sample3", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.37;
            black_box(noise.sample3(black_box(x), black_box(x * 0.7), black_box(-x)))
        });
    });

    group.finish();
}

fn benchmark_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("terrain_32");
    group.throughput(Throughput::Elements(32 * 32 * 32));

    let volume = SimplexTerrain::new(WorldSeed::new(42));
    group.bench_function("simplex_volume", |b| {
        b.iter(|| black_box(volume.field([32, 32, 32])));
    });

    let ground = HeightmapTerrain::new(WorldSeed::new(42), 8.0, 16.0);
    group.bench_function("heightmap", |b| {
        b.iter(|| {
            let mut acc = 0i32;
            for x in 0..32 {
                for z in 0..32 {
                    for y in 0..32 {
                        acc += i32::from(ground.density(x, y, z));
                    }
                }
            }
            black_box(acc)
        });
    });

    let blocks = BlockTerrain::new(WorldSeed::new(42));
    group.bench_function("block_columns", |b| {
        b.iter(|| black_box(blocks.generate(32)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_samples, benchmark_fields);
criterion_main!(benches);
