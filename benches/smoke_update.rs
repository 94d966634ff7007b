// Smoke simulation benchmarks
//
// Measures the per-frame cost of a saturated pool at several capacities,
// plus the render-boundary sync and texture generation on their own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use smoke_engine::particles::{ParticlePool, RenderBuffers, SmokeTexture};
use smoke_engine::{SmokeConfig, SmokeSystem};
use std::time::Duration;

const PARTICLE_COUNTS: &[usize] = &[200, 2_000, 20_000];
const FRAME: f32 = 1.0 / 60.0;

fn saturated_system(count: usize) -> SmokeSystem {
    let mut system = SmokeSystem::with_seed(
        SmokeConfig {
            particle_count: count,
            emission_rate: count as f32 / 4.0,
            particle_lifetime: 6.0,
            ..Default::default()
        },
        42,
    );
    // past one lifetime the pool is recycling
    for _ in 0..(7.0 / FRAME) as usize {
        system.update(FRAME);
    }
    system
}

fn bench_system_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoke_update");

    for &count in PARTICLE_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut system = saturated_system(count);
            b.iter(|| {
                system.update(black_box(FRAME));
            });
        });
    }

    group.finish();
}

fn bench_render_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_sync");

    for &count in PARTICLE_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let pool = ParticlePool::new(count, 25.0);
            let mut buffers = RenderBuffers::new(count);
            b.iter(|| {
                buffers.sync(black_box(&pool));
            });
        });
    }

    group.finish();
}

fn bench_texture_generation(c: &mut Criterion) {
    c.bench_function("smoke_texture_128", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| black_box(SmokeTexture::generate(&mut rng)));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_system_update, bench_render_sync, bench_texture_generation
}
criterion_main!(benches);
