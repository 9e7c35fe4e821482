//! 模拟阶段性能基准测试
//!
//! 测试 CPU 参考实现在不同粒子数量下的单步耗时

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use particle_screensaver::config::{EmitterParams, ParticleConfig, Viewport};
use particle_screensaver::render::particles::{
    initial_population, simulate_particle, step, ParticleStore, RandomField, SimulationParams,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn setup(count: u32) -> (ParticleStore, RandomField, SimulationParams) {
    let viewport = Viewport::new(1280, 720).unwrap();
    let config = ParticleConfig {
        count,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(0);
    let field = RandomField::generate(512, 512, &mut rng);
    let store = ParticleStore::new(initial_population(&config, viewport, &mut rng));
    let params = SimulationParams::new(EmitterParams::default(), viewport, 1.0 / 60.0, 0.0);
    (store, field, params)
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");

    for count in [10_000u32, 200_000, 1_000_000] {
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let (mut store, field, params) = setup(count);
            b.iter(|| {
                let generation = step(&mut store, &field, &params);
                black_box(generation.len())
            });
        });
    }

    group.finish();
}

fn bench_single_particle(c: &mut Criterion) {
    let (store, field, params) = setup(2);

    c.bench_function("simulate_particle", |b| {
        b.iter(|| simulate_particle(black_box(1), black_box(&store.read()[1]), &field, &params))
    });
}

criterion_group!(benches, bench_step, bench_single_particle);
criterion_main!(benches);
