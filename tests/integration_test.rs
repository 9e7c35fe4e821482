use glam::Vec2;
use particle_screensaver::config::{
    ConfigError, EmitterParams, EngineConfig, ParticleConfig, PositionMode, Viewport,
};
use particle_screensaver::render::particles::{
    initial_population, simulate, step, Particle, ParticleStore, RandomField, SimulationParams,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn viewport() -> Viewport {
    Viewport::new(800, 600).unwrap()
}

fn seeded_field(seed: u64) -> RandomField {
    RandomField::generate(16, 16, &mut StdRng::seed_from_u64(seed))
}

#[test]
fn test_dead_particle_reborn_at_origin() {
    let mut emitter = EmitterParams::default();
    emitter.origin = Vec2::new(200.0, -150.0);
    let params = SimulationParams::new(emitter, viewport(), 0.016, 1.0);
    let mut store = ParticleStore::new(vec![Particle::new(
        Vec2::new(3.0, 4.0),
        Vec2::new(1.0, 1.0),
        2.0,
        1.0,
    )]);

    let out = step(&mut store, &seeded_field(1), &params)[0];

    assert_eq!(out.age, 0.0);
    assert_eq!(out.life, 1.0);
    assert_eq!(out.position(), Vec2::new(0.25, -0.25));
    let speed = out.velocity().length();
    assert!(speed >= emitter.speed.min - 1e-5 && speed <= emitter.speed.max + 1e-5);
}

#[test]
fn test_resting_particle_falls() {
    let params = SimulationParams::new(EmitterParams::default(), viewport(), 0.5, 0.5);
    let start = Vec2::new(0.4, -0.2);
    let mut store = ParticleStore::new(vec![Particle::new(start, Vec2::ZERO, 0.0, 10.0)]);

    let out = step(&mut store, &seeded_field(2), &params)[0];

    assert_eq!(out.age, 0.5);
    assert_eq!(out.velocity(), Vec2::new(0.0, -0.4));
    // 速度为零时位置只经过一次视口除法
    assert_eq!(out.position(), start / viewport().size());
}

#[test]
fn test_zero_viewport_never_reaches_simulation() {
    assert!(matches!(
        Viewport::new(0, 0),
        Err(ConfigError::ValidationError(_))
    ));

    let mut config = EngineConfig::default();
    config.window.width = 0;
    config.window.height = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_fixed_field_is_deterministic() {
    let config = ParticleConfig {
        count: 500,
        ..Default::default()
    };
    let run = || {
        let mut rng = StdRng::seed_from_u64(42);
        let field = RandomField::generate(32, 32, &mut rng);
        let mut store = ParticleStore::new(initial_population(&config, viewport(), &mut rng));
        for frame in 0..30 {
            let params = SimulationParams::new(
                EmitterParams::default(),
                viewport(),
                0.05,
                frame as f32 * 0.05,
            );
            step(&mut store, &field, &params);
        }
        store.read().to_vec()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_roles_alternate_every_frame() {
    let mut store = ParticleStore::new(vec![Particle::default(); 8]);
    let field = seeded_field(3);
    let params = SimulationParams::new(EmitterParams::default(), viewport(), 0.016, 0.0);

    let mut reads = Vec::new();
    for _ in 0..6 {
        reads.push(store.read_index());
        step(&mut store, &field, &params);
    }
    assert_eq!(reads, vec![0, 1, 0, 1, 0, 1]);
}

#[test]
fn test_write_never_aliases_read() {
    let mut store = ParticleStore::new(vec![Particle::default(); 4]);
    for _ in 0..3 {
        let (read, write) = store.split();
        assert!(!std::ptr::eq(read.as_ptr(), write.as_ptr()));
        store.swap();
    }
}

#[test]
fn test_lifecycle_invariants_over_many_frames() {
    let config = ParticleConfig {
        count: 256,
        min_age: 0.2,
        max_age: 0.6,
        ..Default::default()
    };
    let dt = 0.016;
    let mut rng = StdRng::seed_from_u64(7);
    let field = RandomField::generate(8, 8, &mut rng);
    let initial = initial_population(&config, viewport(), &mut rng);
    let lives: Vec<f32> = initial.iter().map(|p| p.life).collect();
    let mut store = ParticleStore::new(initial);

    let mut rebirths = 0;
    for frame in 0..200 {
        let params = SimulationParams::new(
            EmitterParams::default(),
            viewport(),
            dt,
            frame as f32 * dt,
        );
        let previous = store.read().to_vec();
        let generation = step(&mut store, &field, &params);

        for (i, (before, p)) in previous.iter().zip(generation).enumerate() {
            assert_eq!(p.life, lives[i], "life must persist across rebirths");
            assert!(p.age >= 0.0);

            let due = before.age >= before.life;
            if due {
                rebirths += 1;
                assert_eq!(p.age, 0.0, "particle {} was due but not reborn", i);
            } else {
                assert_eq!(p.age, before.age + dt, "particle {} reset early", i);
            }
        }
    }
    // 初始粒子群全部重生一次，之后每个粒子至少再重生一次
    assert!(rebirths > 2 * config.count as usize);
}

#[test]
fn test_initial_population_reborn_on_first_step() {
    let config = ParticleConfig {
        count: 64,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(11);
    let field = RandomField::generate(4, 4, &mut rng);
    let initial = initial_population(&config, viewport(), &mut rng);
    let params = SimulationParams::new(EmitterParams::default(), viewport(), 0.016, 0.0);

    let mut next = vec![Particle::default(); initial.len()];
    simulate(&initial, &mut next, &field, &params);

    for (before, after) in initial.iter().zip(&next) {
        assert!(before.life >= config.min_age && before.life <= config.max_age);
        assert_eq!(after.age, 0.0);
        assert_eq!(after.life, before.life);
        assert_eq!(after.position(), Vec2::ZERO);
    }
}

#[test]
fn test_spawn_only_mode_keeps_normalized_units() {
    let mut emitter = EmitterParams::default();
    emitter.position_mode = PositionMode::SpawnOnly;
    emitter.gravity = Vec2::ZERO;
    let params = SimulationParams::new(emitter, viewport(), 0.1, 0.0);
    let mut store = ParticleStore::new(vec![Particle::new(
        Vec2::new(0.5, 0.5),
        Vec2::new(1.0, 0.0),
        0.0,
        100.0,
    )]);
    let field = seeded_field(5);

    for _ in 0..10 {
        step(&mut store, &field, &params);
    }

    let p = store.read()[0];
    assert!((p.position[0] - 1.5).abs() < 1e-4);
    assert!((p.position[1] - 0.5).abs() < 1e-6);
}

#[test]
fn test_config_file_drives_population() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("particles.toml");
    std::fs::write(
        &path,
        r#"
        [window]
        title = "Embers"
        width = 320
        height = 240
        vsync = false

        [particles]
        count = 100
        min_age = 0.5
        max_age = 0.5
        seed = 3

        [emitter]
        gravity = [0.0, -2.0]
        origin = [0.0, 0.0]
        theta = { min = 0.0, max = 0.0 }
        speed = { min = 1.0, max = 1.0 }
        position_mode = "SpawnOnly"
        "#,
    )?;

    let config = EngineConfig::from_toml_file(&path)?;
    config.validate()?;
    let viewport = config.window.viewport()?;

    let seed = config.particles.seed.unwrap_or_default();
    let population = initial_population(&config.particles, viewport, &mut StdRng::seed_from_u64(seed));
    assert_eq!(population.len(), 100);
    assert!(population.iter().all(|p| p.life == 0.5 && p.age == 1.5));

    let params = SimulationParams::new(config.emitter, viewport, 0.1, 0.0);
    let mut store = ParticleStore::new(population);
    let reborn = step(&mut store, &seeded_field(9), &params)[0];
    assert_eq!(reborn.velocity(), Vec2::new(1.0, 0.0));
    Ok(())
}
