//! 模拟阶段（CPU 参考实现）
//!
//! `simulate_particle` 是逐粒子的纯函数，粒子之间没有任何依赖，
//! 所以 `simulate` 用 rayon 无序并行执行。WGSL 计算着色器
//! （见 [`super::shaders::UPDATE_SHADER`]）逐行对应同一套公式。

use crate::config::{EmitterParams, PositionMode, Viewport};
use crate::render::particles::particle::Particle;
use crate::render::particles::random_field::RandomField;
use crate::render::particles::store::ParticleStore;
use glam::Vec2;
use rayon::prelude::*;

/// 单步模拟所需的全部输入
///
/// 由帧驱动每帧按值构造并按引用传入，模拟阶段不读取任何全局状态。
#[derive(Debug, Clone, Copy)]
pub struct SimulationParams {
    pub emitter: EmitterParams,
    pub viewport: Viewport,
    /// 距上一帧的秒数
    pub time_delta: f32,
    /// 距启动的秒数
    pub total_time: f32,
}

impl SimulationParams {
    pub fn new(emitter: EmitterParams, viewport: Viewport, time_delta: f32, total_time: f32) -> Self {
        Self {
            emitter,
            viewport,
            time_delta,
            total_time,
        }
    }

    /// 实际使用的时间步长：负数或 NaN 都按 0 处理，`age` 不会倒退
    #[inline]
    pub fn clamped_delta(&self) -> f32 {
        self.time_delta.max(0.0)
    }

    /// 转换为 GPU uniform
    pub fn to_uniform(&self, field: &RandomField, particle_count: u32) -> SimulationUniforms {
        let e = &self.emitter;
        SimulationUniforms {
            gravity: e.gravity.to_array(),
            origin: e.origin.to_array(),
            viewport: self.viewport.size().to_array(),
            theta: [e.theta.min, e.theta.max],
            speed: [e.speed.min, e.speed.max],
            time_delta: self.clamped_delta(),
            total_time: self.total_time,
            particle_count,
            field_width: field.width(),
            field_height: field.height(),
            compound_position: u32::from(e.position_mode == PositionMode::Compounded),
        }
    }
}

/// 模拟 uniform（对应 WGSL `struct SimParams`，64 字节）
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SimulationUniforms {
    pub gravity: [f32; 2],
    pub origin: [f32; 2],
    pub viewport: [f32; 2],
    /// (min, max)
    pub theta: [f32; 2],
    /// (min, max)
    pub speed: [f32; 2],
    pub time_delta: f32,
    pub total_time: f32,
    pub particle_count: u32,
    pub field_width: u32,
    pub field_height: u32,
    /// 1 = 推进时再次除以视口
    pub compound_position: u32,
}

/// 根据随机值对计算出生方向与速率
///
/// 返回 `(theta, speed)`，分别落在 `[theta.min, theta.max]`、`[speed.min, speed.max]`。
#[inline]
pub fn spawn_direction(emitter: &EmitterParams, cell: [f32; 2]) -> (f32, f32) {
    let theta = emitter.theta.sample(cell[0]);
    let speed = emitter.speed.sample(cell[1]);
    (theta, speed)
}

/// 逐粒子更新规则
pub fn simulate_particle(
    index: u32,
    input: &Particle,
    field: &RandomField,
    params: &SimulationParams,
) -> Particle {
    let viewport = params.viewport.size();
    let emitter = &params.emitter;

    if input.is_due_for_rebirth() {
        let (theta, speed) = spawn_direction(emitter, field.cell_for(index));
        let direction = Vec2::new(theta.cos(), theta.sin());
        return Particle::new(emitter.origin / viewport, direction * speed, 0.0, input.life);
    }

    let dt = params.clamped_delta();
    let base = match emitter.position_mode {
        PositionMode::Compounded => input.position() / viewport,
        PositionMode::SpawnOnly => input.position(),
    };
    Particle::new(
        base + input.velocity() * dt,
        input.velocity() + emitter.gravity * dt,
        input.age + dt,
        input.life,
    )
}

/// 对全部粒子执行一次模拟：读 `read`，写 `write`
///
/// 两个切片长度必须相同。
pub fn simulate(
    read: &[Particle],
    write: &mut [Particle],
    field: &RandomField,
    params: &SimulationParams,
) {
    debug_assert_eq!(read.len(), write.len());
    write
        .par_iter_mut()
        .zip(read.par_iter())
        .enumerate()
        .for_each(|(index, (out, input))| {
            *out = simulate_particle(index as u32, input, field, params);
        });
}

/// 模拟一帧并交换角色，返回本帧写出的一代
pub fn step<'a>(
    store: &'a mut ParticleStore,
    field: &RandomField,
    params: &SimulationParams,
) -> &'a [Particle] {
    {
        let (read, write) = store.split();
        simulate(read, write, field, params);
    }
    store.swap();
    store.read()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnRange;
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(800, 600).unwrap()
    }

    fn field(r: f32, g: f32) -> RandomField {
        RandomField::from_cells(1, 1, vec![[r, g]]).unwrap()
    }

    fn params(dt: f32) -> SimulationParams {
        SimulationParams::new(EmitterParams::default(), viewport(), dt, 0.0)
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<SimulationUniforms>(), 64);
        assert_eq!(std::mem::offset_of!(SimulationUniforms, time_delta), 40);
        assert_eq!(std::mem::offset_of!(SimulationUniforms, compound_position), 60);
    }

    #[test]
    fn test_rebirth_resets_state() {
        let mut p = params(0.016);
        p.emitter.origin = Vec2::new(400.0, 300.0);
        let input = Particle::new(Vec2::new(5.0, 5.0), Vec2::new(3.0, 3.0), 2.0, 1.0);

        let out = simulate_particle(0, &input, &field(0.5, 0.5), &p);

        assert_eq!(out.age, 0.0);
        assert_eq!(out.life, 1.0);
        assert_eq!(out.position(), Vec2::new(0.5, 0.5));
        let speed = out.velocity().length();
        assert!((speed - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_rebirth_direction_from_cell() {
        let mut p = params(0.016);
        p.emitter.theta = SpawnRange::new(0.0, std::f32::consts::PI);
        p.emitter.speed = SpawnRange::new(2.0, 2.0);
        let input = Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 1.0);

        let out = simulate_particle(0, &input, &field(0.5, 0.0), &p);

        // theta = π/2 → 竖直向上
        assert!(out.velocity[0].abs() < 1e-5);
        assert!((out.velocity[1] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_reversed_ranges_follow_interpolation() {
        let emitter = EmitterParams {
            theta: SpawnRange::new(std::f32::consts::PI, 0.0),
            speed: SpawnRange::new(2.0, 1.0),
            ..Default::default()
        };

        let (theta, speed) = spawn_direction(&emitter, [0.25, 0.25]);

        assert_eq!(theta, std::f32::consts::PI + 0.25 * (0.0 - std::f32::consts::PI));
        assert_eq!(speed, 1.75);
    }

    #[test]
    fn test_reversed_range_changed_between_frames() {
        let mut p = params(0.016);
        p.emitter.theta = SpawnRange::new(std::f32::consts::PI, 0.0);
        p.emitter.speed = SpawnRange::new(2.0, 1.0);
        let input = Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 1.0);

        let out = simulate_particle(0, &input, &field(0.5, 0.5), &p);

        // theta = π/2，速率 1.5
        assert!(out.velocity[0].abs() < 1e-5);
        assert!((out.velocity[1] - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_advance_compounds_division() {
        let input = Particle::new(Vec2::new(400.0, 300.0), Vec2::new(1.0, 0.0), 0.0, 5.0);
        let out = simulate_particle(0, &input, &field(0.0, 0.0), &params(0.5));

        assert_eq!(out.position(), Vec2::new(0.5 + 0.5, 0.5));
        assert_eq!(out.velocity(), Vec2::new(1.0, -0.4));
        assert_eq!(out.age, 0.5);
        assert_eq!(out.life, 5.0);
    }

    #[test]
    fn test_advance_spawn_only_keeps_units() {
        let mut p = params(0.5);
        p.emitter.position_mode = PositionMode::SpawnOnly;
        let input = Particle::new(Vec2::new(0.25, -0.25), Vec2::new(1.0, 0.0), 0.0, 5.0);

        let out = simulate_particle(0, &input, &field(0.0, 0.0), &p);

        assert_eq!(out.position(), Vec2::new(0.75, -0.25));
    }

    #[test]
    fn test_zero_delta_does_not_age_or_kill() {
        let input = Particle::new(Vec2::ZERO, Vec2::new(1.0, 1.0), 0.5, 1.0);
        let out = simulate_particle(0, &input, &field(0.0, 0.0), &params(0.0));
        assert_eq!(out.age, 0.5);
        assert_eq!(out.velocity(), input.velocity());
        assert!(!out.is_due_for_rebirth());
    }

    #[test]
    fn test_negative_delta_clamped() {
        let input = Particle::new(Vec2::ZERO, Vec2::new(1.0, 1.0), 0.5, 1.0);
        let out = simulate_particle(0, &input, &field(0.0, 0.0), &params(-0.25));
        assert_eq!(out.age, 0.5);
        assert_eq!(out.velocity(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_zero_life_reborn_next_step() {
        let input = Particle::new(Vec2::ZERO, Vec2::ZERO, 0.0, 0.0);
        let out = simulate_particle(0, &input, &field(0.0, 0.0), &params(0.016));
        assert_eq!(out.age, 0.0);
        assert_eq!(out.life, 0.0);
        assert!((out.velocity().length() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let field = RandomField::from_cells(2, 2, vec![[0.1, 0.9], [0.3, 0.7], [0.5, 0.5], [0.7, 0.3]])
            .unwrap();
        let read: Vec<Particle> = (0..37)
            .map(|i| {
                let f = i as f32;
                Particle::new(Vec2::new(f, -f), Vec2::new(0.1 * f, 0.0), f * 0.1, 1.5)
            })
            .collect();
        let p = params(0.1);

        let mut parallel = vec![Particle::default(); read.len()];
        simulate(&read, &mut parallel, &field, &p);

        let sequential: Vec<Particle> = read
            .iter()
            .enumerate()
            .map(|(i, input)| simulate_particle(i as u32, input, &field, &p))
            .collect();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_uniform_from_params() {
        let mut p = params(-1.0);
        p.emitter.position_mode = PositionMode::SpawnOnly;
        let uniform = p.to_uniform(&field(0.0, 0.0), 10);
        assert_eq!(uniform.time_delta, 0.0);
        assert_eq!(uniform.viewport, [800.0, 600.0]);
        assert_eq!(uniform.particle_count, 10);
        assert_eq!(uniform.compound_position, 0);
    }

    proptest! {
        #[test]
        fn spawn_within_configured_ranges(
            r in 0.0f32..1.0,
            g in 0.0f32..1.0,
            theta_min in -3.0f32..3.0,
            theta_span in 0.0f32..3.0,
            speed_min in 0.0f32..10.0,
            speed_span in 0.0f32..10.0,
        ) {
            let emitter = EmitterParams {
                theta: SpawnRange::new(theta_min, theta_min + theta_span),
                speed: SpawnRange::new(speed_min, speed_min + speed_span),
                ..Default::default()
            };
            let (theta, speed) = spawn_direction(&emitter, [r, g]);
            prop_assert!(theta >= emitter.theta.min && theta <= emitter.theta.max);
            prop_assert!(speed >= emitter.speed.min && speed <= emitter.speed.max);
        }

        #[test]
        fn advance_preserves_life_and_ages(
            age in 0.0f32..5.0,
            extra in 0.001f32..5.0,
            dt in 0.0f32..0.1,
        ) {
            let life = age + extra;
            let input = Particle::new(Vec2::ZERO, Vec2::new(0.2, 0.3), age, life);
            let out = simulate_particle(0, &input, &field(0.5, 0.5), &params(dt));
            prop_assert_eq!(out.life, life);
            prop_assert!(out.age >= age);
            prop_assert_eq!(out.age, age + dt);
        }
    }
}
