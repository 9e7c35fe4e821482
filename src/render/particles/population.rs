//! 初始粒子群
//!
//! 每个粒子的 `age = life + 1`，第一次模拟就会全部重生，
//! 随机位置只是占位，出生时会被覆盖。

use crate::config::{ParticleConfig, Viewport};
use crate::render::particles::particle::Particle;
use glam::Vec2;
use rand::Rng;

/// 生成初始粒子群
///
/// * `life` 在 `[min_age, max_age]` 内均匀采样
/// * `position` 在 `[-w, w] × [-h, h]` 内均匀采样
/// * `velocity` 为零
pub fn initial_population<R: Rng + ?Sized>(
    config: &ParticleConfig,
    viewport: Viewport,
    rng: &mut R,
) -> Vec<Particle> {
    let extent = viewport.size();
    (0..config.count)
        .map(|_| {
            let life = config.min_age + rng.gen::<f32>() * (config.max_age - config.min_age);
            let position = Vec2::new(
                -extent.x + rng.gen::<f32>() * (2.0 * extent.x),
                -extent.y + rng.gen::<f32>() * (2.0 * extent.y),
            );
            Particle::new(position, Vec2::ZERO, life + 1.0, life)
        })
        .collect()
}
