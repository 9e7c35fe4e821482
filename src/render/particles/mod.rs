//! 乒乓粒子系统
//!
//! 粒子状态保存在两代缓冲区中，每帧读一代、写另一代，然后交换角色：
//!
//! ```text
//! ┌──────────────┐  simulate   ┌──────────────┐  render
//! │  read (N)    │ ──────────▶ │  write (N+1) │ ──────────▶ 点图元
//! └──────────────┘             └──────────────┘
//!         ▲                            │
//!         └────────── swap ◀───────────┘
//! ```
//!
//! - [`kernel`] 是逐粒子更新规则的 CPU 参考实现（rayon 并行）
//! - [`shaders`] 是同一规则的 WGSL 版本
//! - [`gpu`] 把两代缓冲区、随机场纹理与两条管线组装起来

pub mod gpu;
pub mod kernel;
pub mod particle;
pub mod population;
pub mod random_field;
pub mod shaders;
pub mod store;

pub use gpu::{workgroup_count, GpuParticleSystem};
pub use kernel::{simulate, simulate_particle, spawn_direction, step, SimulationParams, SimulationUniforms};
pub use particle::{Particle, PARTICLE_SIZE};
pub use population::initial_population;
pub use random_field::RandomField;
pub use store::{ParticleStore, PingPong};
