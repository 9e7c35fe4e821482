pub mod particles;
pub mod shader;
pub mod wgpu;

pub use particles::{GpuParticleSystem, Particle, ParticleStore, RandomField, SimulationParams};
pub use wgpu::WgpuRenderer;
