//! 粒子记录与两种视图的布局

use glam::Vec2;

/// 粒子记录（对应 WGSL `struct Particle`）
///
/// 24 字节，模拟阶段和渲染阶段共享同一份布局。
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Particle {
    /// 位置（归一化设备坐标）
    pub position: [f32; 2],
    /// 速度
    pub velocity: [f32; 2],
    /// 自上次出生以来的秒数
    pub age: f32,
    /// 寿命（秒）
    pub life: f32,
}

pub const PARTICLE_SIZE: usize = std::mem::size_of::<Particle>();

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, age: f32, life: f32) -> Self {
        Self {
            position: position.to_array(),
            velocity: velocity.to_array(),
            age,
            life,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        Vec2::from_array(self.velocity)
    }

    /// `age >= life` 时下一次模拟会重生
    #[inline]
    pub fn is_due_for_rebirth(&self) -> bool {
        self.age >= self.life
    }

    /// 渲染视图：只暴露 `position`
    ///
    /// 步长仍是完整记录大小，其余字段对光栅化阶段不可见。
    pub fn render_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: PARTICLE_SIZE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBS,
        }
    }

    /// 模拟视图中存储缓冲区的最小绑定大小
    pub fn storage_binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(PARTICLE_SIZE as u64)
    }
}
