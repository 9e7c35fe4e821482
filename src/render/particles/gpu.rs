//! GPU 粒子系统
//!
//! 两代粒子各是一个 `STORAGE | VERTEX` 缓冲区，每帧：
//!
//! 1. 计算通道读 `read`、写 `write`（绑定组按角色预先建好两份）
//! 2. 渲染通道把 `write` 当顶点缓冲区，只取 `position` 画点
//! 3. 交换角色
//!
//! 两个通道录制在同一个命令编码器里，wgpu 的资源追踪会在
//! storage 写入与 vertex 读取之间插入屏障，保证渲染看到完整的写入结果。

use crate::core::error::RenderResult;
use crate::render::particles::kernel::{SimulationParams, SimulationUniforms};
use crate::render::particles::particle::{Particle, PARTICLE_SIZE};
use crate::render::particles::random_field::RandomField;
use crate::render::particles::shaders::{
    RENDER_SHADER, RENDER_STAGE, UPDATE_SHADER, UPDATE_STAGE, WORKGROUP_SIZE,
};
use crate::render::particles::store::PingPong;
use crate::render::shader::{compile_shader, installed, link_pipeline};
use crate::render::wgpu::ColorTarget;
use wgpu::util::DeviceExt;

/// 覆盖 `particle_count` 个粒子所需的工作组数
pub fn workgroup_count(particle_count: u32) -> u32 {
    particle_count.div_ceil(WORKGROUP_SIZE)
}

/// GPU 粒子系统
pub struct GpuParticleSystem {
    /// 两代粒子缓冲区
    buffers: PingPong<wgpu::Buffer>,
    /// 模拟视图：第 i 个绑定组读槽位 i、写槽位 i^1
    simulate_bind_groups: [wgpu::BindGroup; 2],
    /// 模拟参数
    uniform_buffer: wgpu::Buffer,
    /// 随机场纹理（绑定组持有视图，这里保持纹理存活）
    _noise_texture: wgpu::Texture,
    /// 模拟管线；编译失败时为空
    update_pipeline: Option<wgpu::ComputePipeline>,
    /// 渲染管线；编译失败时为空
    render_pipeline: Option<wgpu::RenderPipeline>,
    field: RandomField,
    particle_count: u32,
}

impl GpuParticleSystem {
    /// 创建 GPU 粒子系统
    ///
    /// 两代缓冲区用同一份 `initial` 填充。`sample_count` 必须与渲染目标一致。
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        sample_count: u32,
        initial: &[Particle],
        field: RandomField,
    ) -> Self {
        let particle_count = initial.len() as u32;

        let buffers = PingPong::new(
            Self::create_particle_buffer(device, "Particle Buffer A", initial),
            Self::create_particle_buffer(device, "Particle Buffer B", initial),
        );

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Simulation Uniforms"),
            size: std::mem::size_of::<SimulationUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let noise_texture = Self::create_noise_texture(device, queue, &field);
        let noise_view = noise_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group_layout = Self::create_simulate_layout(device);
        let simulate_bind_groups = [0usize, 1].map(|read| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(if read == 0 {
                    "Particle Simulate A->B"
                } else {
                    "Particle Simulate B->A"
                }),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: buffers.slot(read).as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffers.slot(read ^ 1).as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(&noise_view),
                    },
                ],
            })
        });

        let update_pipeline = installed(Self::create_update_pipeline(device, &bind_group_layout));
        let render_pipeline = installed(Self::create_render_pipeline(
            device,
            target_format,
            sample_count,
        ));

        tracing::info!(
            target: "particles",
            "Created particle buffers: {} particles x {} bytes, random field {}x{}",
            particle_count,
            PARTICLE_SIZE,
            field.width(),
            field.height()
        );

        Self {
            buffers,
            simulate_bind_groups,
            uniform_buffer,
            _noise_texture: noise_texture,
            update_pipeline,
            render_pipeline,
            field,
            particle_count,
        }
    }

    fn create_particle_buffer(
        device: &wgpu::Device,
        label: &str,
        initial: &[Particle],
    ) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(initial),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn create_noise_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        field: &RandomField,
    ) -> wgpu::Texture {
        device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Particle Random Field"),
                size: wgpu::Extent3d {
                    width: field.width(),
                    height: field.height(),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rg32Float,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            field.as_bytes(),
        )
    }

    fn create_simulate_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let storage = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: Particle::storage_binding_size(),
            },
            count: None,
        };

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Simulate Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<SimulationUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
                storage(1, true),
                storage(2, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        })
    }

    fn create_update_pipeline(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> RenderResult<wgpu::ComputePipeline> {
        let shader = compile_shader(device, UPDATE_STAGE, UPDATE_SHADER)?;
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Update Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        link_pipeline(device, UPDATE_STAGE, |device| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("Particle Update Pipeline"),
                layout: Some(&layout),
                module: &shader,
                entry_point: "main",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            })
        })
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> RenderResult<wgpu::RenderPipeline> {
        let shader = compile_shader(device, RENDER_STAGE, RENDER_SHADER)?;
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Render Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        link_pipeline(device, RENDER_STAGE, |device| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Particle Render Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[Particle::render_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: target_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                // 点图元在 WebGPU 中固定为单像素
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::PointList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    ..Default::default()
                },
                multiview: None,
            })
        })
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    /// 两个阶段是否都已安装
    pub fn is_fully_installed(&self) -> bool {
        self.update_pipeline.is_some() && self.render_pipeline.is_some()
    }

    /// 模拟阶段：读 `read` 代，写 `write` 代
    pub fn simulate(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        params: &SimulationParams,
    ) {
        let Some(pipeline) = &self.update_pipeline else {
            return;
        };

        let uniforms = params.to_uniform(&self.field, self.particle_count);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Particle Simulate Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.simulate_bind_groups[self.buffers.read_index()], &[]);
        pass.dispatch_workgroups(workgroup_count(self.particle_count), 1, 1);
    }

    /// 渲染阶段：从刚写好的一代读取位置并画点
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: ColorTarget<'_>) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Particle Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.view,
                resolve_target: target.resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if let Some(pipeline) = &self.render_pipeline {
            pass.set_pipeline(pipeline);
            pass.set_vertex_buffer(0, self.buffers.write().slice(..));
            pass.draw(0..self.particle_count, 0..1);
        }
    }

    /// 交换读写角色
    pub fn swap(&mut self) {
        self.buffers.swap();
    }

    /// 完整的一帧：模拟、渲染、交换
    pub fn frame(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        target: ColorTarget<'_>,
        params: &SimulationParams,
    ) {
        self.simulate(encoder, queue, params);
        self.render(encoder, target);
        self.swap();
    }
}
