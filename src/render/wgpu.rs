use std::sync::Arc;

use winit::window::Window;

use crate::core::error::{RenderError, RenderResult};

/// 实际使用的多重采样数
///
/// 请求 1 或适配器不支持请求值时返回 1。
pub fn effective_sample_count(requested: u32, supported: impl Fn(u32) -> bool) -> u32 {
    if requested <= 1 {
        return 1;
    }
    if supported(requested) {
        requested
    } else {
        tracing::warn!(
            target: "render",
            "{}x MSAA not supported by the surface format, rendering without multisampling",
            requested
        );
        1
    }
}

/// 渲染通道的颜色附件：多重采样时画到 MSAA 纹理并解析到表面
#[derive(Clone, Copy)]
pub struct ColorTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub resolve_target: Option<&'a wgpu::TextureView>,
}

/// wgpu 渲染器：持有表面、设备与队列
///
/// 窗口不可缩放，表面尺寸在创建时固定为窗口的物理内部尺寸；
/// 表面丢失或过期时按同一配置重新配置。
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    msaa_view: Option<wgpu::TextureView>,
}

impl WgpuRenderer {
    pub async fn new(window: Arc<Window>, vsync: bool, samples: u32) -> RenderResult<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!(
            target: "render",
            "Using adapter: {} ({:?}, {:?})",
            info.name,
            info.device_type,
            info.backend
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Particle Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

        // 逐帧驱动诊断只记录，不打断帧循环
        device.on_uncaptured_error(Box::new(|error| {
            tracing::error!(target: "render", "GPU error: {}", error);
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| RenderError::SurfaceCreation("surface reports no formats".to_string()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            target: "render",
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            format,
            present_mode
        );

        let flags = adapter.get_texture_format_features(format).flags;
        let sample_count = effective_sample_count(samples, |n| flags.sample_count_supported(n));
        let msaa_view = (sample_count > 1).then(|| Self::create_msaa_view(&device, &config, sample_count));
        tracing::info!(target: "render", "MSAA sample count: {}x", sample_count);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sample_count,
            msaa_view,
        })
    }

    fn create_msaa_view(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Particle MSAA Target"),
                size: wgpu::Extent3d {
                    width: config.width,
                    height: config.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: config.format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// 本帧的颜色附件
    pub fn color_target<'a>(&'a self, frame_view: &'a wgpu::TextureView) -> ColorTarget<'a> {
        match &self.msaa_view {
            Some(msaa_view) => ColorTarget {
                view: msaa_view,
                resolve_target: Some(frame_view),
            },
            None => ColorTarget {
                view: frame_view,
                resolve_target: None,
            },
        }
    }

    /// 获取下一帧的表面纹理
    ///
    /// 返回 `Ok(None)` 表示本帧跳过（超时或表面刚被重新配置）。
    pub fn acquire_frame(&mut self) -> RenderResult<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!(target: "render", "Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!(target: "render", "Surface acquire timed out, skipping frame");
                Ok(None)
            }
            Err(error) => Err(RenderError::Surface(error.to_string())),
        }
    }

    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Particle Frame Encoder"),
            })
    }

    /// 提交命令并呈现
    pub fn submit(&self, encoder: wgpu::CommandEncoder, frame: wgpu::SurfaceTexture) {
        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
