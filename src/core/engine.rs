//! 引擎主入口
//!
//! 启动顺序：配置 → 日志 → 窗口 → 渲染器 → 随机场与初始粒子群 → 帧循环。
//! 启动期任何失败都直接返回错误，不进入帧循环。

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;

use crate::config::{EngineConfig, LogLevel, Viewport};
use crate::core::frame::{FrameDriver, FrameHook, FrameState};
use crate::performance::FpsCounter;
use crate::platform::winit::{translate_event, WinitWindow};
use crate::platform::Window;
use crate::render::particles::{initial_population, GpuParticleSystem, RandomField};
use crate::render::wgpu::WgpuRenderer;

use super::error::{EngineError, EngineResult};

/// 屏保主结构
///
/// # 示例
///
/// ```no_run
/// use particle_screensaver::core::Engine;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     Engine::run()?;
///     Ok(())
/// }
/// ```
///
/// 嵌入程序可以通过 [`Engine::run_with`] 传入帧钩子，在帧与帧之间调整发射器参数：
///
/// ```no_run
/// use particle_screensaver::config::EngineConfig;
/// use particle_screensaver::core::Engine;
///
/// let config = EngineConfig::default();
/// Engine::run_with(
///     config,
///     Some(Box::new(|emitter, timing| {
///         emitter.origin.x = (timing.tt * 0.5).sin() * 200.0;
///     })),
/// )
/// .unwrap();
/// ```
pub struct Engine;

/// 帧缓冲尺寸与请求尺寸不一致时的说明
fn framebuffer_mismatch(window: &impl Window, requested: (u32, u32)) -> Option<String> {
    let (width, height) = window.size();
    ((width, height) != requested).then(|| {
        format!(
            "Framebuffer is {}x{} (requested {}x{}, scale factor {})",
            width,
            height,
            requested.0,
            requested.1,
            window.scale_factor()
        )
    })
}

impl Engine {
    /// 加载配置并运行
    ///
    /// 配置来源：配置文件（见 [`EngineConfig::load_with_source`]）加环境变量覆盖。
    pub fn run() -> EngineResult<()> {
        let (mut config, source) = EngineConfig::load_with_source()?;
        config.apply_env_overrides();

        Self::initialize_logging(config.logging.level);
        match source {
            Some(path) => tracing::info!(target: "config", "Loaded config from {:?}", path),
            None => tracing::info!(target: "config", "Using default configuration"),
        }

        Self::run_with(config, None)
    }

    /// 初始化日志系统
    ///
    /// `RUST_LOG` 优先，否则使用配置中的级别。
    fn initialize_logging(level: LogLevel) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        tracing::info!(target: "engine", "Particle screensaver starting");
    }

    /// 用给定配置运行，直到窗口关闭
    pub fn run_with(config: EngineConfig, hook: Option<FrameHook>) -> EngineResult<()> {
        config.validate()?;

        let event_loop = EventLoop::new()
            .map_err(|e| EngineError::EventLoop(format!("Failed to create event loop: {}", e)))?;
        let window = WinitWindow::new(&event_loop, &config.window)?;

        // 实际帧缓冲尺寸可能与请求的不同（高 DPI、窗口管理器约束）
        let (width, height) = window.size();
        let viewport = Viewport::new(width, height)?;
        if let Some(note) = framebuffer_mismatch(&window, (config.window.width, config.window.height)) {
            tracing::info!(target: "engine", "{}", note);
        }

        let renderer = pollster::block_on(WgpuRenderer::new(
            window.shared(),
            config.window.vsync,
            config.window.samples,
        ))?;

        let mut rng = match config.particles.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let field = RandomField::generate(
            config.particles.field_width,
            config.particles.field_height,
            &mut rng,
        );
        let initial = initial_population(&config.particles, viewport, &mut rng);
        let particles = GpuParticleSystem::new(
            renderer.device(),
            renderer.queue(),
            renderer.format(),
            renderer.sample_count(),
            &initial,
            field,
        );
        drop(initial);

        if !particles.is_fully_installed() {
            tracing::warn!(
                target: "engine",
                "Running with a disabled particle stage; see shader errors above"
            );
        }

        let start = Instant::now();
        let telemetry = FpsCounter::new(config.window.title.clone(), particles.particle_count(), start);
        let mut driver = FrameDriver::new(config.emitter, telemetry, start);
        if let Some(hook) = hook {
            driver = driver.with_hook(hook);
        }

        Self::run_event_loop(event_loop, window, renderer, particles, driver, viewport)
    }

    fn run_event_loop(
        event_loop: EventLoop<()>,
        window: WinitWindow,
        mut renderer: WgpuRenderer,
        mut particles: GpuParticleSystem,
        mut driver: FrameDriver,
        viewport: Viewport,
    ) -> EngineResult<()> {
        let window_id = window.id();

        let result = event_loop.run(move |event, elwt| match event {
            Event::WindowEvent {
                window_id: id,
                event,
            } if id == window_id => {
                if translate_event(&event).is_some_and(|input| input.requests_shutdown()) {
                    driver.stop();
                    elwt.exit();
                    return;
                }
                if let WindowEvent::RedrawRequested = event {
                    Self::render_frame(&window, &mut renderer, &mut particles, &mut driver, viewport);
                }
            }
            Event::AboutToWait => {
                if driver.state() != FrameState::Stopped {
                    window.request_redraw();
                }
            }
            Event::LoopExiting => {
                tracing::info!(target: "engine", "Shutting down");
            }
            _ => {}
        });

        result.map_err(|e| EngineError::EventLoop(format!("Event loop error: {}", e)))
    }

    /// 一帧：获取表面 → 模拟 → 渲染 → 交换 → 提交
    ///
    /// 逐帧错误只记录，不打断循环。
    fn render_frame(
        window: &WinitWindow,
        renderer: &mut WgpuRenderer,
        particles: &mut GpuParticleSystem,
        driver: &mut FrameDriver,
        viewport: Viewport,
    ) {
        let frame = match renderer.acquire_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(target: "render", "{}", e);
                return;
            }
        };

        let Some(timing) = driver.begin_frame(Instant::now()) else {
            return;
        };
        if let Some(title) = driver.take_title() {
            window.set_title(&title);
        }

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = renderer.create_encoder();
        let params = driver.simulation_params(viewport, timing);
        particles.frame(
            &mut encoder,
            renderer.queue(),
            renderer.color_target(&view),
            &params,
        );
        renderer.submit(encoder, frame);
    }
}
