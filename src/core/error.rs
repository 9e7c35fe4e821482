//! 统一错误处理模块
//!
//! 错误分为三类：
//!
//! - **启动期致命错误**：窗口、适配器、设备创建失败，`Engine::run` 直接返回错误，不进入帧循环
//! - **着色器编译/链接错误**：记录阶段名称与诊断信息，对应管线不安装，之后的绘制变为空操作
//! - **逐帧驱动诊断**：异步记录日志，从不打断帧循环
//!
//! 配置错误定义在 [`crate::config::ConfigError`]，可以通过 `?` 转换为 `EngineError`。

use crate::config::ConfigError;
use thiserror::Error;

/// 引擎核心错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Initialization error: {0}")]
    Init(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Window creation failed: {0}")]
    Window(String),

    #[error("Event loop error: {0}")]
    EventLoop(String),
}

/// 渲染系统错误
#[derive(Error, Debug, Clone)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),

    #[error("Failed to request adapter: no compatible GPU found")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    DeviceRequest(String),

    #[error("[{stage}] Shader compilation failed:\n{message}")]
    ShaderCompilation { stage: String, message: String },

    #[error("[{label}] Pipeline creation failed:\n{message}")]
    PipelineCreation { label: String, message: String },

    #[error("Surface error: {0}")]
    Surface(String),
}

/// 引擎结果类型别名
pub type EngineResult<T> = Result<T, EngineError>;
pub type RenderResult<T> = Result<T, RenderError>;
