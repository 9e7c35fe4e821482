//! 核心模块
//!
//! - `engine` - 启动流程和事件循环
//! - `frame` - 帧驱动、帧时钟和帧钩子
//! - `error` - 错误类型定义

pub mod engine;
pub mod error;
pub mod frame;

// 重新导出错误类型
pub use error::{EngineError, EngineResult, RenderError, RenderResult};

// 重新导出主要类型
pub use engine::Engine;
pub use frame::{FrameClock, FrameDriver, FrameHook, FrameState, FrameTiming};
