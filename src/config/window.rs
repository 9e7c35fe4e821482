use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口标题（遥测信息会追加在后面）
    pub title: String,

    /// 视口宽度（像素）
    pub width: u32,

    /// 视口高度（像素）
    pub height: u32,

    /// 垂直同步
    pub vsync: bool,

    /// 多重采样数（1 表示关闭），适配器不支持时退回 1
    #[serde(default = "default_samples")]
    pub samples: u32,
}

fn default_samples() -> u32 {
    4
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Particle Screen Saver".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            samples: default_samples(),
        }
    }
}

impl WindowConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Window title must not be empty".to_string(),
            ));
        }
        if !matches!(self.samples, 1 | 2 | 4 | 8) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid sample count {}: expected 1, 2, 4 or 8",
                self.samples
            )));
        }
        self.viewport().map(|_| ())
    }

    /// 构造已校验的视口
    pub fn viewport(&self) -> ConfigResult<Viewport> {
        Viewport::new(self.width, self.height)
    }
}

/// 视口尺寸
///
/// 只能通过 [`Viewport::new`] 构造，宽高都非零，
/// 因此模拟阶段里的除法永远不会除以零。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> ConfigResult<Self> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ValidationError(format!(
                "Invalid viewport {}x{}: both dimensions must be positive",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 以浮点向量表示的尺寸，用于坐标归一化
    pub fn size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32, self.height as f32)
    }
}
