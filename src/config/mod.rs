/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖和启动期校验
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod emitter;
pub mod particles;
pub mod window;

pub use emitter::{EmitterParams, PositionMode, SpawnRange};
pub use particles::{ParticleConfig, MAX_FIELD_SIZE, MAX_PARTICLE_COUNT};
pub use window::{Viewport, WindowConfig};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 默认配置文件名
const CONFIG_TOML: &str = "particles.toml";
const CONFIG_JSON: &str = "particles.json";

/// 主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 粒子数量与寿命
    #[serde(default)]
    pub particles: ParticleConfig,

    /// 发射器参数（运行时可调）
    #[serde(default)]
    pub emitter: EmitterParams,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    ///
    /// 无法解析的值会被忽略，保留原配置。
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(
            lookup: &dyn Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            lookup(key).and_then(|val| val.trim().parse().ok())
        }

        // 窗口配置
        if let Some(width) = parsed(&lookup, "PARTICLES_WINDOW_WIDTH") {
            self.window.width = width;
        }
        if let Some(height) = parsed(&lookup, "PARTICLES_WINDOW_HEIGHT") {
            self.window.height = height;
        }
        if let Some(vsync) = parsed(&lookup, "PARTICLES_VSYNC") {
            self.window.vsync = vsync;
        }
        if let Some(samples) = parsed(&lookup, "PARTICLES_SAMPLES") {
            self.window.samples = samples;
        }

        // 粒子配置
        if let Some(count) = parsed(&lookup, "PARTICLES_COUNT") {
            self.particles.count = count;
        }
        if let Some(min_age) = parsed(&lookup, "PARTICLES_MIN_AGE") {
            self.particles.min_age = min_age;
        }
        if let Some(max_age) = parsed(&lookup, "PARTICLES_MAX_AGE") {
            self.particles.max_age = max_age;
        }
        if let Some(seed) = parsed(&lookup, "PARTICLES_SEED") {
            self.particles.seed = Some(seed);
        }
    }

    /// 验证配置
    ///
    /// 所有启动期检查都在这里完成，帧循环内不再校验。
    pub fn validate(&self) -> ConfigResult<()> {
        self.window.validate()?;
        self.particles.validate()?;
        self.emitter.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./particles.toml
    /// 2. ./particles.json
    /// 3. <用户配置目录>/particle_screensaver/particles.toml
    ///
    /// 返回配置和来源路径；都不存在时返回默认配置和 `None`。
    /// 文件存在但无法解析时返回错误。
    pub fn load_with_source() -> ConfigResult<(Self, Option<PathBuf>)> {
        let mut candidates = vec![PathBuf::from(CONFIG_TOML), PathBuf::from(CONFIG_JSON)];
        candidates.extend(Self::user_config_path());

        for path in candidates {
            if !path.is_file() {
                continue;
            }
            let config = if path.extension().is_some_and(|ext| ext == "json") {
                Self::from_json_file(&path)?
            } else {
                Self::from_toml_file(&path)?
            };
            return Ok((config, Some(path)));
        }

        Ok((Self::default(), None))
    }

    /// 加载配置，任何失败都回退到默认配置
    pub fn load_or_default() -> Self {
        match Self::load_with_source() {
            Ok((config, Some(path))) => {
                tracing::info!(target: "config", "Loaded config from {:?}", path);
                config
            }
            Ok((config, None)) => {
                tracing::info!(target: "config", "Using default configuration");
                config
            }
            Err(e) => {
                tracing::warn!(target: "config", "{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// 用户级配置文件路径
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("particle_screensaver").join(CONFIG_TOML))
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别（未设置 `RUST_LOG` 时生效）
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
        }
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// 作为 `EnvFilter` 指令使用的字符串
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
