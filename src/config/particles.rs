use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 随机场默认边长
pub const DEFAULT_FIELD_SIZE: u32 = 512;

/// 随机场边长上限（`Limits::default().max_texture_dimension_2d`）
pub const MAX_FIELD_SIZE: u32 = 8192;

/// 单次调度最多 65535 个工作组，每组 64 个粒子
pub const MAX_PARTICLE_COUNT: u32 = 65_535 * 64;

/// 粒子数量、寿命分布与随机场配置
///
/// 这些值只在启动时读取一次。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// 粒子总数
    pub count: u32,

    /// 最短寿命（秒）
    pub min_age: f32,

    /// 最长寿命（秒）
    pub max_age: f32,

    /// 随机种子；为空时从系统熵中取
    #[serde(default)]
    pub seed: Option<u64>,

    /// 随机场宽度
    #[serde(default = "default_field_size")]
    pub field_width: u32,

    /// 随机场高度
    #[serde(default = "default_field_size")]
    pub field_height: u32,
}

fn default_field_size() -> u32 {
    DEFAULT_FIELD_SIZE
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 200_000,
            min_age: 1.0,
            max_age: 2.0,
            seed: None,
            field_width: DEFAULT_FIELD_SIZE,
            field_height: DEFAULT_FIELD_SIZE,
        }
    }
}

impl ParticleConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.count == 0 {
            return Err(ConfigError::ValidationError(
                "Particle count must be positive".to_string(),
            ));
        }
        if self.count > MAX_PARTICLE_COUNT {
            return Err(ConfigError::ValidationError(format!(
                "Particle count {} exceeds the maximum of {}",
                self.count, MAX_PARTICLE_COUNT
            )));
        }
        if !self.min_age.is_finite() || !self.max_age.is_finite() {
            return Err(ConfigError::ValidationError(
                "Particle lifetime bounds must be finite".to_string(),
            ));
        }
        if self.min_age < 0.0 || self.min_age > self.max_age {
            return Err(ConfigError::ValidationError(format!(
                "Invalid lifetime range [{}, {}]",
                self.min_age, self.max_age
            )));
        }
        if self.field_width == 0 || self.field_height == 0 {
            return Err(ConfigError::ValidationError(
                "Random field dimensions must be positive".to_string(),
            ));
        }
        if self.field_width > MAX_FIELD_SIZE || self.field_height > MAX_FIELD_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "Random field {}x{} exceeds the maximum texture size of {}",
                self.field_width, self.field_height, MAX_FIELD_SIZE
            )));
        }
        Ok(())
    }
}
