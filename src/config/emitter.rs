use super::{ConfigError, ConfigResult};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// 闭区间 `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// 按 `t ∈ [0, 1)` 插值：`min + t * (max - min)`
    ///
    /// 结果夹回两个端点之间，舍入误差不会越界。运行时被改成
    /// `min > max` 的区间照常反向插值。
    #[inline]
    pub fn sample(&self, t: f32) -> f32 {
        let value = self.min + t * (self.max - self.min);
        value.max(self.min.min(self.max)).min(self.max.max(self.min))
    }

    /// 是否落在两个端点之间（与端点顺序无关）
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min.min(self.max) && value <= self.max.max(self.min)
    }

    fn validate(&self, name: &str) -> ConfigResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::ValidationError(format!(
                "Invalid {} range [{}, {}]",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// 推进阶段的位置单位处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionMode {
    /// 每次推进都把已归一化的位置再除以视口尺寸（参考行为，粒子会向原点收拢）
    #[default]
    Compounded,
    /// 只在出生时归一化一次，推进时直接累加速度
    SpawnOnly,
}

/// 发射器参数
///
/// 启动时校验一次，之后嵌入程序可以在帧与帧之间修改，
/// 下一次模拟立即生效，不再做额外校验。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitterParams {
    /// 重力（每秒速度增量）
    pub gravity: Vec2,
    /// 发射原点（像素坐标，出生时除以视口尺寸）
    pub origin: Vec2,
    /// 出生方向角范围（弧度，相对 +x 轴）
    pub theta: SpawnRange,
    /// 出生速率范围
    pub speed: SpawnRange,
    /// 推进阶段的单位处理
    #[serde(default)]
    pub position_mode: PositionMode,
}

impl Default for EmitterParams {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -0.8),
            origin: Vec2::ZERO,
            theta: SpawnRange::new(FRAC_PI_2 - 0.5, FRAC_PI_2 + 0.5),
            speed: SpawnRange::new(0.5, 1.0),
            position_mode: PositionMode::Compounded,
        }
    }
}

impl EmitterParams {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.gravity.is_finite() || !self.origin.is_finite() {
            return Err(ConfigError::ValidationError(
                "Emitter gravity and origin must be finite".to_string(),
            ));
        }
        self.theta.validate("theta")?;
        self.speed.validate("speed")?;
        Ok(())
    }
}
