//! 帧驱动
//!
//! 状态：`Idle`（第一帧之前）→ `Running` → `Stopped`（收到关闭请求）。
//! 每个 `Running` 帧计算 `dt`（距上一帧）与 `tt`（距启动），
//! 运行帧钩子，然后交给模拟与渲染阶段。关闭请求只在帧与帧之间生效。

use std::time::Instant;

use crate::config::{EmitterParams, Viewport};
use crate::performance::FpsCounter;
use crate::render::particles::SimulationParams;

/// 一帧的时间信息（秒）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// 距上一帧
    pub dt: f32,
    /// 距启动
    pub tt: f32,
}

/// 帧时钟
///
/// 时间点由调用方传入，测试时可以构造任意序列。
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self { start, last: start }
    }

    /// 推进到 `now`
    ///
    /// `now` 早于上一帧时 `dt` 为 0。
    pub fn tick(&mut self, now: Instant) -> FrameTiming {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        let tt = now.saturating_duration_since(self.start).as_secs_f32();
        if now > self.last {
            self.last = now;
        }
        FrameTiming { dt, tt }
    }
}

/// 帧驱动状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    Running,
    Stopped,
}

/// 帧钩子：在每次模拟之前修改发射器参数
pub type FrameHook = Box<dyn FnMut(&mut EmitterParams, FrameTiming)>;

/// 帧驱动
pub struct FrameDriver {
    state: FrameState,
    clock: FrameClock,
    emitter: EmitterParams,
    hook: Option<FrameHook>,
    telemetry: FpsCounter,
    pending_title: Option<String>,
    frame_count: u64,
}

impl FrameDriver {
    pub fn new(emitter: EmitterParams, telemetry: FpsCounter, start: Instant) -> Self {
        Self {
            state: FrameState::Idle,
            clock: FrameClock::new(start),
            emitter,
            hook: None,
            telemetry,
            pending_title: None,
            frame_count: 0,
        }
    }

    pub fn with_hook(mut self, hook: FrameHook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// 开始一帧
    ///
    /// 已停止时返回 `None`。
    pub fn begin_frame(&mut self, now: Instant) -> Option<FrameTiming> {
        match self.state {
            FrameState::Stopped => return None,
            FrameState::Idle => {
                tracing::debug!(target: "engine", "Frame driver running");
                self.state = FrameState::Running;
            }
            FrameState::Running => {}
        }

        let timing = self.clock.tick(now);
        if let Some(hook) = self.hook.as_mut() {
            hook(&mut self.emitter, timing);
        }
        if let Some(title) = self.telemetry.record_frame(now) {
            self.pending_title = Some(title);
        }
        self.frame_count += 1;

        Some(timing)
    }

    /// 本帧的模拟参数
    pub fn simulation_params(&self, viewport: Viewport, timing: FrameTiming) -> SimulationParams {
        SimulationParams::new(self.emitter, viewport, timing.dt, timing.tt)
    }

    /// 取出待更新的窗口标题
    pub fn take_title(&mut self) -> Option<String> {
        self.pending_title.take()
    }

    /// 请求停止；下一次 `begin_frame` 返回 `None`
    pub fn stop(&mut self) {
        if self.state != FrameState::Stopped {
            tracing::info!(
                target: "engine",
                "Frame driver stopped after {} frames",
                self.frame_count
            );
            self.state = FrameState::Stopped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::time::Duration;

    fn driver(start: Instant) -> FrameDriver {
        FrameDriver::new(
            EmitterParams::default(),
            FpsCounter::new("test", 4, start),
            start,
        )
    }

    #[test]
    fn test_clock_dt_and_tt() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);

        let first = clock.tick(start + Duration::from_millis(16));
        assert!((first.dt - 0.016).abs() < 1e-6);
        assert!((first.tt - 0.016).abs() < 1e-6);

        let second = clock.tick(start + Duration::from_millis(48));
        assert!((second.dt - 0.032).abs() < 1e-6);
        assert!((second.tt - 0.048).abs() < 1e-6);
    }

    #[test]
    fn test_clock_never_negative() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start + Duration::from_millis(10));
        let timing = clock.tick(start);
        assert_eq!(timing.dt, 0.0);
        assert_eq!(timing.tt, 0.0);
    }

    #[test]
    fn test_state_transitions() {
        let start = Instant::now();
        let mut driver = driver(start);
        assert_eq!(driver.state(), FrameState::Idle);

        assert!(driver.begin_frame(start).is_some());
        assert_eq!(driver.state(), FrameState::Running);

        driver.stop();
        assert_eq!(driver.state(), FrameState::Stopped);
        assert!(driver
            .begin_frame(start + Duration::from_millis(16))
            .is_none());
        assert_eq!(driver.frame_count(), 1);
    }

    #[test]
    fn test_hook_changes_next_params() {
        let start = Instant::now();
        let mut driver = driver(start).with_hook(Box::new(|emitter, timing| {
            emitter.origin = Vec2::new(timing.tt * 100.0, 0.0);
        }));
        let viewport = Viewport::new(800, 600).unwrap();

        let timing = driver.begin_frame(start + Duration::from_secs(2)).unwrap();
        let params = driver.simulation_params(viewport, timing);

        assert_eq!(params.emitter.origin, Vec2::new(200.0, 0.0));
        assert_eq!(params.time_delta, timing.dt);
        assert_eq!(params.total_time, timing.tt);
    }

    #[test]
    fn test_title_published_once_per_second() {
        let start = Instant::now();
        let mut driver = driver(start);

        driver.begin_frame(start + Duration::from_millis(500));
        assert!(driver.take_title().is_none());

        driver.begin_frame(start + Duration::from_millis(1000));
        let title = driver.take_title().unwrap();
        assert!(title.starts_with("test [FPS: 2]"));
        assert!(driver.take_title().is_none());
    }
}
