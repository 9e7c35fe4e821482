use std::time::{Duration, Instant};

/// 标题刷新间隔
pub const TITLE_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// 一次遥测快照
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsSample {
    /// 上一个刷新周期内的平均帧率
    pub fps: f64,
    /// 距启动的秒数
    pub uptime: Duration,
}

/// 帧率计数器
///
/// 每秒最多产出一次新的窗口标题：
/// `"{title} [FPS: n][ UP-TIME: s][ PARTICLE-COUNT: n]"`。
#[derive(Debug, Clone)]
pub struct FpsCounter {
    title: String,
    particle_count: u32,
    start: Instant,
    last_refresh: Instant,
    frames_since_refresh: u32,
    last_sample: Option<FpsSample>,
}

impl FpsCounter {
    pub fn new(title: impl Into<String>, particle_count: u32, start: Instant) -> Self {
        Self {
            title: title.into(),
            particle_count,
            start,
            last_refresh: start,
            frames_since_refresh: 0,
            last_sample: None,
        }
    }

    /// 记录一帧；到达刷新间隔时返回新标题
    pub fn record_frame(&mut self, now: Instant) -> Option<String> {
        self.frames_since_refresh += 1;

        let elapsed = now.saturating_duration_since(self.last_refresh);
        if elapsed < TITLE_REFRESH_INTERVAL {
            return None;
        }

        let sample = FpsSample {
            fps: f64::from(self.frames_since_refresh) / elapsed.as_secs_f64(),
            uptime: now.saturating_duration_since(self.start),
        };
        self.frames_since_refresh = 0;
        self.last_refresh = now;
        self.last_sample = Some(sample);

        tracing::debug!(
            target: "engine",
            "fps={:.1} uptime={}s particles={}",
            sample.fps,
            sample.uptime.as_secs(),
            self.particle_count
        );

        Some(self.format_title(&sample))
    }

    pub fn last_sample(&self) -> Option<FpsSample> {
        self.last_sample
    }

    pub fn format_title(&self, sample: &FpsSample) -> String {
        format!(
            "{} [FPS: {}][ UP-TIME: {}][ PARTICLE-COUNT: {}]",
            self.title,
            sample.fps.round() as u64,
            sample.uptime.as_secs(),
            self.particle_count
        )
    }
}
