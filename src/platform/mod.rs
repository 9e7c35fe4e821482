pub mod winit;

// ============================================================================
// Platform Window Abstraction
// ============================================================================

/// 平台窗口抽象
///
/// 帧循环只通过这个 trait 使用窗口，测试中可以替换为假窗口。
pub trait Window {
    fn size(&self) -> (u32, u32);
    fn scale_factor(&self) -> f64;
    fn request_redraw(&self);
    fn set_title(&self, title: &str);
}

// ============================================================================
// Input Abstraction
// ============================================================================

/// 屏保关心的输入事件
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyPressed { key: KeyCode },
    KeyReleased { key: KeyCode },
    WindowCloseRequested,
    WindowFocused(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Space,
    Enter,
    Unknown,
}

impl InputEvent {
    /// 是否请求结束帧循环
    pub fn requests_shutdown(&self) -> bool {
        matches!(
            self,
            InputEvent::WindowCloseRequested
                | InputEvent::KeyPressed {
                    key: KeyCode::Escape
                }
        )
    }
}
