use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};
use winit::window::{Window as WinitWindowRaw, WindowBuilder};

use crate::config::WindowConfig;
use crate::core::error::{EngineError, EngineResult};
use crate::platform::{InputEvent, KeyCode};

/// winit 窗口
///
/// 不可缩放；表面通过 [`WinitWindow::shared`] 持有同一个 `Arc`。
#[derive(Clone)]
pub struct WinitWindow {
    window: Arc<WinitWindowRaw>,
}

impl WinitWindow {
    pub fn new(event_loop: &EventLoop<()>, config: &WindowConfig) -> EngineResult<Self> {
        let window = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(false)
            .build(event_loop)
            .map_err(|e| EngineError::Window(e.to_string()))?;
        Ok(Self {
            window: Arc::new(window),
        })
    }

    pub fn id(&self) -> winit::window::WindowId {
        self.window.id()
    }

    /// 供渲染表面使用的共享句柄
    pub fn shared(&self) -> Arc<WinitWindowRaw> {
        Arc::clone(&self.window)
    }
}

impl crate::platform::Window for WinitWindow {
    fn size(&self) -> (u32, u32) {
        let s = self.window.inner_size();
        (s.width, s.height)
    }
    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
    fn request_redraw(&self) {
        self.window.request_redraw();
    }
    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

fn translate_key(key: PhysicalKey) -> KeyCode {
    match key {
        PhysicalKey::Code(WinitKeyCode::Escape) => KeyCode::Escape,
        PhysicalKey::Code(WinitKeyCode::Space) => KeyCode::Space,
        PhysicalKey::Code(WinitKeyCode::Enter) => KeyCode::Enter,
        _ => KeyCode::Unknown,
    }
}

/// 把 winit 窗口事件转换为平台输入事件；无关事件返回 `None`
pub fn translate_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested => Some(InputEvent::WindowCloseRequested),
        WindowEvent::Focused(focused) => Some(InputEvent::WindowFocused(*focused)),
        WindowEvent::KeyboardInput { event, .. } => {
            let key = translate_key(event.physical_key);
            Some(match event.state {
                ElementState::Pressed => InputEvent::KeyPressed { key },
                ElementState::Released => InputEvent::KeyReleased { key },
            })
        }
        _ => None,
    }
}
