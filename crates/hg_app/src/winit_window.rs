use std::collections::VecDeque;
use std::sync::Arc;

use hg_core::view::Extent;
use hg_core::{Shutdown, Windowing};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

/// Adapts winit's callback delivery to the poll model of the frame loop:
/// `window_event` queues, the loop drains the queue once per iteration.
pub struct WinitWindowing {
    pub window: Arc<Window>,
    pending: VecDeque<WindowEvent>,
    quit_on_escape: bool,
}

impl WinitWindowing {
    pub fn new(window: Arc<Window>, quit_on_escape: bool) -> Self {
        Self {
            window,
            pending: VecDeque::new(),
            quit_on_escape,
        }
    }

    pub fn push(&mut self, event: WindowEvent) {
        self.pending.push_back(event);
    }
}

impl Windowing for WinitWindowing {
    type Event = WindowEvent;

    fn poll_event(&mut self) -> Option<WindowEvent> {
        self.pending.pop_front()
    }

    fn is_quit(&self, event: &WindowEvent) -> bool {
        is_quit_event(event, self.quit_on_escape)
    }

    fn live_size(&self) -> Extent {
        let size = self.window.inner_size();
        Extent::new(size.width, size.height)
    }
}

impl Shutdown for WinitWindowing {
    fn shutdown(self) {
        if Arc::strong_count(&self.window) > 1 {
            log::warn!("Window still referenced elsewhere at shutdown");
        }
        drop(self.window);
        log::info!("Window destroyed");
    }
}

pub fn is_quit_event(event: &WindowEvent, quit_on_escape: bool) -> bool {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => true,
        WindowEvent::KeyboardInput { event, .. } => {
            quit_on_escape && pressed_key(event) == Some(KeyCode::Escape)
        }
        _ => false,
    }
}

/// Key code of a fresh press; releases and auto-repeat are ignored.
pub fn pressed_key(event: &KeyEvent) -> Option<KeyCode> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    match event.physical_key {
        PhysicalKey::Code(code) => Some(code),
        PhysicalKey::Unidentified(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn close_and_destroy_are_quit_events() {
        assert!(is_quit_event(&WindowEvent::CloseRequested, false));
        assert!(is_quit_event(&WindowEvent::Destroyed, false));
    }

    #[test]
    fn resize_and_focus_are_not_quit_events() {
        assert!(!is_quit_event(
            &WindowEvent::Resized(PhysicalSize::new(800, 600)),
            true
        ));
        assert!(!is_quit_event(&WindowEvent::Focused(true), true));
    }
}
