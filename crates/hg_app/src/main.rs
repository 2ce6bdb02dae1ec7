//! hello_gpu -- window, GPU backend and UI overlay bootstrap with a basic
//! render loop.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`.
//!
//!   1. `resumed()` -- create the window, the wgpu backend and the egui
//!      overlay; a failure here ends the process with exit code 1
//!   2. `window_event()` -- queue the event for the next loop iteration
//!   3. `about_to_wait()` -- one `FrameLoop` iteration: drain the queue, follow
//!      the window size, draw the debug text and UI, present
//!   4. while minimized -- switch to `ControlFlow::Wait` until a resize
//!      restores a drawable size
//!   5. after `run_app` returns -- release UI, backend, window in that order
//!
//! Pacing comes from the present mode (FIFO with vsync on), not from winit,
//! except while minimized.

mod content;
mod logo;
mod winit_window;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowId};

use content::DemoContent;
use hg_core::view::DebugFlags;
use hg_core::{
    AppConfig, ExitStatus, FrameHooks, FrameLoop, Lifecycle, LoopControl, RenderBackend,
    Shutdown, StartupError,
};
use hg_devtools::{OverlayStats, UiOverlay};
use hg_render::GpuBackend;
use winit_window::{pressed_key, WinitWindowing};

/// Everything acquired at startup. Fields are released by `shutdown` in
/// reverse acquisition order: UI, backend, window.
struct AppParts {
    window: WinitWindowing,
    backend: GpuBackend,
    ui: UiOverlay,
    content: DemoContent,
    frame_loop: FrameLoop,
}

impl AppParts {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self, StartupError> {
        let window = hg_platform::create_window(event_loop, &config.window)?;
        log::info!(
            "Window created: {}x{}",
            config.window.width,
            config.window.height
        );
        let backend = GpuBackend::new(window.clone(), config)?;
        let ui = UiOverlay::new(&window, config.ui.show_demo_window);
        let frame_loop = FrameLoop::new(backend.size(), config.reset_flags());

        Ok(Self {
            window: WinitWindowing::new(window, config.ui.quit_on_escape),
            backend,
            ui,
            content: DemoContent::new(),
            frame_loop,
        })
    }

    fn step(&mut self) -> LoopControl {
        let mut hooks = DemoHooks {
            window: self.window.window.clone(),
            ui: &mut self.ui,
            content: &mut self.content,
        };
        self.frame_loop
            .iterate(&mut self.window, &mut self.backend, &mut hooks)
    }
}

impl Shutdown for AppParts {
    fn shutdown(self) {
        release(self.window, self.backend, self.ui);
    }
}

/// Takes the parts in acquisition order; the tuple releases them back to
/// front: UI, backend, window.
fn release<W: Shutdown, B: Shutdown, U: Shutdown>(window: W, backend: B, ui: U) {
    (window, backend, ui).shutdown();
}

/// Block on events while nothing can be presented; otherwise present pacing
/// drives the loop.
fn control_flow_for(frame_loop: &FrameLoop) -> ControlFlow {
    if frame_loop.is_idle() {
        ControlFlow::Wait
    } else {
        ControlFlow::Poll
    }
}

struct DemoHooks<'a> {
    window: Arc<Window>,
    ui: &'a mut UiOverlay,
    content: &'a mut DemoContent,
}

impl FrameHooks<WindowEvent, GpuBackend> for DemoHooks<'_> {
    fn on_event(&mut self, event: &WindowEvent) {
        let egui_consumed = self.ui.handle_window_event(&self.window, event);
        if egui_consumed {
            return;
        }
        if let WindowEvent::KeyboardInput { event, .. } = event {
            match pressed_key(event) {
                Some(KeyCode::F1) => self.ui.toggle_stats(),
                Some(KeyCode::F3) => self.ui.toggle_demo(),
                _ => {}
            }
        }
    }

    fn draw(&mut self, backend: &mut GpuBackend, _size: hg_core::view::Extent) {
        self.content.clock.tick();

        let stats = backend.stats();
        let show_text = backend.debug_flags().contains(DebugFlags::TEXT);
        if show_text {
            self.content
                .write_debug_text(backend.debug_text_mut(), &stats);
        }

        let info = backend.adapter_info();
        let overlay_stats = OverlayStats {
            frame: stats,
            smoothed_fps: self.content.clock.smoothed_fps,
            smoothed_frame_time_ms: self.content.clock.smoothed_frame_time_ms,
            adapter_label: format!("{} ({:?})", info.name, info.backend),
        };
        let text = show_text.then(|| backend.debug_text());
        let overlay = self.ui.prepare(&self.window, text, &overlay_stats);
        backend.submit_overlay(overlay);
    }
}

struct App {
    config: AppConfig,
    lifecycle: Lifecycle<AppParts>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let config = &self.config;
        if self
            .lifecycle
            .start(|| AppParts::start(event_loop, config))
            .is_err()
        {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(parts) = self.lifecycle.running_mut() {
            parts.window.push(event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(parts) = self.lifecycle.running_mut() else {
            return;
        };
        match parts.step() {
            LoopControl::Exit => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }
            LoopControl::Continue => {
                let flow = control_flow_for(&parts.frame_loop);
                if flow != event_loop.control_flow() {
                    log::info!("Control flow {flow:?}");
                    event_loop.set_control_flow(flow);
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let config_arg = std::env::args_os().nth(1).map(PathBuf::from);
    let resolved = AppConfig::resolve(config_arg);
    let filter = match &resolved {
        Ok((config, _)) => config.logging.filter.clone(),
        Err(_) => "info".to_string(),
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = match resolved {
        Ok((config, Some(path))) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Ok((config, None)) => config,
        Err(err) => {
            log::error!("Startup failed: {err}");
            return ExitStatus::StartupFailure.into();
        }
    };

    log::info!("hello_gpu starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Startup failed: {}", StartupError::EventLoop(e.to_string()));
            return ExitStatus::StartupFailure.into();
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {e}");
    }

    let status = app.lifecycle.finish();
    log::info!("Exit code {}", status.code());
    status.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hg_core::view::{Extent, ResetFlags};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Journal = Rc<RefCell<Vec<&'static str>>>;

    struct Part(&'static str, Journal);

    impl Shutdown for Part {
        fn shutdown(self) {
            self.1.borrow_mut().push(self.0);
        }
    }

    #[test]
    fn parts_release_ui_then_backend_then_window() {
        let journal: Journal = Rc::default();
        release(
            Part("window", journal.clone()),
            Part("backend", journal.clone()),
            Part("ui", journal.clone()),
        );
        assert_eq!(*journal.borrow(), vec!["ui", "backend", "window"]);
    }

    #[test]
    fn minimized_window_waits_for_events() {
        let frame_loop = FrameLoop::new(Extent::new(0, 0), ResetFlags::VSYNC);
        assert_eq!(control_flow_for(&frame_loop), ControlFlow::Wait);
    }

    #[test]
    fn visible_window_polls() {
        let frame_loop = FrameLoop::new(Extent::new(1024, 768), ResetFlags::VSYNC);
        assert_eq!(control_flow_for(&frame_loop), ControlFlow::Poll);
    }
}
