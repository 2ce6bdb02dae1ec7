//! Immediate-mode UI drawn on top of the frame via egui.
//!
//! Input arrives through `egui-winit` for every window event, whether or not a
//! window is open. Each drawn frame `prepare()` runs the UI, paints the debug
//! text grid into the background layer, and tessellates the result into an
//! [`OverlayFrame`] for the rendering backend to upload and paint.

use hg_core::debug_text::DebugText;
use hg_core::view::FrameStats;
use hg_core::Shutdown;
use hg_render::OverlayFrame;
use winit::window::Window;

use crate::debug_text_layer::paint_debug_text;

/// Numbers shown in the stats window.
#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub frame: FrameStats,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
    /// Adapter and graphics API, e.g. "Intel(R) Xe Graphics (Vulkan)".
    pub adapter_label: String,
}

/// Placeholder widgets for the demo window.
#[derive(Debug, Clone)]
struct DemoState {
    checked: bool,
    value: f32,
    text: String,
    clicks: u32,
}

impl Default for DemoState {
    fn default() -> Self {
        Self {
            checked: true,
            value: 0.5,
            text: "Hello, world!".to_string(),
            clicks: 0,
        }
    }
}

pub struct UiOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub show_demo: bool,
    pub show_stats: bool,
    demo: DemoState,
}

impl UiOverlay {
    pub fn new(window: &Window, show_demo: bool) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        log::info!("UI context created");

        Self {
            egui_ctx,
            egui_winit_state,
            show_demo,
            show_stats: false,
            demo: DemoState::default(),
        }
    }

    /// Feed a raw window event to egui. Returns true when egui consumed it.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_demo(&mut self) {
        self.show_demo = !self.show_demo;
        log::info!("Demo window: {}", if self.show_demo { "ON" } else { "OFF" });
    }

    pub fn toggle_stats(&mut self) {
        self.show_stats = !self.show_stats;
        log::info!("Stats window: {}", if self.show_stats { "ON" } else { "OFF" });
    }

    /// Run the UI for this frame. `debug_text` is painted behind all windows
    /// when given.
    pub fn prepare(
        &mut self,
        window: &Window,
        debug_text: Option<&DebugText>,
        stats: &OverlayStats,
    ) -> OverlayFrame {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let show_stats = self.show_stats;
        let show_demo = &mut self.show_demo;
        let demo = &mut self.demo;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(text) = debug_text {
                let painter = ctx.layer_painter(egui::LayerId::background());
                paint_debug_text(&painter, text, ctx.pixels_per_point());
            }
            if show_stats {
                stats_window(ctx, stats);
            }
            if *show_demo {
                demo_window(ctx, show_demo, demo);
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        OverlayFrame {
            primitives,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }
}

impl Shutdown for UiOverlay {
    fn shutdown(self) {
        log::info!("UI context released");
    }
}

fn stats_window(ctx: &egui::Context, stats: &OverlayStats) {
    egui::Window::new("Stats")
        .default_pos([10.0, 60.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(&stats.adapter_label);
            ui.separator();
            ui.label(format!("FPS: {:.1}", stats.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", stats.smoothed_frame_time_ms));
            ui.label(format!("Submit time: {:.2} ms", stats.frame.cpu_frame_ms));
            ui.label(format!("Frame: {}", stats.frame.frame_number));
            ui.label(format!(
                "Backbuffer: {}x{}",
                stats.frame.width, stats.frame.height
            ));
        });
}

fn demo_window(ctx: &egui::Context, open: &mut bool, demo: &mut DemoState) {
    egui::Window::new("Demo")
        .open(open)
        .default_pos([60.0, 120.0])
        .show(ctx, |ui| {
            ui.label("F1: stats window, F3: this window, Esc: quit");
            ui.separator();
            ui.checkbox(&mut demo.checked, "Checkbox");
            ui.add(egui::Slider::new(&mut demo.value, 0.0..=1.0).text("float"));
            ui.text_edit_singleline(&mut demo.text);
            ui.horizontal(|ui| {
                if ui.button("Button").clicked() {
                    demo.clicks += 1;
                }
                ui.label(format!("clicked {} times", demo.clicks));
            });
            ui.collapsing("Colors", |ui| {
                ui.horizontal_wrapped(|ui| {
                    for index in 0..16u8 {
                        let color = crate::debug_text_layer::palette_color(index);
                        ui.colored_label(color, format!("{index:X}"));
                    }
                });
            });
        });
}
