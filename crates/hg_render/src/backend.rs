//! [`RenderBackend`] implementation on top of wgpu.
//!
//! Views are kept in a `BTreeMap` so touched views are encoded in id order.
//! A touched view gets one render pass that performs its clears. wgpu clears
//! whole attachments, so the view rect only bounds the viewport and scissor of
//! that pass. The egui overlay is painted last, on top of every view.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use hg_core::config::AppConfig;
use hg_core::debug_text::DebugText;
use hg_core::view::{
    ClearFlags, ClearParams, DebugFlags, Extent, FrameStats, ResetFlags, ViewId, ViewRect,
    CLEAR_VIEW,
};
use hg_core::{RenderBackend, Shutdown, StartupError};
use hg_platform::NativeHandle;
use winit::window::Window;

use crate::gpu_context::GpuContext;
use crate::overlay::{OverlayFrame, OverlayRenderer};

#[derive(Debug, Clone, Copy, Default)]
struct ViewState {
    clear: ClearParams,
    rect: ViewRect,
    touched: bool,
}

pub struct GpuBackend {
    gpu: GpuContext,
    overlay_renderer: OverlayRenderer,
    views: BTreeMap<ViewId, ViewState>,
    debug: DebugFlags,
    debug_text: DebugText,
    pending_overlay: Option<OverlayFrame>,
    frame_number: u64,
    last_cpu_ms: f64,
}

impl GpuBackend {
    pub fn new(window: Arc<Window>, config: &AppConfig) -> Result<Self, StartupError> {
        let renderer = config.renderer.backend;
        match window.native_handle() {
            Ok(handle) => log::info!("Initializing {renderer} renderer on {handle}"),
            Err(e) => log::warn!("Initializing {renderer} renderer: {e}"),
        }
        let gpu = GpuContext::new(window, renderer, config.reset_flags())?;
        let overlay_renderer = OverlayRenderer::new(&gpu.device, gpu.surface_format);
        let debug_text = DebugText::for_backbuffer(gpu.extent());

        let mut backend = Self {
            gpu,
            overlay_renderer,
            views: BTreeMap::new(),
            debug: DebugFlags::empty(),
            debug_text,
            pending_overlay: None,
            frame_number: 0,
            last_cpu_ms: 0.0,
        };
        backend.set_debug(config.debug_flags());
        backend.set_view_clear(CLEAR_VIEW, config.clear_params());
        Ok(backend)
    }

    pub fn size(&self) -> Extent {
        self.gpu.extent()
    }

    pub fn debug_flags(&self) -> DebugFlags {
        self.debug
    }

    pub fn debug_text(&self) -> &DebugText {
        &self.debug_text
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.gpu.adapter_info
    }

    /// Queue UI for the next `frame()`. A second submission replaces the first.
    pub fn submit_overlay(&mut self, overlay: OverlayFrame) {
        self.pending_overlay = Some(overlay);
    }

    fn encode_views(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let extent = self.gpu.extent();
        let srgb = self.gpu.is_srgb();
        for (id, view) in self.views.iter().filter(|(_, v)| v.touched) {
            let clear = view.clear;
            let color_load = if clear.flags.contains(ClearFlags::COLOR) {
                wgpu::LoadOp::Clear(clear_color(&clear, srgb))
            } else {
                wgpu::LoadOp::Load
            };
            let depth_load = if clear.flags.contains(ClearFlags::DEPTH) {
                wgpu::LoadOp::Clear(clear.depth)
            } else {
                wgpu::LoadOp::Load
            };
            let stencil_load = if clear.flags.contains(ClearFlags::STENCIL) {
                wgpu::LoadOp::Clear(u32::from(clear.stencil))
            } else {
                wgpu::LoadOp::Load
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("View Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: stencil_load,
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                ..Default::default()
            });

            match view.rect.clamp_to(extent) {
                Some((x, y, w, h)) => {
                    pass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
                    pass.set_scissor_rect(x, y, w, h);
                }
                None => log::trace!("View {id} rect {:?} is off screen", view.rect),
            }
        }
    }

    fn encode_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        overlay: &OverlayFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point: overlay.pixels_per_point,
        };
        let extra = self.overlay_renderer.upload(
            &self.gpu.device,
            &self.gpu.queue,
            encoder,
            &overlay.primitives,
            &screen_descriptor,
        );

        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            })
            .forget_lifetime();
        self.overlay_renderer
            .paint(&mut pass, &overlay.primitives, &screen_descriptor);
        extra
    }
}

impl RenderBackend for GpuBackend {
    fn reset(&mut self, size: Extent, flags: ResetFlags) {
        self.gpu.resize(size.width, size.height, flags);
        self.debug_text.fit(size);
        log::debug!(
            "Backend reset to {size}, debug text {}x{}",
            self.debug_text.width(),
            self.debug_text.height()
        );
    }

    fn set_debug(&mut self, flags: DebugFlags) {
        self.debug = flags;
    }

    fn set_view_clear(&mut self, view: ViewId, clear: ClearParams) {
        self.views.entry(view).or_default().clear = clear;
    }

    fn set_view_rect(&mut self, view: ViewId, rect: ViewRect) {
        self.views.entry(view).or_default().rect = rect;
    }

    fn touch(&mut self, view: ViewId) {
        self.views.entry(view).or_default().touched = true;
    }

    fn debug_text_mut(&mut self) -> &mut DebugText {
        &mut self.debug_text
    }

    fn stats(&self) -> FrameStats {
        let (width, height) = self.gpu.size;
        FrameStats {
            width,
            height,
            text_width: self.debug_text.width(),
            text_height: self.debug_text.height(),
            frame_number: self.frame_number,
            cpu_frame_ms: self.last_cpu_ms,
        }
    }

    fn frame(&mut self) -> u64 {
        let started = Instant::now();
        let overlay = self.pending_overlay.take();

        if let Some(overlay) = &overlay {
            self.overlay_renderer.upload_textures(
                &self.gpu.device,
                &self.gpu.queue,
                &overlay.textures_delta,
            );
        }

        if let Some((output, target)) = self.gpu.begin_frame() {
            let mut encoder =
                self.gpu
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("Frame Encoder"),
                    });
            self.encode_views(&mut encoder, &target);
            let extra = match &overlay {
                Some(overlay) => self.encode_overlay(&mut encoder, &target, overlay),
                None => Vec::new(),
            };
            self.gpu
                .queue
                .submit(extra.into_iter().chain(std::iter::once(encoder.finish())));
            output.present();
        }

        if let Some(overlay) = &overlay {
            self.overlay_renderer.free(&overlay.textures_delta);
        }
        for view in self.views.values_mut() {
            view.touched = false;
        }

        self.frame_number += 1;
        self.last_cpu_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.frame_number
    }
}

impl Shutdown for GpuBackend {
    fn shutdown(self) {
        let _ = self.gpu.device.poll(wgpu::Maintain::Wait);
        log::info!("Rendering backend released after {} frames", self.frame_number);
    }
}

/// Convert the packed sRGB clear color to what the surface expects. sRGB
/// surfaces encode on write, so they need linear input.
pub fn clear_color(clear: &ClearParams, srgb_surface: bool) -> wgpu::Color {
    let [r, g, b, a] = clear.color_components();
    let encode = |c: f32| {
        let c = f64::from(c);
        if srgb_surface {
            srgb_to_linear(c)
        } else {
            c
        }
    };
    wgpu::Color {
        r: encode(r),
        g: encode(g),
        b: encode(b),
        a: f64::from(a),
    }
}

pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_endpoints_are_fixed() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-12);
        assert!((srgb_to_linear(0.5) - 0.214).abs() < 1e-3);
    }

    #[test]
    fn clear_color_is_linearized_only_for_srgb_surfaces() {
        let clear = ClearParams::default();
        let plain = clear_color(&clear, false);
        let linear = clear_color(&clear, true);
        assert!((plain.r - 48.0 / 255.0).abs() < 1e-6);
        assert!(linear.r < plain.r);
        assert_eq!(linear.a, 1.0);
        assert_eq!(plain.a, 1.0);
    }

    #[test]
    fn alpha_is_never_converted() {
        let clear = ClearParams {
            rgba: 0xffffff80,
            ..Default::default()
        };
        let color = clear_color(&clear, true);
        assert!((color.a - 128.0 / 255.0).abs() < 1e-6);
        assert!((color.r - 1.0).abs() < 1e-6);
    }
}
