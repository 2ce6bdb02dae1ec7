//! GPU side of the egui overlay.
//!
//! The UI crate runs egui and hands the backend an [`OverlayFrame`]. The
//! backend then drives the renderer in four steps within `frame()`:
//!
//!   1. `upload_textures()` -- apply texture deltas (always, even if the
//!      swapchain image could not be acquired, so the font atlas is never lost)
//!   2. `upload()` -- update vertex/index buffers (borrows the encoder mutably)
//!   3. `paint()` -- render into a pass created with `forget_lifetime()`
//!   4. `free()` -- release textures egui no longer references

/// Tessellated UI for one frame.
pub struct OverlayFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

pub struct OverlayRenderer {
    renderer: egui_wgpu::Renderer,
}

impl OverlayRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            renderer: egui_wgpu::Renderer::new(device, surface_format, None, 1, false),
        }
    }

    pub fn upload_textures(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures_delta: &egui::TexturesDelta,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }
    }

    /// Returns extra command buffers that must be submitted before the
    /// encoder's own.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        self.renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor)
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn free(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
