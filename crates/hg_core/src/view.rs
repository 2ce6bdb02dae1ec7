//! Backend-agnostic vocabulary shared by the frame loop and the GPU backend:
//! view ids, viewport rectangles, clear parameters and the flag sets passed to
//! `reset` / `set_debug`.

use bitflags::bitflags;
use serde::Deserialize;

/// Small integer naming a render target context inside the backend.
pub type ViewId = u16;

/// The primary view. Cleared every frame and sized to the full backbuffer.
pub const CLEAR_VIEW: ViewId = 0;

/// Width and height of the backbuffer in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True for a minimized window; nothing can be presented at this size.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Viewport rectangle of a view, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ViewRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect covering the whole backbuffer. Dimensions past `u16::MAX` saturate.
    pub fn full(extent: Extent) -> Self {
        Self {
            x: 0,
            y: 0,
            width: extent.width.min(u16::MAX as u32) as u16,
            height: extent.height.min(u16::MAX as u32) as u16,
        }
    }

    /// Intersect with a backbuffer of the given size. Returns `None` when
    /// nothing of the rect is left on screen.
    pub fn clamp_to(self, extent: Extent) -> Option<(u32, u32, u32, u32)> {
        let x = u32::from(self.x);
        let y = u32::from(self.y);
        if x >= extent.width || y >= extent.height {
            return None;
        }
        let w = u32::from(self.width).min(extent.width - x);
        let h = u32::from(self.height).min(extent.height - y);
        if w == 0 || h == 0 {
            return None;
        }
        Some((x, y, w, h))
    }
}

bitflags! {
    /// Which attachments a view clears when it is touched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

bitflags! {
    /// Presentation options applied on `reset`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResetFlags: u32 {
        const VSYNC = 1 << 0;
    }
}

bitflags! {
    /// Debug features drawn by the backend on top of the scene.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugFlags: u32 {
        /// Debug text grid.
        const TEXT = 1 << 0;
    }
}

/// Per-view clear configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearParams {
    pub flags: ClearFlags,
    /// Packed `0xRRGGBBAA`.
    pub rgba: u32,
    pub depth: f32,
    pub stencil: u8,
}

impl Default for ClearParams {
    fn default() -> Self {
        Self {
            flags: ClearFlags::COLOR | ClearFlags::DEPTH,
            rgba: 0x303030ff,
            depth: 1.0,
            stencil: 0,
        }
    }
}

impl ClearParams {
    /// Unpack `rgba` into normalized sRGB components.
    pub fn color_components(&self) -> [f32; 4] {
        let [r, g, b, a] = self.rgba.to_be_bytes();
        [r, g, b, a].map(|c| f32::from(c) / 255.0)
    }
}

/// Graphics API the backend should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererType {
    /// Let the backend pick whatever the platform offers.
    Auto,
    #[default]
    Vulkan,
    Dx12,
    Metal,
    Gl,
}

impl RendererType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Vulkan => "Vulkan",
            Self::Dx12 => "Direct3D 12",
            Self::Metal => "Metal",
            Self::Gl => "OpenGL",
        }
    }
}

impl std::fmt::Display for RendererType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of backend statistics for the most recent frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Backbuffer width in pixels.
    pub width: u32,
    /// Backbuffer height in pixels.
    pub height: u32,
    /// Debug text grid width in characters.
    pub text_width: u16,
    /// Debug text grid height in characters.
    pub text_height: u16,
    /// Number of frames presented so far.
    pub frame_number: u64,
    /// CPU time spent inside the last `frame()` call.
    pub cpu_frame_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_extent_detects_zero_axis() {
        assert!(Extent::new(0, 768).is_empty());
        assert!(Extent::new(1024, 0).is_empty());
        assert!(!Extent::new(1024, 768).is_empty());
    }

    #[test]
    fn full_rect_covers_extent() {
        let rect = ViewRect::full(Extent::new(1024, 768));
        assert_eq!(rect, ViewRect::new(0, 0, 1024, 768));
    }

    #[test]
    fn full_rect_saturates_huge_extents() {
        let rect = ViewRect::full(Extent::new(100_000, 20));
        assert_eq!(rect.width, u16::MAX);
        assert_eq!(rect.height, 20);
    }

    #[test]
    fn clamp_trims_rect_to_backbuffer() {
        let rect = ViewRect::new(100, 50, 2000, 2000);
        assert_eq!(rect.clamp_to(Extent::new(640, 480)), Some((100, 50, 540, 430)));
    }

    #[test]
    fn clamp_rejects_offscreen_rect() {
        let rect = ViewRect::new(700, 0, 10, 10);
        assert_eq!(rect.clamp_to(Extent::new(640, 480)), None);
        assert_eq!(ViewRect::new(0, 0, 0, 10).clamp_to(Extent::new(640, 480)), None);
    }

    #[test]
    fn default_clear_is_dark_gray_color_and_depth() {
        let clear = ClearParams::default();
        assert!(clear.flags.contains(ClearFlags::COLOR | ClearFlags::DEPTH));
        let [r, g, b, a] = clear.color_components();
        assert!((r - 0x30 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn renderer_type_deserializes_lowercase() {
        let ty: RendererType = serde_json::from_str("\"dx12\"").unwrap();
        assert_eq!(ty, RendererType::Dx12);
        assert_eq!(RendererType::default(), RendererType::Vulkan);
    }
}
