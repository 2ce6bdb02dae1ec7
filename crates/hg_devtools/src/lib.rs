pub mod debug_text_layer;
pub mod ui_overlay;

pub use ui_overlay::{OverlayStats, UiOverlay};
