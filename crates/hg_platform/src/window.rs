use std::sync::Arc;

use hg_core::config::WindowConfig;
use hg_core::StartupError;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable);
    if let Some([x, y]) = config.position {
        attrs = attrs.with_position(PhysicalPosition::new(x, y));
    }
    attrs
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &WindowConfig,
) -> Result<Arc<Window>, StartupError> {
    let window = event_loop
        .create_window(window_attributes(config))
        .map_err(|e| StartupError::Window(e.to_string()))?;
    Ok(Arc::new(window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_follow_config() {
        let config = WindowConfig {
            title: "Test".to_string(),
            resizable: false,
            position: Some([5, 6]),
            ..Default::default()
        };
        let attrs = window_attributes(&config);
        assert_eq!(attrs.title, "Test");
        assert!(!attrs.resizable);
        assert!(attrs.position.is_some());
        assert_eq!(
            attrs.inner_size,
            Some(LogicalSize::new(1024u32, 768u32).into())
        );
    }

    #[test]
    fn unset_position_is_left_to_the_os() {
        let attrs = window_attributes(&WindowConfig::default());
        assert!(attrs.position.is_none());
        assert!(attrs.resizable);
    }
}
