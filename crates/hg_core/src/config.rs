//! Application settings, loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. With no file at all the app opens a 1024x768 "MyApp" window on
//! Vulkan with vsync and debug text on.

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StartupError;
use crate::view::{ClearFlags, ClearParams, DebugFlags, Extent, RendererType, ResetFlags};

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "hello_gpu.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Outer position in physical pixels; `None` lets the OS decide.
    pub position: Option<[i32; 2]>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "MyApp".to_string(),
            width: 1024,
            height: 768,
            resizable: true,
            position: None,
        }
    }
}

impl WindowConfig {
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    pub backend: RendererType,
    pub vsync: bool,
    pub debug_text: bool,
    #[serde(deserialize_with = "deserialize_rgba")]
    pub clear_color: u32,
    pub clear_depth: f32,
    pub clear_stencil: u8,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: RendererType::default(),
            vsync: true,
            debug_text: true,
            clear_color: 0x303030ff,
            clear_depth: 1.0,
            clear_stencil: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub show_demo_window: bool,
    pub quit_on_escape: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_demo_window: true,
            quit_on_escape: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse config JSON: {e}"))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
        Self::from_json(&raw).map_err(|e| format!("{e} ({})", path.display()))
    }

    /// An explicit path must load. Otherwise [`DEFAULT_CONFIG_PATH`] is used
    /// when present, and built-in defaults when not.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), StartupError> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !fallback.exists() {
                    return Ok((Self::default(), None));
                }
                fallback
            }
        };
        let config = Self::load(&path).map_err(StartupError::Config)?;
        Ok((config, Some(path)))
    }

    pub fn reset_flags(&self) -> ResetFlags {
        if self.renderer.vsync {
            ResetFlags::VSYNC
        } else {
            ResetFlags::empty()
        }
    }

    pub fn debug_flags(&self) -> DebugFlags {
        if self.renderer.debug_text {
            DebugFlags::TEXT
        } else {
            DebugFlags::empty()
        }
    }

    pub fn clear_params(&self) -> ClearParams {
        ClearParams {
            flags: ClearFlags::COLOR | ClearFlags::DEPTH,
            rgba: self.renderer.clear_color,
            depth: self.renderer.clear_depth,
            stencil: self.renderer.clear_stencil,
        }
    }
}

/// Parse `#rrggbb`, `#rrggbbaa` or the same with a `0x` prefix. Six digits
/// get an opaque alpha.
pub fn parse_rgba(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    let value = u32::from_str_radix(digits, 16).map_err(|e| format!("invalid color '{s}': {e}"))?;
    match digits.len() {
        6 => Ok((value << 8) | 0xff),
        8 => Ok(value),
        _ => Err(format!("invalid color '{s}': expected 6 or 8 hex digits")),
    }
}

fn deserialize_rgba<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_rgba(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_window() {
        let config = AppConfig::default();
        assert_eq!(config.window.title, "MyApp");
        assert_eq!(config.window.extent(), Extent::new(1024, 768));
        assert_eq!(config.renderer.backend, RendererType::Vulkan);
        assert_eq!(config.reset_flags(), ResetFlags::VSYNC);
        assert_eq!(config.debug_flags(), DebugFlags::TEXT);
        assert_eq!(config.clear_params(), ClearParams::default());
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let config = AppConfig::from_json(
            r##"{
                "window": { "width": 800, "position": [10, 20] },
                "renderer": { "vsync": false, "clear_color": "#102030" }
            }"##,
        )
        .unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.window.position, Some([10, 20]));
        assert!(config.reset_flags().is_empty());
        assert_eq!(config.renderer.clear_color, 0x102030ff);
        assert!(config.ui.show_demo_window);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = AppConfig::from_json(r#"{ "window": { "fullscreen": true } }"#).unwrap_err();
        assert!(err.contains("fullscreen"), "{err}");
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        assert!(AppConfig::from_json(r##"{ "renderer": { "clear_color": "#12" } }"##).is_err());
    }

    #[test]
    fn parse_rgba_accepts_prefixes() {
        assert_eq!(parse_rgba("#303030ff"), Ok(0x303030ff));
        assert_eq!(parse_rgba("0x00ff0080"), Ok(0x00ff0080));
        assert_eq!(parse_rgba("abcdef"), Ok(0xabcdefff));
        assert!(parse_rgba("#zzzzzz").is_err());
    }

    #[test]
    fn explicit_missing_file_is_a_startup_error() {
        let missing = std::env::temp_dir().join("hg_core_missing_config_7f3a.json");
        let err = AppConfig::resolve(Some(missing)).unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("hg_core_config_{}.json", std::process::id()));
        fs::write(&path, r#"{ "window": { "title": "Loaded" } }"#).unwrap();
        let (config, used) = AppConfig::resolve(Some(path.clone())).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.window.title, "Loaded");
        assert_eq!(used, Some(path));
    }
}
