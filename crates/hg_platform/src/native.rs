//! Native window handle extraction.
//!
//! winit exposes the handle as `raw_window_handle::RawWindowHandle`, an open
//! enum with one variant per windowing system. [`PlatformHandle`] narrows it
//! to the systems this app runs on so callers match on a closed set.

use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformHandle {
    Win32 { hwnd: isize },
    AppKit { ns_view: usize },
    Xlib { window: u64 },
    Xcb { window: u32 },
    Wayland { surface: usize },
    Other,
}

impl PlatformHandle {
    pub fn from_raw(raw: RawWindowHandle) -> Self {
        match raw {
            RawWindowHandle::Win32(h) => Self::Win32 {
                hwnd: h.hwnd.get(),
            },
            RawWindowHandle::AppKit(h) => Self::AppKit {
                ns_view: h.ns_view.as_ptr() as usize,
            },
            #[allow(clippy::unnecessary_cast)]
            RawWindowHandle::Xlib(h) => Self::Xlib {
                window: h.window as u64,
            },
            RawWindowHandle::Xcb(h) => Self::Xcb {
                window: h.window.get(),
            },
            RawWindowHandle::Wayland(h) => Self::Wayland {
                surface: h.surface.as_ptr() as usize,
            },
            _ => Self::Other,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Self::Win32 { .. } => "Win32",
            Self::AppKit { .. } => "AppKit",
            Self::Xlib { .. } => "Xlib",
            Self::Xcb { .. } => "Xcb",
            Self::Wayland { .. } => "Wayland",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for PlatformHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Win32 { hwnd } => write!(f, "Win32 hwnd={hwnd:#x}"),
            Self::AppKit { ns_view } => write!(f, "AppKit ns_view={ns_view:#x}"),
            Self::Xlib { window } => write!(f, "Xlib window={window:#x}"),
            Self::Xcb { window } => write!(f, "Xcb window={window:#x}"),
            Self::Wayland { surface } => write!(f, "Wayland surface={surface:#x}"),
            Self::Other => f.write_str("unsupported windowing system"),
        }
    }
}

/// Anything that can hand out the platform window it draws into.
pub trait NativeHandle {
    fn native_handle(&self) -> Result<PlatformHandle, String>;
}

impl<T: HasWindowHandle + ?Sized> NativeHandle for T {
    fn native_handle(&self) -> Result<PlatformHandle, String> {
        let handle = self
            .window_handle()
            .map_err(|e| format!("window handle unavailable: {e}"))?;
        Ok(PlatformHandle::from_raw(handle.as_raw()))
    }
}
