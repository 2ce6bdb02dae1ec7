pub mod config;
pub mod debug_text;
pub mod error;
pub mod frame_loop;
pub mod lifecycle;
pub mod time;
pub mod view;

pub use config::AppConfig;
pub use debug_text::DebugText;
pub use error::StartupError;
pub use frame_loop::{FrameHooks, FrameLoop, LoopControl, RenderBackend, Windowing};
pub use lifecycle::{ExitStatus, Lifecycle, Shutdown};
pub use time::FrameClock;
