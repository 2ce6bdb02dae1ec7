pub mod native;
pub mod window;

pub use native::{NativeHandle, PlatformHandle};
pub use window::create_window;
