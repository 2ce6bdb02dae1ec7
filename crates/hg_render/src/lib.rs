pub mod backend;
pub mod gpu_context;
pub mod overlay;

pub use backend::GpuBackend;
pub use gpu_context::GpuContext;
pub use overlay::{OverlayFrame, OverlayRenderer};
