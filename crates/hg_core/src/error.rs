use thiserror::Error;

/// Fatal errors raised while bringing up the window, GPU backend or UI.
///
/// None of these are recovered from; they end the process with
/// [`ExitStatus::StartupFailure`](crate::lifecycle::ExitStatus::StartupFailure)
/// before the first loop iteration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(String),
    #[error("failed to create event loop: {0}")]
    EventLoop(String),
    #[error("failed to create window: {0}")]
    Window(String),
    #[error("failed to create rendering surface: {0}")]
    Surface(String),
    #[error("no GPU adapter available for the {backend} backend")]
    NoAdapter { backend: String },
    #[error("failed to create GPU device: {0}")]
    Device(String),
}
