//! Error types for the render module.

use thiserror::Error;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Renderer rejected the parameters.
    #[error("Invalid renderer parameters: {0}")]
    InvalidParams(String),

    /// Renderer rejected the interrupt callback.
    #[error("Callback registration failed: {0}")]
    CallbackRegistration(String),

    /// Minimum buffer size unavailable.
    #[error("Buffer size unavailable: {0}")]
    BufferSize(String),

    /// Renderer refused a write.
    #[error("Write rejected in state {0}")]
    WriteRejected(&'static str),

    /// Operation not valid in the renderer's current state.
    #[error("Invalid renderer state: {0}")]
    InvalidState(&'static str),

    /// Renderer has been released.
    #[error("Renderer released")]
    Released,

    /// Renderer failed to start.
    #[error("Renderer failed to start")]
    StartFailed,

    /// Source header unreadable.
    #[error("Header error: {0}")]
    Header(String),

    /// Writer thread panicked.
    #[error("Stream writer panicked")]
    WriterPanicked,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
