//! Error types for the IPC module.

use thiserror::Error;

/// Errors decoding an interrupt payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IpcError {
    /// Payload does not have the fixed interrupt event size.
    #[error("Invalid payload length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors that can occur while sending a request across the binding.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote side has gone away.
    #[error("Remote object is dead")]
    DeadObject,

    /// The delivery queue is full.
    #[error("Delivery queue full")]
    QueueFull,

    /// The stub does not understand the request code.
    #[error("Unknown request code: {0}")]
    UnknownRequest(u32),

    /// The payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] IpcError),

    /// IO error while setting up the binding.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
