//! Interrupt event wire contract and listener binding.
//!
//! This crate defines the interrupt notification sent by the audio policy
//! authority, its fixed wire encoding, and both ends of the binding that
//! carries it to a playback client.

pub mod codec;
mod error;
mod event;
mod listener;
mod proxy;
mod transport;

pub use error::{IpcError, TransportError};
pub use event::{ForceType, InterruptEvent, InterruptHint, InterruptType};
pub use listener::{InterruptListener, ListenerBridge, ListenerStub};
pub use proxy::ListenerProxy;
pub use transport::{ChannelHandle, LocalChannel, RemoteObject};

use std::sync::Arc;

/// Request code for an interrupt notification.
pub const ON_INTERRUPT: u32 = 0;

/// Queue capacity for the in-process binding.
pub const DELIVERY_QUEUE_CAPACITY: usize = 64;

/// Result type for decoding.
pub type IpcResult<T> = Result<T, IpcError>;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Create an in-process binding delivering into `bridge`.
pub fn bind_local(bridge: Arc<ListenerBridge>) -> TransportResult<ChannelHandle> {
    LocalChannel::bind(ListenerStub::new(bridge))
}
