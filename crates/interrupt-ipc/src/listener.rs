//! Client side of the interrupt binding.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::codec;
use crate::error::TransportError;
use crate::event::InterruptEvent;
use crate::ON_INTERRUPT;

/// Receives interrupt events.
///
/// Implementations are called on whatever thread the transport uses for
/// inbound messages, so they must be safe to call concurrently with the
/// owner's own threads.
pub trait InterruptListener: Send + Sync {
    /// Handle a delivered interrupt.
    fn on_interrupt(&self, event: &InterruptEvent);
}

/// Forwards delivered events to a registered listener.
///
/// The bridge never owns the listener. If nothing is registered, or the
/// owner has already been dropped, deliveries are silently absorbed.
#[derive(Default)]
pub struct ListenerBridge {
    listener: RwLock<Option<Weak<dyn InterruptListener>>>,
}

impl ListenerBridge {
    /// Create a bridge with no listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, replacing any previous one.
    pub fn register<L: InterruptListener + 'static>(&self, listener: &Arc<L>) {
        let weak = Arc::downgrade(listener);
        self.register_weak(weak as Weak<dyn InterruptListener>);
    }

    /// Register an already-downgraded listener.
    pub fn register_weak(&self, listener: Weak<dyn InterruptListener>) {
        debug!("Interrupt listener registered");
        *self.listener.write() = Some(listener);
    }

    /// Drop the registration, if any.
    pub fn unregister(&self) {
        if self.listener.write().take().is_some() {
            debug!("Interrupt listener unregistered");
        }
    }

    /// Whether a live listener is registered.
    pub fn is_registered(&self) -> bool {
        self.listener
            .read()
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Deliver an event to the registered listener, if any.
    pub fn deliver(&self, event: &InterruptEvent) {
        // Upgrade under the read lock, call outside of it so the listener may
        // re-register without deadlocking.
        let listener = self.listener.read().as_ref().and_then(Weak::upgrade);

        match listener {
            Some(listener) => listener.on_interrupt(event),
            None => trace!(?event, "No interrupt listener, dropping event"),
        }
    }
}

/// Decodes inbound requests and hands them to a [`ListenerBridge`].
#[derive(Clone)]
pub struct ListenerStub {
    bridge: Arc<ListenerBridge>,
}

impl ListenerStub {
    /// Create a stub feeding the given bridge.
    pub fn new(bridge: Arc<ListenerBridge>) -> Self {
        Self { bridge }
    }

    /// The bridge this stub feeds.
    pub fn bridge(&self) -> &Arc<ListenerBridge> {
        &self.bridge
    }

    /// Handle one inbound request.
    pub fn on_remote_request(&self, code: u32, data: &[u8]) -> Result<(), TransportError> {
        match code {
            ON_INTERRUPT => {
                let event = codec::decode(data).inspect_err(|e| {
                    warn!("Dropping malformed interrupt payload: {}", e);
                })?;
                debug!(hint = ?event.hint_type, force = ?event.force_type, "Interrupt received");
                self.bridge.deliver(&event);
                Ok(())
            }
            other => {
                warn!(code = other, "Unknown request code");
                Err(TransportError::UnknownRequest(other))
            }
        }
    }
}
