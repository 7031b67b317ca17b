//! Authority side of the interrupt binding.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::codec;
use crate::event::InterruptEvent;
use crate::transport::RemoteObject;
use crate::{TransportResult, ON_INTERRUPT};

/// Sends interrupt events to a remote listener.
#[derive(Clone)]
pub struct ListenerProxy {
    remote: Arc<dyn RemoteObject>,
}

impl ListenerProxy {
    /// Create a proxy over a remote object.
    pub fn new(remote: Arc<dyn RemoteObject>) -> Self {
        debug!("Listener proxy created");
        Self { remote }
    }

    /// Encode and send an event, reporting transport failures.
    pub fn send(&self, event: &InterruptEvent) -> TransportResult<()> {
        self.remote.send_request(ON_INTERRUPT, codec::encode(event))
    }

    /// Send an event, best effort.
    ///
    /// Failures are logged and discarded; the event is then never observed by
    /// the client.
    #[instrument(name = "proxy_on_interrupt", skip(self))]
    pub fn on_interrupt(&self, event: &InterruptEvent) {
        if let Err(e) = self.send(event) {
            error!("OnInterrupt failed: {}", e);
        }
    }

    /// Whether the remote side still accepts requests.
    pub fn is_alive(&self) -> bool {
        self.remote.is_alive()
    }
}
