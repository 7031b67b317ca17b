//! Transport seam and the in-process binding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::TransportError;
use crate::listener::{ListenerBridge, ListenerStub};
use crate::proxy::ListenerProxy;
use crate::{TransportResult, DELIVERY_QUEUE_CAPACITY};

/// The sending end of a binding.
pub trait RemoteObject: Send + Sync {
    /// Send one request. Must not block waiting for the receiver.
    fn send_request(&self, code: u32, data: Bytes) -> TransportResult<()>;

    /// Whether the receiving end still exists.
    fn is_alive(&self) -> bool;
}

struct Request {
    code: u32,
    data: Bytes,
}

/// In-process transport with its own dispatch thread.
///
/// Requests are queued without blocking and handed to a [`ListenerStub`] on
/// the `interrupt-dispatch` thread, so listeners run concurrently with the
/// sender's threads.
pub struct LocalChannel {
    sender: Mutex<Option<Sender<Request>>>,
    alive: AtomicBool,
}

impl LocalChannel {
    /// Bind a stub and start dispatching to it.
    #[instrument(name = "local_channel_bind", skip(stub))]
    pub fn bind(stub: ListenerStub) -> TransportResult<ChannelHandle> {
        let (sender, receiver): (Sender<Request>, Receiver<Request>) =
            crossbeam_channel::bounded(DELIVERY_QUEUE_CAPACITY);

        let bridge = Arc::clone(stub.bridge());
        let handle = thread::Builder::new()
            .name("interrupt-dispatch".into())
            .spawn(move || dispatch_loop(stub, receiver))?;

        let channel = Arc::new(Self {
            sender: Mutex::new(Some(sender)),
            alive: AtomicBool::new(true),
        });

        info!("Interrupt binding established");

        Ok(ChannelHandle {
            channel,
            bridge,
            dispatch_thread: Mutex::new(Some(handle)),
        })
    }

    fn close(&self) {
        self.alive.store(false, Ordering::Release);
        // Dropping the sender lets the dispatch thread drain and exit.
        self.sender.lock().take();
    }
}

impl RemoteObject for LocalChannel {
    fn send_request(&self, code: u32, data: Bytes) -> TransportResult<()> {
        if !self.alive.load(Ordering::Acquire) {
            return Err(TransportError::DeadObject);
        }

        let guard = self.sender.lock();
        let sender = guard.as_ref().ok_or(TransportError::DeadObject)?;

        match sender.try_send(Request { code, data }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(TransportError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(TransportError::DeadObject),
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

fn dispatch_loop(stub: ListenerStub, receiver: Receiver<Request>) {
    debug!("Interrupt dispatch thread started");

    for request in receiver.iter() {
        if let Err(e) = stub.on_remote_request(request.code, &request.data) {
            warn!("Inbound request failed: {}", e);
        }
    }

    debug!("Interrupt dispatch thread exiting");
}

/// Owning handle for a binding.
///
/// Dropping the handle tears the binding down.
pub struct ChannelHandle {
    channel: Arc<LocalChannel>,
    bridge: Arc<ListenerBridge>,
    dispatch_thread: Mutex<Option<JoinHandle<()>>>,
}

impl ChannelHandle {
    /// Build a proxy that sends over this binding.
    pub fn proxy(&self) -> ListenerProxy {
        let remote: Arc<dyn RemoteObject> = Arc::clone(&self.channel) as Arc<dyn RemoteObject>;
        ListenerProxy::new(remote)
    }

    /// The client-side bridge fed by this binding.
    pub fn bridge(&self) -> &Arc<ListenerBridge> {
        &self.bridge
    }

    /// Whether the binding is still up.
    pub fn is_alive(&self) -> bool {
        self.channel.is_alive()
    }

    /// Tear the binding down.
    ///
    /// Requests already queued are still delivered; later sends fail with
    /// [`TransportError::DeadObject`]. The bridge registration is released.
    #[instrument(name = "channel_teardown", skip(self))]
    pub fn teardown(&self) {
        self.channel.close();

        if let Some(handle) = self.dispatch_thread.lock().take() {
            if handle.thread().id() == thread::current().id() {
                warn!("Teardown requested from the dispatch thread, not joining");
            } else if handle.join().is_err() {
                warn!("Interrupt dispatch thread panicked");
            }
        }

        self.bridge.unregister();
        debug!("Interrupt binding torn down");
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
