//! End-to-end tests for the in-process interrupt binding.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use interrupt_ipc::{
    bind_local, ForceType, InterruptEvent, InterruptHint, InterruptListener, InterruptType,
    ListenerBridge,
};

struct Forwarder {
    tx: Sender<InterruptEvent>,
}

impl InterruptListener for Forwarder {
    fn on_interrupt(&self, event: &InterruptEvent) {
        let _ = self.tx.send(*event);
    }
}

#[test]
fn test_fields_survive_the_binding() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let listener = Arc::new(Forwarder { tx });
    let bridge = Arc::new(ListenerBridge::new());
    bridge.register(&listener);

    let handle = bind_local(Arc::clone(&bridge)).unwrap();
    let proxy = handle.proxy();

    let event = InterruptEvent::new(
        InterruptType::End,
        ForceType::Share,
        InterruptHint::Unduck,
        0.25,
    );
    proxy.on_interrupt(&event);

    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), event);
}

#[test]
fn test_concurrent_senders() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let listener = Arc::new(Forwarder { tx });
    let bridge = Arc::new(ListenerBridge::new());
    bridge.register(&listener);
    let handle = bind_local(bridge).unwrap();

    let senders: Vec<_> = (0..4)
        .map(|i| {
            let proxy = handle.proxy();
            thread::spawn(move || {
                for _ in 0..8 {
                    let event = InterruptEvent::new(
                        InterruptType::Begin,
                        ForceType::Force,
                        InterruptHint::Duck,
                        i as f32,
                    );
                    // Spin on a full queue; every event must go through here.
                    while proxy.send(&event).is_err() {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    for sender in senders {
        sender.join().unwrap();
    }

    let mut received = 0;
    while rx.recv_timeout(Duration::from_secs(2)).is_ok() {
        received += 1;
        if received == 32 {
            break;
        }
    }
    assert_eq!(received, 32);
}

#[test]
fn test_listener_dropped_before_delivery() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let listener = Arc::new(Forwarder { tx });
    let bridge = Arc::new(ListenerBridge::new());
    bridge.register(&listener);
    let handle = bind_local(Arc::clone(&bridge)).unwrap();

    drop(listener);
    handle
        .proxy()
        .send(&InterruptEvent::begin(ForceType::Force, InterruptHint::Stop))
        .unwrap();

    // Teardown drains the queue; the absent listener must not cause a failure.
    handle.teardown();
    assert!(!bridge.is_registered());
}
