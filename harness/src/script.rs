//! Scripted interrupts sent from the policy side during playback.

use std::str::FromStr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, error, info};

use interrupt_ipc::{ForceType, InterruptEvent, InterruptHint, InterruptType, ListenerProxy};
use interrupt_render::SimulatedRenderer;

/// One interrupt, sent `at` after playback starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterruptStep {
    pub at: Duration,
    pub event: InterruptEvent,
}

impl FromStr for InterruptStep {
    type Err = String;

    /// Parse `MS:FORCE:HINT`. FORCE is `force`, `share` or a raw code; HINT
    /// is a hint name or a raw code. Resume and unduck hints end an
    /// interrupt, everything else begins one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [at, force, hint] = parts.as_slice() else {
            return Err(format!("expected MS:FORCE:HINT, got {s:?}"));
        };

        let at = at
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("invalid time {at:?}: {e}"))?;

        let force_type = match force.trim().to_ascii_lowercase().as_str() {
            "force" => ForceType::Force,
            "share" => ForceType::Share,
            raw => ForceType::from_raw(parse_raw(raw, "force type")?),
        };

        let hint_type = match hint.trim().to_ascii_lowercase().as_str() {
            "none" => InterruptHint::None,
            "resume" => InterruptHint::Resume,
            "pause" => InterruptHint::Pause,
            "stop" => InterruptHint::Stop,
            "duck" => InterruptHint::Duck,
            "unduck" => InterruptHint::Unduck,
            raw => InterruptHint::from_raw(parse_raw(raw, "hint")?),
        };

        let event_type = match hint_type {
            InterruptHint::Resume | InterruptHint::Unduck => InterruptType::End,
            _ => InterruptType::Begin,
        };
        let duck_volume = if hint_type == InterruptHint::Duck { 0.2 } else { 0.0 };

        Ok(Self {
            at: Duration::from_millis(at),
            event: InterruptEvent::new(event_type, force_type, hint_type, duck_volume),
        })
    }
}

fn parse_raw(raw: &str, what: &str) -> Result<i32, String> {
    raw.parse::<i32>()
        .map_err(|_| format!("unknown {what} {raw:?}"))
}

/// Send `steps` through `proxy` on their schedule until `done` fires.
///
/// A forced pause pauses `renderer` before the event goes out, the way the
/// policy side acts on the stream before notifying its owner.
pub fn spawn(
    mut steps: Vec<InterruptStep>,
    proxy: ListenerProxy,
    renderer: Arc<SimulatedRenderer>,
    done: Receiver<()>,
) -> std::io::Result<JoinHandle<()>> {
    steps.sort_by_key(|step| step.at);

    thread::Builder::new()
        .name("interrupt-script".into())
        .spawn(move || {
            let started = Instant::now();
            for step in steps {
                let wait = step.at.saturating_sub(started.elapsed());
                match done.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {}
                    _ => {
                        debug!("Playback finished, remaining interrupts dropped");
                        return;
                    }
                }

                let event = step.event;
                if event.force_type == ForceType::Force && event.hint_type == InterruptHint::Pause {
                    renderer.pause();
                }
                info!(
                    at_ms = step.at.as_millis() as u64,
                    event_type = ?event.event_type,
                    force_type = ?event.force_type,
                    hint_type = ?event.hint_type,
                    "Sending interrupt"
                );
                proxy.on_interrupt(&event);
            }
        })
}

/// Wait for the script thread. Returns false if it panicked.
pub fn join(handle: JoinHandle<()>) -> bool {
    if handle.join().is_err() {
        error!("Interrupt script thread panicked");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use interrupt_ipc::{bind_local, ListenerBridge};

    #[test]
    fn test_join_reports_panics() {
        let panicked = thread::spawn(|| panic!("script failed"));
        assert!(!join(panicked));
        assert!(join(thread::spawn(|| {})));
    }

    #[test]
    fn test_script_stops_when_playback_finishes() {
        let binding = bind_local(Arc::new(ListenerBridge::new())).unwrap();
        let renderer = Arc::new(SimulatedRenderer::create(Default::default()));
        let steps = vec!["60000:force:stop".parse().unwrap()];
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);

        let handle = spawn(steps, binding.proxy(), renderer, done_rx).unwrap();
        let started = Instant::now();
        drop(done_tx);

        assert!(join(handle));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_parse_named_step() {
        let step: InterruptStep = "250:force:pause".parse().unwrap();
        assert_eq!(step.at, Duration::from_millis(250));
        assert_eq!(
            step.event,
            InterruptEvent::begin(ForceType::Force, InterruptHint::Pause)
        );
    }

    #[test]
    fn test_resume_ends_interrupt() {
        let step: InterruptStep = "0:SHARE:resume".parse().unwrap();
        assert_eq!(step.event.event_type, InterruptType::End);
        assert_eq!(step.event.force_type, ForceType::Share);
    }

    #[test]
    fn test_parse_raw_codes() {
        let step: InterruptStep = "10:7:42".parse().unwrap();
        assert_eq!(step.event.force_type, ForceType::Unknown(7));
        assert_eq!(step.event.hint_type, InterruptHint::Unknown(42));
    }

    #[test]
    fn test_rejects_malformed_steps() {
        assert!("force:pause".parse::<InterruptStep>().is_err());
        assert!("x:force:pause".parse::<InterruptStep>().is_err());
        assert!("10:maybe:pause".parse::<InterruptStep>().is_err());
        assert!("10:force:later".parse::<InterruptStep>().is_err());
        assert!("10:force:pause:extra".parse::<InterruptStep>().is_err());
    }
}
