//! Shared control flags for one playback attempt.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Control flags shared between the interrupt handler and the stream writer.
///
/// Writes use `Release` and reads use `Acquire`, so a flag set on the
/// delivery thread is seen by the writer at its next chunk boundary.
///
/// The writer entering a pause and a resume clearing it both run under
/// `pause_gate`, so a resume can never be overwritten by a late pause.
#[derive(Debug, Default)]
pub struct RenderSession {
    pause_gate: Mutex<()>,
    paused: AtomicBool,
    stopped: AtomicBool,
    stop_in_progress: AtomicBool,
    completed: AtomicBool,
}

impl RenderSession {
    /// Create a session with all flags cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pause is in effect.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Set or clear the pause flag.
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Set the pause flag if `renderer_paused` still holds.
    ///
    /// Serialized against [`RenderSession::resume_with`]. Returns whether the
    /// flag was set.
    pub fn pause_if(&self, renderer_paused: impl FnOnce() -> bool) -> bool {
        let _gate = self.pause_gate.lock();
        if !renderer_paused() {
            return false;
        }
        self.set_paused(true);
        true
    }

    /// Run `start` and clear the pause flag if it succeeded.
    ///
    /// Serialized against [`RenderSession::pause_if`].
    pub fn resume_with(&self, start: impl FnOnce() -> bool) -> bool {
        let _gate = self.pause_gate.lock();
        if !start() {
            return false;
        }
        self.set_paused(false);
        true
    }

    /// Whether a stop has been accepted.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Accept a stop. Never cleared for the life of the session.
    pub fn mark_stopped(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether the controller is currently stopping the renderer.
    pub fn is_stop_in_progress(&self) -> bool {
        self.stop_in_progress.load(Ordering::Acquire)
    }

    /// Claim the stop guard. Returns false if a stop is already in progress.
    pub fn begin_stop(&self) -> bool {
        self.stop_in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the stop guard.
    pub fn end_stop(&self) {
        self.stop_in_progress.store(false, Ordering::Release);
    }

    /// Whether the writer exited on end of input.
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    /// Record that the writer has permanently finished.
    pub fn mark_completed(&self) {
        self.completed.store(true, Ordering::Release);
    }

    /// Whether the writer may write the next chunk.
    pub fn may_write(&self) -> bool {
        !self.is_paused() && !self.is_stopped() && !self.is_stop_in_progress()
    }

    /// Derived state, `Stopped` dominating `Paused`.
    pub fn state(&self) -> SessionState {
        if self.is_stopped() {
            SessionState::Stopped
        } else if self.is_completed() {
            SessionState::Completed
        } else if self.is_paused() {
            SessionState::Paused
        } else {
            SessionState::Running
        }
    }
}

/// Session state derived from the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Writing normally.
    Running,
    /// Waiting for a resume.
    Paused,
    /// Stopped for good, whatever else is set.
    Stopped,
    /// The writer reached end of input.
    Completed,
}
