//! Renderer lifecycle and interrupt handling.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use interrupt_ipc::{InterruptEvent, InterruptListener};

use crate::error::RenderError;
use crate::policy::{decide, Action};
use crate::renderer::{AudioRenderer, RendererParams, RendererState};
use crate::session::RenderSession;
use crate::RenderResult;

/// Owns the renderer for one session and applies interrupt decisions to the
/// session flags.
pub struct RenderController {
    renderer: RwLock<Option<Arc<dyn AudioRenderer>>>,
    session: Arc<RenderSession>,
}

impl RenderController {
    /// Create a controller for `renderer` driving `session`.
    pub fn new(renderer: Arc<dyn AudioRenderer>, session: Arc<RenderSession>) -> Self {
        Self {
            renderer: RwLock::new(Some(renderer)),
            session,
        }
    }

    /// Create a controller with no renderer attached.
    pub fn detached(session: Arc<RenderSession>) -> Self {
        Self {
            renderer: RwLock::new(None),
            session,
        }
    }

    /// The session flags.
    pub fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    /// The renderer, unless released.
    pub fn renderer(&self) -> Option<Arc<dyn AudioRenderer>> {
        self.renderer.read().clone()
    }

    /// Renderer state, unless released.
    pub fn status(&self) -> Option<RendererState> {
        self.renderer().map(|renderer| renderer.status())
    }

    /// Configure the renderer. On failure the renderer is released.
    #[instrument(name = "controller_initialize", skip(self))]
    pub fn initialize(&self, params: &RendererParams) -> RenderResult<()> {
        let renderer = self.renderer().ok_or(RenderError::Released)?;

        if let Err(e) = renderer.set_params(params) {
            error!("Set audio renderer parameters failed: {}", e);
            self.release();
            return Err(e);
        }

        info!("Playback renderer configured");
        Ok(())
    }

    /// Register this controller as the renderer's interrupt listener.
    pub fn register_callback(self: &Arc<Self>) -> RenderResult<()> {
        let renderer = self.renderer().ok_or(RenderError::Released)?;
        let listener: Weak<dyn InterruptListener> = Arc::downgrade(self) as Weak<dyn InterruptListener>;

        renderer.set_callback(listener).inspect_err(|e| {
            error!("Set renderer callback failed: {}", e);
        })?;

        debug!("Renderer callback registered");
        Ok(())
    }

    /// Start the renderer.
    pub fn start(&self) -> bool {
        let Some(renderer) = self.renderer() else {
            error!("Start requested without a renderer");
            return false;
        };

        if !renderer.start() {
            error!("Renderer start failed");
            return false;
        }

        info!("Playback started");
        true
    }

    /// Stop the renderer. Returns false if a stop is already in progress.
    #[instrument(name = "controller_stop", skip(self))]
    pub fn stop(&self) -> bool {
        if !self.session.begin_stop() {
            debug!("Stop already in progress");
            return false;
        }

        let stopped = self.renderer().is_some_and(|renderer| renderer.stop());
        self.session.end_stop();

        if stopped {
            info!("Renderer stopped");
        } else {
            warn!("Renderer stop failed");
        }
        stopped
    }

    /// Release the renderer. Later resumes become no-ops.
    #[instrument(name = "controller_release", skip(self))]
    pub fn release(&self) -> bool {
        let Some(renderer) = self.renderer.write().take() else {
            debug!("Renderer already released");
            return false;
        };

        if renderer.release() {
            info!("Renderer released");
            true
        } else {
            warn!("Renderer release failed");
            false
        }
    }

    /// Apply the decision for `event`.
    pub fn handle(&self, event: &InterruptEvent) {
        debug!(hint = ?event.hint_type, force = ?event.force_type, "Interrupt");

        match decide(event) {
            Action::SetPaused => {
                debug!("Forced pause, pause writing");
                self.session.set_paused(true);
            }
            Action::SetStopped => {
                debug!("Forced stop, stop writing");
                self.session.mark_stopped();
            }
            Action::AttemptResume => self.resume(),
            Action::Ignore(reason) if reason.is_unexpected() => {
                error!(?reason, hint = ?event.hint_type, "Interrupt not handled");
            }
            Action::Ignore(reason) => {
                info!(?reason, "Interrupt received, no action");
            }
        }
    }

    fn resume(&self) {
        let Some(renderer) = self.renderer() else {
            debug!("Resume without a renderer, ignoring");
            return;
        };

        if self.session.resume_with(|| renderer.start()) {
            debug!("Resume success");
        } else {
            warn!("Resume failed");
        }
    }
}

impl InterruptListener for RenderController {
    fn on_interrupt(&self, event: &InterruptEvent) {
        self.handle(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{EncodingType, SampleFormat, StreamType};
    use crate::simulated::SimulatedRenderer;
    use interrupt_ipc::{ForceType, InterruptHint, InterruptType};

    fn params() -> RendererParams {
        RendererParams {
            sample_format: SampleFormat::S16Le,
            sample_rate: 48000,
            channels: 2,
            encoding: EncodingType::Pcm,
        }
    }

    fn running() -> (Arc<RenderController>, Arc<SimulatedRenderer>) {
        let renderer = Arc::new(SimulatedRenderer::create(StreamType::Music));
        let controller = Arc::new(RenderController::new(
            renderer.clone(),
            Arc::new(RenderSession::new()),
        ));
        controller.initialize(&params()).unwrap();
        assert!(controller.start());
        (controller, renderer)
    }

    fn event(force: ForceType, hint: InterruptHint) -> InterruptEvent {
        InterruptEvent::begin(force, hint)
    }

    #[test]
    fn test_force_pause_sets_paused_only() {
        let (controller, _) = running();
        let e = InterruptEvent::new(InterruptType::Begin, ForceType::Force, InterruptHint::Pause, 0.0);

        controller.handle(&e);

        assert!(controller.session().is_paused());
        assert!(!controller.session().is_stopped());
    }

    #[test]
    fn test_force_stop_sets_stopped() {
        let (controller, _) = running();
        controller.handle(&event(ForceType::Force, InterruptHint::Stop));
        assert!(controller.session().is_stopped());
    }

    #[test]
    fn test_resume_clears_pause_on_success() {
        let (controller, renderer) = running();
        controller.handle(&event(ForceType::Force, InterruptHint::Pause));
        renderer.pause();

        controller.handle(&event(ForceType::Share, InterruptHint::Resume));

        assert!(!controller.session().is_paused());
        assert_eq!(renderer.status(), RendererState::Running);
    }

    #[test]
    fn test_resume_keeps_pause_on_failure() {
        let (controller, renderer) = running();
        controller.handle(&event(ForceType::Force, InterruptHint::Pause));
        renderer.fail_next_starts(1);

        controller.handle(&event(ForceType::Share, InterruptHint::Resume));

        assert!(controller.session().is_paused());
    }

    #[test]
    fn test_resume_without_renderer_is_noop() {
        let session = Arc::new(RenderSession::new());
        session.set_paused(true);
        let controller = RenderController::detached(Arc::clone(&session));

        controller.handle(&event(ForceType::Share, InterruptHint::Resume));

        assert!(session.is_paused());
    }

    #[test]
    fn test_resume_after_release_is_noop() {
        let (controller, _) = running();
        controller.handle(&event(ForceType::Force, InterruptHint::Pause));
        assert!(controller.release());

        controller.handle(&event(ForceType::Share, InterruptHint::Resume));

        assert!(controller.session().is_paused());
        assert!(controller.status().is_none());
    }

    #[test]
    fn test_ignored_events_change_nothing() {
        let (controller, renderer) = running();
        for (force, hint) in [
            (ForceType::Force, InterruptHint::Duck),
            (ForceType::Force, InterruptHint::Unduck),
            (ForceType::Force, InterruptHint::None),
            (ForceType::Share, InterruptHint::Pause),
            (ForceType::Share, InterruptHint::Stop),
            (ForceType::Unknown(9), InterruptHint::Stop),
        ] {
            controller.handle(&event(force, hint));
        }

        let session = controller.session();
        assert!(!session.is_paused());
        assert!(!session.is_stopped());
        assert_eq!(renderer.start_calls(), 1);
    }

    #[test]
    fn test_initialize_failure_releases_renderer() {
        let renderer = Arc::new(SimulatedRenderer::create(StreamType::Music));
        renderer.reject_params(true);
        let controller = RenderController::new(renderer.clone(), Arc::new(RenderSession::new()));

        assert!(controller.initialize(&params()).is_err());
        assert_eq!(renderer.status(), RendererState::Released);
        assert!(controller.renderer().is_none());
    }

    #[test]
    fn test_callback_goes_through_renderer_bridge() {
        let (controller, renderer) = running();
        controller.register_callback().unwrap();

        renderer
            .bridge()
            .deliver(&event(ForceType::Force, InterruptHint::Stop));

        assert!(controller.session().is_stopped());
    }

    #[test]
    fn test_stop_and_release_report_failures() {
        let (controller, _) = running();
        assert!(controller.stop());
        assert!(!controller.stop());
        assert!(!controller.session().is_stop_in_progress());
        assert!(controller.release());
        assert!(!controller.release());
        assert!(!controller.stop());
    }

    #[test]
    fn test_stop_guard_blocks_reentry() {
        let (controller, _) = running();
        assert!(controller.session().begin_stop());
        assert!(!controller.stop());
        controller.session().end_stop();
    }
}
