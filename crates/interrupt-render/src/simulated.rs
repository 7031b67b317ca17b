//! In-memory renderer.
//!
//! Stands in for a platform renderer: it follows the same lifecycle, rejects
//! writes unless running, and can be scripted to fail or to be paused by the
//! policy authority partway through a stream.

use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use interrupt_ipc::{InterruptListener, ListenerBridge};

use crate::error::RenderError;
use crate::renderer::{AudioRenderer, RendererParams, RendererState, SampleFormat, StreamType};
use crate::RenderResult;

/// Default minimum buffer size in bytes.
pub const DEFAULT_MIN_BUFFER_SIZE: usize = 3528;

/// Static configuration of a [`SimulatedRenderer`].
#[derive(Debug, Clone)]
pub struct SimulatedConfig {
    /// Minimum buffer size reported to writers.
    pub min_buffer_size: usize,

    /// Largest number of bytes accepted by a single write.
    pub max_write: Option<usize>,

    /// Sleep after each write as long as the audio would take to play.
    pub pacing: bool,

    /// Keep a copy of every accepted byte.
    pub capture: bool,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            min_buffer_size: DEFAULT_MIN_BUFFER_SIZE,
            max_write: None,
            pacing: false,
            capture: true,
        }
    }
}

struct Inner {
    state: RendererState,
    params: Option<RendererParams>,
    written: Vec<u8>,
    bytes_written: u64,
    start_calls: u32,
    fail_starts: u32,
    fail_buffer_size: bool,
    reject_params: bool,
    reject_callback: bool,
    pause_at: Option<u64>,
}

/// Renderer that plays into memory.
pub struct SimulatedRenderer {
    stream_type: StreamType,
    config: SimulatedConfig,
    bridge: Arc<ListenerBridge>,
    inner: Mutex<Inner>,
}

impl SimulatedRenderer {
    /// Create a renderer for the given stream type.
    pub fn create(stream_type: StreamType) -> Self {
        Self::with_config(stream_type, SimulatedConfig::default())
    }

    /// Create a renderer with explicit configuration.
    pub fn with_config(stream_type: StreamType, config: SimulatedConfig) -> Self {
        debug!(?stream_type, "Simulated renderer created");
        Self {
            stream_type,
            config,
            bridge: Arc::new(ListenerBridge::new()),
            inner: Mutex::new(Inner {
                state: RendererState::New,
                params: None,
                written: Vec::new(),
                bytes_written: 0,
                start_calls: 0,
                fail_starts: 0,
                fail_buffer_size: false,
                reject_params: false,
                reject_callback: false,
                pause_at: None,
            }),
        }
    }

    /// Deliver interrupts registered through [`AudioRenderer::set_callback`]
    /// via `bridge` instead of a private one.
    pub fn with_bridge(mut self, bridge: Arc<ListenerBridge>) -> Self {
        self.bridge = bridge;
        self
    }

    /// Bridge that callbacks are registered on.
    pub fn bridge(&self) -> &Arc<ListenerBridge> {
        &self.bridge
    }

    /// Stream type this renderer was created for.
    pub fn stream_type(&self) -> StreamType {
        self.stream_type
    }

    /// Pause output as the policy authority would. Returns false unless running.
    pub fn pause(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != RendererState::Running {
            return false;
        }
        inner.state = RendererState::Paused;
        info!("Simulated renderer paused");
        true
    }

    /// Pause once `total` bytes have been accepted.
    pub fn pause_after(&self, total: u64) {
        self.inner.lock().pause_at = Some(total);
    }

    /// Make the next `count` calls to `start` fail.
    pub fn fail_next_starts(&self, count: u32) {
        self.inner.lock().fail_starts = count;
    }

    /// Make `buffer_size` fail.
    pub fn fail_buffer_size(&self, fail: bool) {
        self.inner.lock().fail_buffer_size = fail;
    }

    /// Make `set_params` fail.
    pub fn reject_params(&self, reject: bool) {
        self.inner.lock().reject_params = reject;
    }

    /// Make `set_callback` fail.
    pub fn reject_callback(&self, reject: bool) {
        self.inner.lock().reject_callback = reject;
    }

    /// Copy of every accepted byte, if capturing.
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().written.clone()
    }

    /// Total bytes accepted.
    pub fn bytes_written(&self) -> u64 {
        self.inner.lock().bytes_written
    }

    /// Number of `start` calls so far.
    pub fn start_calls(&self) -> u32 {
        self.inner.lock().start_calls
    }

    /// Parameters set on this renderer.
    pub fn params(&self) -> Option<RendererParams> {
        self.inner.lock().params
    }

    fn pacing_delay(&self, params: Option<RendererParams>, bytes: usize) -> Option<Duration> {
        if !self.config.pacing {
            return None;
        }
        let byte_rate = params.and_then(|p| p.byte_rate()).filter(|rate| *rate > 0)?;
        Some(Duration::from_secs_f64(bytes as f64 / byte_rate as f64))
    }
}

impl AudioRenderer for SimulatedRenderer {
    #[instrument(name = "sim_set_params", skip(self))]
    fn set_params(&self, params: &RendererParams) -> RenderResult<()> {
        let mut inner = self.inner.lock();

        match inner.state {
            RendererState::New | RendererState::Prepared => {}
            RendererState::Released => return Err(RenderError::Released),
            other => return Err(RenderError::InvalidState(other.name())),
        }

        if inner.reject_params {
            return Err(RenderError::InvalidParams("rejected by renderer".into()));
        }
        if let SampleFormat::Unknown(bits) = params.sample_format {
            return Err(RenderError::InvalidParams(format!(
                "unsupported bits per sample: {bits}"
            )));
        }
        if params.channels == 0 || params.sample_rate == 0 {
            return Err(RenderError::InvalidParams(format!(
                "channels={}, sample_rate={}",
                params.channels, params.sample_rate
            )));
        }

        inner.params = Some(*params);
        inner.state = RendererState::Prepared;
        Ok(())
    }

    fn set_callback(&self, listener: Weak<dyn InterruptListener>) -> RenderResult<()> {
        let inner = self.inner.lock();
        if inner.state == RendererState::Released {
            return Err(RenderError::Released);
        }
        if inner.reject_callback {
            return Err(RenderError::CallbackRegistration(
                "rejected by renderer".into(),
            ));
        }
        drop(inner);

        self.bridge.register_weak(listener);
        Ok(())
    }

    fn start(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.start_calls += 1;

        if inner.fail_starts > 0 {
            inner.fail_starts -= 1;
            warn!("Simulated start failure");
            return false;
        }

        match inner.state {
            RendererState::Prepared | RendererState::Paused | RendererState::Stopped => {
                inner.state = RendererState::Running;
                true
            }
            RendererState::Running => true,
            RendererState::New | RendererState::Released => false,
        }
    }

    fn stop(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            RendererState::Running | RendererState::Paused => {
                inner.state = RendererState::Stopped;
                true
            }
            _ => false,
        }
    }

    fn release(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == RendererState::Released {
            return false;
        }
        inner.state = RendererState::Released;
        drop(inner);

        self.bridge.unregister();
        true
    }

    fn status(&self) -> RendererState {
        self.inner.lock().state
    }

    fn buffer_size(&self) -> RenderResult<usize> {
        let inner = self.inner.lock();
        if inner.state == RendererState::Released {
            return Err(RenderError::Released);
        }
        if inner.fail_buffer_size {
            return Err(RenderError::BufferSize("not available".into()));
        }
        Ok(self.config.min_buffer_size)
    }

    fn write(&self, data: &[u8]) -> RenderResult<usize> {
        let (accepted, params) = {
            let mut inner = self.inner.lock();

            if inner.state != RendererState::Running {
                return Err(RenderError::WriteRejected(inner.state.name()));
            }

            let mut accepted = data.len();
            if let Some(max) = self.config.max_write {
                accepted = accepted.min(max);
            }
            if let Some(pause_at) = inner.pause_at {
                let room = pause_at.saturating_sub(inner.bytes_written) as usize;
                if room == 0 {
                    inner.pause_at = None;
                    inner.state = RendererState::Paused;
                    info!(bytes_written = inner.bytes_written, "Simulated renderer paused");
                    return Err(RenderError::WriteRejected(inner.state.name()));
                }
                accepted = accepted.min(room);
            }

            if self.config.capture {
                inner.written.extend_from_slice(&data[..accepted]);
            }
            inner.bytes_written += accepted as u64;
            (accepted, inner.params)
        };

        trace!(accepted, "Simulated write");

        if let Some(delay) = self.pacing_delay(params, accepted) {
            thread::sleep(delay);
        }

        Ok(accepted)
    }
}
