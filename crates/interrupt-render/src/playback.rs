//! One playback attempt, from header to release.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::Arc;
use std::thread;

use tracing::{error, info, instrument};

use crate::config::PlaybackConfig;
use crate::controller::RenderController;
use crate::error::RenderError;
use crate::renderer::{AudioRenderer, RendererState};
use crate::session::{RenderSession, SessionState};
use crate::source::SampleSource;
use crate::wav::WavHeader;
use crate::writer::{StreamWriter, WriterReport};
use crate::RenderResult;

/// Result of a finished playback.
#[derive(Debug, Clone)]
pub struct PlaybackOutcome {
    /// What the writer did.
    pub report: WriterReport,

    /// Session state after the writer exited.
    pub state: SessionState,
}

/// Drives a renderer through one playback attempt.
pub struct Playback {
    controller: Arc<RenderController>,
    config: PlaybackConfig,
}

impl Playback {
    /// Create a playback over `renderer`.
    pub fn new(renderer: Arc<dyn AudioRenderer>, config: PlaybackConfig) -> Self {
        let session = Arc::new(RenderSession::new());
        Self {
            controller: Arc::new(RenderController::new(renderer, session)),
            config,
        }
    }

    /// The controller receiving interrupts for this playback.
    pub fn controller(&self) -> &Arc<RenderController> {
        &self.controller
    }

    /// The shared session flags.
    pub fn session(&self) -> &Arc<RenderSession> {
        self.controller.session()
    }

    /// Play a WAV file.
    pub fn play_file(&self, path: &Path) -> RenderResult<PlaybackOutcome> {
        let file = File::open(path).inspect_err(|e| {
            error!(path = %path.display(), "Unable to open wave file: {}", e);
        })?;
        self.play(BufReader::new(file))
    }

    /// Play WAV data from `reader`, blocking until the writer exits.
    ///
    /// Header, configuration, callback and start failures abort the
    /// playback; the renderer is released in every case.
    #[instrument(name = "playback", skip(self, reader))]
    pub fn play<R>(&self, mut reader: R) -> RenderResult<PlaybackOutcome>
    where
        R: Read + Seek + Send + 'static,
    {
        info!(stream_type = ?self.config.stream_type, "Playback start");

        let header = match WavHeader::read_from(&mut reader) {
            Ok(header) => header,
            Err(e) => {
                error!("{}", e);
                self.controller.release();
                return Err(e);
            }
        };

        self.controller.initialize(&header.renderer_params())?;

        if let Err(e) = self.controller.register_callback() {
            self.controller.release();
            return Err(e);
        }

        if !self.controller.start() {
            self.controller.release();
            self.session().mark_completed();
            return Err(RenderError::StartFailed);
        }

        let renderer = self.controller.renderer().ok_or(RenderError::Released)?;
        let writer = StreamWriter::new(
            SampleSource::new(reader),
            renderer,
            Arc::clone(self.session()),
            &self.config,
        );

        let spawned = thread::Builder::new()
            .name("stream-writer".into())
            .spawn(move || writer.run());

        let joined = match spawned {
            Ok(handle) => handle.join().map_err(|_| RenderError::WriterPanicked),
            Err(e) => Err(RenderError::Io(e)),
        };

        // The writer has exited (or never ran) before the renderer goes away.
        self.teardown();

        let report = joined?;
        let state = self.session().state();
        info!(?state, bytes = report.bytes_written, "Playback end");

        Ok(PlaybackOutcome { report, state })
    }

    fn teardown(&self) {
        if self.controller.status() == Some(RendererState::Running) {
            self.controller.stop();
        }
        self.controller.release();
    }
}
