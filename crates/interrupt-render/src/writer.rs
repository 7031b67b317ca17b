//! Background loop feeding source samples to the renderer.

use std::io::{Read, Seek};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, instrument, trace, warn};

use crate::config::PlaybackConfig;
use crate::renderer::{AudioRenderer, RendererState};
use crate::session::RenderSession;
use crate::source::SampleSource;

/// Summary of one writer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterReport {
    /// Chunks read from the source.
    pub chunks: u64,

    /// Bytes accepted by the renderer.
    pub bytes_written: u64,

    /// Times the source was rewound after a rejected write.
    pub seek_backs: u64,

    /// Exited on end of input.
    pub completed: bool,

    /// Exited because the session was stopped.
    pub stopped: bool,
}

/// Drains a sample source into a renderer while the session allows it.
pub struct StreamWriter<R> {
    source: SampleSource<R>,
    renderer: Arc<dyn AudioRenderer>,
    session: Arc<RenderSession>,
    min_write_bytes: usize,
    poll_interval: Duration,
}

impl<R: Read + Seek> StreamWriter<R> {
    /// Create a writer.
    pub fn new(
        source: SampleSource<R>,
        renderer: Arc<dyn AudioRenderer>,
        session: Arc<RenderSession>,
        config: &PlaybackConfig,
    ) -> Self {
        Self {
            source,
            renderer,
            session,
            min_write_bytes: config.min_write_bytes,
            poll_interval: config.pause_poll_interval,
        }
    }

    /// Run until end of input or until the session is stopped.
    ///
    /// Flags are checked once per chunk. While paused the writer sleeps for
    /// the poll interval between checks.
    #[instrument(name = "stream_writer", skip(self))]
    pub fn run(mut self) -> WriterReport {
        let mut report = WriterReport::default();

        let chunk_len = match self.renderer.buffer_size() {
            Ok(0) => {
                warn!("Renderer reported a zero buffer size, nothing to write");
                return self.finish_completed(report);
            }
            Ok(len) => len,
            Err(e) => {
                error!("Failed to get minimum buffer length: {}", e);
                return self.finish_completed(report);
            }
        };
        debug!(chunk_len, "Minimum buffer length");

        let mut buffer = vec![0u8; chunk_len];

        loop {
            while !self.source.is_eof() && self.session.may_write() {
                let to_write = match self.source.read_chunk(&mut buffer) {
                    Ok(n) => n,
                    Err(e) => {
                        error!("Source read failed: {}", e);
                        report.stopped = self.session.is_stopped();
                        return report;
                    }
                };
                report.chunks += 1;
                trace!(to_write, "Bytes to write");

                self.write_chunk(&buffer[..to_write], &mut report);
            }

            if self.source.is_eof() {
                info!(
                    chunks = report.chunks,
                    bytes = report.bytes_written,
                    "End of input, rendering completed"
                );
                return self.finish_completed(report);
            }

            if self.session.is_stopped() {
                info!(bytes = report.bytes_written, "Renderer stopping, writing done");
                report.stopped = true;
                return report;
            }

            thread::sleep(self.poll_interval);
        }
    }

    /// Write one chunk, rewinding the source if the renderer was paused
    /// partway through.
    fn write_chunk(&mut self, chunk: &[u8], report: &mut WriterReport) {
        let to_write = chunk.len();
        let mut written = 0usize;

        while written < to_write && to_write - written > self.min_write_bytes {
            match self.renderer.write(&chunk[written..]) {
                Ok(n) if n > 0 => {
                    let n = n.min(to_write - written);
                    written += n;
                    report.bytes_written += n as u64;
                }
                result => {
                    if let Err(e) = result {
                        debug!("Write rejected: {}", e);
                    }

                    let renderer = &self.renderer;
                    if self
                        .session
                        .pause_if(|| renderer.status() == RendererState::Paused)
                    {
                        // written - to_write is negative: back to the first
                        // byte the renderer did not take.
                        let offset = written as i64 - to_write as i64;
                        match self.source.seek_relative(offset) {
                            Ok(position) => {
                                report.seek_backs += 1;
                                debug!(offset, position, "Rewound source after pause");
                            }
                            Err(e) => warn!("Rewinding source failed: {}", e),
                        }
                    }
                    break;
                }
            }
        }
    }

    fn finish_completed(&self, mut report: WriterReport) -> WriterReport {
        self.session.mark_completed();
        report.completed = true;
        report
    }
}
