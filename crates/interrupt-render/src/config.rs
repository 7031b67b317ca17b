//! Playback configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::renderer::StreamType;

/// Configuration for one playback attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Stream type the renderer is created for.
    pub stream_type: StreamType,

    /// Chunk tails no larger than this are not written (default: 4).
    pub min_write_bytes: usize,

    /// How long the writer sleeps between flag checks while paused.
    pub pause_poll_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            stream_type: StreamType::Music,
            min_write_bytes: 4,
            pause_poll_interval: Duration::from_millis(5),
        }
    }
}
