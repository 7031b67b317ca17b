//! Interrupt-aware audio rendering.
//!
//! A [`Playback`] feeds samples to an [`AudioRenderer`] from a dedicated
//! writer thread while interrupt events, delivered on another thread, flip
//! the shared [`RenderSession`] flags through a [`RenderController`].

mod config;
mod controller;
mod error;
mod playback;
mod policy;
mod renderer;
mod session;
mod simulated;
mod source;
mod wav;
mod writer;

pub use config::PlaybackConfig;
pub use controller::RenderController;
pub use error::RenderError;
pub use playback::{Playback, PlaybackOutcome};
pub use policy::{decide, Action, IgnoreReason};
pub use renderer::{
    AudioRenderer, EncodingType, RendererParams, RendererState, SampleFormat, StreamType,
};
pub use session::{RenderSession, SessionState};
pub use simulated::{SimulatedConfig, SimulatedRenderer, DEFAULT_MIN_BUFFER_SIZE};
pub use source::SampleSource;
pub use wav::{WavHeader, WAV_HEADER_LEN};
pub use writer::{StreamWriter, WriterReport};

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
