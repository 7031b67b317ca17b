//! Renderer seam and its parameter types.

use std::sync::Weak;

use serde::{Deserialize, Serialize};

use interrupt_ipc::InterruptListener;

use crate::RenderResult;

/// Stream category a renderer is created for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamType {
    Default,
    VoiceCall,
    #[default]
    Music,
    Ring,
    Media,
    VoiceAssistant,
    System,
    Alarm,
    Notification,
    /// Any other code; passed through uninterpreted.
    Unknown(i32),
}

impl StreamType {
    /// Map a numeric code without validation.
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::Default,
            0 => Self::VoiceCall,
            1 => Self::Music,
            2 => Self::Ring,
            3 => Self::Media,
            4 => Self::VoiceAssistant,
            5 => Self::System,
            6 => Self::Alarm,
            7 => Self::Notification,
            other => Self::Unknown(other),
        }
    }

    /// Numeric code.
    pub fn code(self) -> i32 {
        match self {
            Self::Default => -1,
            Self::VoiceCall => 0,
            Self::Music => 1,
            Self::Ring => 2,
            Self::Media => 3,
            Self::VoiceAssistant => 4,
            Self::System => 5,
            Self::Alarm => 6,
            Self::Notification => 7,
            Self::Unknown(code) => code,
        }
    }
}

/// PCM sample layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleFormat {
    U8,
    S16Le,
    S24Le,
    S32Le,
    /// Bits per sample the renderer may not support.
    Unknown(u16),
}

impl SampleFormat {
    /// Map a bits-per-sample value.
    pub fn from_bits_per_sample(bits: u16) -> Self {
        match bits {
            8 => Self::U8,
            16 => Self::S16Le,
            24 => Self::S24Le,
            32 => Self::S32Le,
            other => Self::Unknown(other),
        }
    }

    /// Bytes per sample, if known.
    pub fn bytes_per_sample(self) -> Option<usize> {
        match self {
            Self::U8 => Some(1),
            Self::S16Le => Some(2),
            Self::S24Le => Some(3),
            Self::S32Le => Some(4),
            Self::Unknown(_) => None,
        }
    }
}

/// Encoding of the samples handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingType {
    Pcm,
}

/// Renderer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererParams {
    /// Sample layout.
    pub sample_format: SampleFormat,

    /// Sample rate in Hz.
    pub sample_rate: u32,

    /// Number of interleaved channels.
    pub channels: u16,

    /// Sample encoding.
    pub encoding: EncodingType,
}

impl RendererParams {
    /// Bytes consumed per second of audio, if the format is known.
    pub fn byte_rate(&self) -> Option<u64> {
        self.sample_format
            .bytes_per_sample()
            .map(|bytes| bytes as u64 * self.channels as u64 * self.sample_rate as u64)
    }
}

/// Lifecycle state reported by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RendererState {
    /// Created, not configured.
    New,

    /// Configured, not started.
    Prepared,

    /// Accepting samples.
    Running,

    /// Paused by the policy authority or by the client.
    Paused,

    /// Stopped.
    Stopped,

    /// Released; no further calls succeed.
    Released,
}

impl RendererState {
    /// Returns a simple string representation of the state.
    pub fn name(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Prepared => "Prepared",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
            Self::Released => "Released",
        }
    }
}

/// Output-side renderer.
///
/// All methods take `&self`: the stream writer writes while interrupt
/// delivery may call `start` from another thread.
pub trait AudioRenderer: Send + Sync {
    /// Configure the renderer.
    fn set_params(&self, params: &RendererParams) -> RenderResult<()>;

    /// Register the interrupt listener for this renderer's stream.
    fn set_callback(&self, listener: Weak<dyn InterruptListener>) -> RenderResult<()>;

    /// Start or resume output. Returns whether it succeeded.
    fn start(&self) -> bool;

    /// Stop output. Returns whether it succeeded.
    fn stop(&self) -> bool;

    /// Release all resources. Returns whether it succeeded.
    fn release(&self) -> bool;

    /// Current lifecycle state.
    fn status(&self) -> RendererState;

    /// Minimum buffer size in bytes.
    fn buffer_size(&self) -> RenderResult<usize>;

    /// Write samples, returning how many bytes were accepted.
    fn write(&self, data: &[u8]) -> RenderResult<usize>;
}
