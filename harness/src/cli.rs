//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use interrupt_render::{StreamType, DEFAULT_MIN_BUFFER_SIZE};

use crate::script::InterruptStep;

/// Longest accepted input path, in bytes.
pub const PATH_MAX: usize = 4096;

/// Plays a PCM WAV file through a simulated renderer while reacting to
/// audio interrupts.
#[derive(Parser, Debug)]
#[command(name = "audio-interrupt-test")]
#[command(version)]
pub struct Args {
    /// WAV file to play.
    pub path: String,

    /// Numeric stream type code (base 10, not validated).
    pub stream_type: Option<String>,

    /// Chunk tails no larger than this are not written.
    #[arg(long, default_value_t = 4, env = "AUDIO_INTERRUPT_MIN_WRITE_BYTES")]
    pub min_write_bytes: usize,

    /// Poll interval while paused, in milliseconds.
    #[arg(long, default_value_t = 5, env = "AUDIO_INTERRUPT_POLL_INTERVAL_MS")]
    pub poll_interval_ms: u64,

    /// Minimum buffer size reported by the simulated renderer.
    #[arg(long, default_value_t = DEFAULT_MIN_BUFFER_SIZE, env = "AUDIO_INTERRUPT_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Write as fast as possible instead of at the audio's byte rate.
    #[arg(long, env = "AUDIO_INTERRUPT_NO_PACING")]
    pub no_pacing: bool,

    /// Interrupt to send during playback, as MS:FORCE:HINT
    /// (e.g. 500:force:pause, 1500:share:resume). May be repeated.
    #[arg(long = "interrupt", value_name = "MS:FORCE:HINT")]
    pub interrupts: Vec<InterruptStep>,
}

impl Args {
    /// Stream type from the optional positional code.
    pub fn stream_type(&self) -> StreamType {
        self.stream_type
            .as_deref()
            .map(|code| StreamType::from_code(parse_code(code)))
            .unwrap_or(StreamType::Music)
    }
}

/// Parse like `strtol(code, NULL, 10)`: optional leading whitespace and sign,
/// then the longest run of digits. No digits yields 0. Values outside `i32`
/// wrap, as the C cast does.
pub fn parse_code(code: &str) -> i32 {
    let trimmed = code.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    let value = if negative { -value } else { value };
    value as i32
}

/// Check the input path and resolve it to an absolute, existing path.
pub fn resolve_path(input: &str) -> Result<PathBuf> {
    if input.len() > PATH_MAX {
        bail!("Invalid input filepath: longer than {PATH_MAX} bytes");
    }
    std::fs::canonicalize(input).with_context(|| format!("Invalid input filepath: {input}"))
}
