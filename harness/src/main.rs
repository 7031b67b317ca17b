//! Interrupt playback harness.
//!
//! Plays a PCM WAV file through a simulated renderer, bound to an interrupt
//! channel, and reports the result through the process exit code.

mod cli;
mod script;

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use interrupt_ipc::{bind_local, ListenerBridge};
use interrupt_render::{Playback, PlaybackConfig, SimulatedConfig, SimulatedRenderer};

use cli::Args;

/// Exit status for failures, `-1` truncated to a byte.
const EXIT_FAILURE: u8 = 255;

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "audio_interrupt_test=debug,interrupt_ipc=debug,interrupt_render=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> ExitCode {
    init_logging();
    info!("Render test in");

    // Bad arguments are reported but are not a failure.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            error!("Usage: audio-interrupt-test <path> [<streamTypeCode>]");
            return ExitCode::SUCCESS;
        }
    };

    match run(args) {
        Ok(()) => {
            info!("Render test out");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let path = cli::resolve_path(&args.path)?;
    let stream_type = args.stream_type();
    info!(path = %path.display(), ?stream_type, "Path and stream type");

    let file = File::open(&path)
        .with_context(|| format!("Unable to open wave file {}", path.display()))?;

    let bridge = Arc::new(ListenerBridge::new());
    let binding = bind_local(Arc::clone(&bridge)).context("Interrupt binding failed")?;

    let renderer = Arc::new(
        SimulatedRenderer::with_config(
            stream_type,
            SimulatedConfig {
                min_buffer_size: args.buffer_size,
                max_write: None,
                pacing: !args.no_pacing,
                capture: false,
            },
        )
        .with_bridge(bridge),
    );

    let config = PlaybackConfig {
        stream_type,
        min_write_bytes: args.min_write_bytes,
        pause_poll_interval: Duration::from_millis(args.poll_interval_ms),
    };
    let playback = Playback::new(renderer.clone(), config);

    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);
    let script = script::spawn(args.interrupts, binding.proxy(), renderer, done_rx)
        .context("Failed to start interrupt script")?;

    let result = playback.play(BufReader::new(file));

    drop(done_tx);
    script::join(script);
    binding.teardown();

    let outcome = result.context("Playback failed")?;
    info!(
        state = ?outcome.state,
        bytes = outcome.report.bytes_written,
        seek_backs = outcome.report.seek_backs,
        "Playback finished"
    );
    Ok(())
}
