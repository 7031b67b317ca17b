//! Exit status contract of the harness binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::TempDir;

fn harness() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_audio-interrupt-test"));
    command.env("RUST_LOG", "off");
    command
}

fn run(args: &[&str]) -> Output {
    harness().args(args).output().unwrap()
}

fn write_wav(dir: &Path) -> PathBuf {
    let path = dir.join("tone.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for i in 0..4000 {
        writer.write_sample((i % 100) as i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn test_missing_arguments_exit_zero() {
    assert_eq!(run(&[]).status.code(), Some(0));
}

#[test]
fn test_malformed_flag_exits_zero() {
    let output = run(&["a.wav", "--interrupt", "soon"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_nonexistent_path_fails() {
    let output = run(&["/nonexistent/dir/never.wav"]);
    assert_eq!(output.status.code(), Some(255));
}

#[test]
fn test_overlong_path_fails() {
    let long = "a".repeat(5000);
    assert_eq!(run(&[&long]).status.code(), Some(255));
}

#[test]
fn test_bad_header_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.wav");
    std::fs::write(&path, b"RIFF").unwrap();

    let output = run(&[path.to_str().unwrap(), "--no-pacing"]);
    assert_eq!(output.status.code(), Some(255));
}

#[test]
fn test_plays_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path());

    let output = run(&[path.to_str().unwrap(), "1", "--no-pacing"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_unknown_stream_code_is_passed_through() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path());

    let output = run(&[path.to_str().unwrap(), "abc", "--no-pacing"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_scripted_pause_and_resume() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path());

    // 8000 bytes at 16000 bytes/s: about half a second of paced playback.
    let output = run(&[
        path.to_str().unwrap(),
        "--interrupt",
        "100:force:pause",
        "--interrupt",
        "200:share:resume",
    ]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_env_fallback_for_flags() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path());

    let output = harness()
        .arg(path.to_str().unwrap())
        .env("AUDIO_INTERRUPT_NO_PACING", "true")
        .env("AUDIO_INTERRUPT_BUFFER_SIZE", "512")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
}
