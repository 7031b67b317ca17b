//! Canonical WAV header.

use std::io::Read;

use bytes::Buf;
use tracing::debug;

use crate::error::RenderError;
use crate::renderer::{EncodingType, RendererParams, SampleFormat};
use crate::RenderResult;

/// Size of the canonical RIFF/WAVE header.
pub const WAV_HEADER_LEN: usize = 44;

/// The fixed 44-byte header at the start of a PCM WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_size: u32,
    pub fmt_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_tag: [u8; 4],
    pub data_size: u32,
}

impl WavHeader {
    /// Read the header, leaving `reader` at the first sample byte.
    pub fn read_from<R: Read>(reader: &mut R) -> RenderResult<Self> {
        let mut raw = [0u8; WAV_HEADER_LEN];
        reader
            .read_exact(&mut raw)
            .map_err(|e| RenderError::Header(format!("file header reading error: {e}")))?;
        Self::parse(&raw)
    }

    /// Parse a header from raw bytes.
    pub fn parse(raw: &[u8; WAV_HEADER_LEN]) -> RenderResult<Self> {
        let mut buf = &raw[..];

        let riff = take_tag(&mut buf);
        let riff_size = buf.get_u32_le();
        let wave = take_tag(&mut buf);
        if &riff != b"RIFF" || &wave != b"WAVE" {
            return Err(RenderError::Header("not a RIFF/WAVE file".into()));
        }

        let fmt = take_tag(&mut buf);
        if &fmt != b"fmt " {
            return Err(RenderError::Header("missing fmt chunk".into()));
        }

        let header = Self {
            riff_size,
            fmt_size: buf.get_u32_le(),
            audio_format: buf.get_u16_le(),
            channels: buf.get_u16_le(),
            sample_rate: buf.get_u32_le(),
            byte_rate: buf.get_u32_le(),
            block_align: buf.get_u16_le(),
            bits_per_sample: buf.get_u16_le(),
            data_tag: take_tag(&mut buf),
            data_size: buf.get_u32_le(),
        };

        debug!(
            channels = header.channels,
            sample_rate = header.sample_rate,
            bits_per_sample = header.bits_per_sample,
            "WAV header read"
        );

        Ok(header)
    }

    /// Renderer parameters for this file.
    pub fn renderer_params(&self) -> RendererParams {
        RendererParams {
            sample_format: SampleFormat::from_bits_per_sample(self.bits_per_sample),
            sample_rate: self.sample_rate,
            channels: self.channels,
            encoding: EncodingType::Pcm,
        }
    }
}

fn take_tag(buf: &mut &[u8]) -> [u8; 4] {
    let mut tag = [0u8; 4];
    buf.copy_to_slice(&mut tag);
    tag
}
