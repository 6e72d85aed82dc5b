//! WAV file format validator.

use std::ops::Range;

use super::id3::{validate_id3, Id3Tag};
use super::{read_u16_le, read_u32_le, FormatError};

const MIN_HEADER_SIZE: usize = 44;

/// Information extracted from a rendered WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Audio format code (1 = PCM).
    pub audio_format: u16,
    /// Byte rate (sample_rate * block_align).
    pub byte_rate: u32,
    /// Block alignment (channels * bits_per_sample / 8).
    pub block_align: u16,
    /// Value of the RIFF size field.
    pub riff_size: u32,
    /// Number of frames in the data chunk.
    pub num_frames: usize,
    /// Byte range of the PCM payload within the file.
    pub data: Range<usize>,
    /// Decoded trailing `ID3 ` chunk, if present.
    pub tag: Option<Id3Tag>,
}

impl WavInfo {
    /// Interleaved samples of the data chunk.
    pub fn samples(&self, file: &[u8]) -> Vec<i16> {
        file[self.data.clone()]
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }
}

/// Validate a WAV file and extract its header, payload range and tags.
///
/// Checks:
/// - RIFF/WAVE identifiers and a RIFF size equal to the file size minus 8
/// - a 16-byte PCM `fmt ` chunk with consistent derived fields
/// - a `data` chunk that fits the file and holds whole frames
/// - an optional `ID3 ` chunk after the data, which must decode cleanly
pub fn validate_wav(data: &[u8]) -> Result<WavInfo, FormatError> {
    if data.len() < MIN_HEADER_SIZE {
        return Err(FormatError::new(
            "WAV",
            format!(
                "File too short: {} bytes (minimum {} required)",
                data.len(),
                MIN_HEADER_SIZE
            ),
        ));
    }

    // Check RIFF header
    if &data[0..4] != b"RIFF" {
        return Err(FormatError::at_offset(
            "WAV",
            format!("Invalid RIFF header: expected 'RIFF', got {:?}", &data[0..4]),
            0,
        ));
    }
    let riff_size = read_u32_le(data, 4);
    if riff_size as usize + 8 != data.len() {
        return Err(FormatError::at_offset(
            "WAV",
            format!(
                "RIFF size {} does not match file length {}",
                riff_size,
                data.len()
            ),
            4,
        ));
    }

    // Check WAVE format
    if &data[8..12] != b"WAVE" {
        return Err(FormatError::at_offset(
            "WAV",
            format!("Invalid WAVE format: expected 'WAVE', got {:?}", &data[8..12]),
            8,
        ));
    }

    let mut fmt: Option<[u32; 6]> = None;
    let mut payload: Option<Range<usize>> = None;
    let mut tag = None;

    // Chunks are laid out back to back; the writer never pads them.
    let mut offset = 12;
    while offset + 8 <= data.len() {
        let chunk_id = &data[offset..offset + 4];
        let chunk_size = read_u32_le(data, offset + 4) as usize;
        let body = offset + 8;
        if body + chunk_size > data.len() {
            return Err(FormatError::at_offset(
                "WAV",
                format!(
                    "Chunk {:?} of {} bytes overruns the file",
                    String::from_utf8_lossy(chunk_id),
                    chunk_size
                ),
                offset,
            ));
        }

        match chunk_id {
            b"fmt " => {
                if chunk_size < 16 {
                    return Err(FormatError::at_offset(
                        "WAV",
                        format!("fmt chunk too small: {} bytes", chunk_size),
                        offset,
                    ));
                }
                fmt = Some([
                    u32::from(read_u16_le(data, body)),
                    u32::from(read_u16_le(data, body + 2)),
                    read_u32_le(data, body + 4),
                    read_u32_le(data, body + 8),
                    u32::from(read_u16_le(data, body + 12)),
                    u32::from(read_u16_le(data, body + 14)),
                ]);
            }
            b"data" => {
                if fmt.is_none() {
                    return Err(FormatError::at_offset(
                        "WAV",
                        "data chunk found before fmt chunk",
                        offset,
                    ));
                }
                payload = Some(body..body + chunk_size);
            }
            b"ID3 " => {
                if payload.is_none() {
                    return Err(FormatError::at_offset(
                        "WAV",
                        "ID3 chunk found before data chunk",
                        offset,
                    ));
                }
                tag = Some(
                    validate_id3(&data[body..body + chunk_size])
                        .map_err(|e| FormatError::at_offset("WAV", e.to_string(), body))?,
                );
            }
            _ => {}
        }
        offset = body + chunk_size;
    }

    if offset != data.len() {
        return Err(FormatError::at_offset(
            "WAV",
            format!("{} trailing bytes after the last chunk", data.len() - offset),
            offset,
        ));
    }

    let [audio_format, channels, sample_rate, byte_rate, block_align, bits_per_sample] =
        fmt.ok_or_else(|| FormatError::new("WAV", "Missing fmt chunk"))?;
    let payload = payload.ok_or_else(|| FormatError::new("WAV", "Missing data chunk"))?;

    if channels == 0 || block_align != channels * bits_per_sample / 8 {
        return Err(FormatError::new(
            "WAV",
            format!(
                "Inconsistent block align {} for {} channels of {} bits",
                block_align, channels, bits_per_sample
            ),
        ));
    }
    if u64::from(byte_rate) != u64::from(sample_rate) * u64::from(block_align) {
        return Err(FormatError::new(
            "WAV",
            format!("Byte rate {} does not match sample rate", byte_rate),
        ));
    }
    if payload.len() % block_align as usize != 0 {
        return Err(FormatError::new(
            "WAV",
            format!("data chunk of {} bytes holds a partial frame", payload.len()),
        ));
    }

    Ok(WavInfo {
        channels: channels as u16,
        sample_rate,
        bits_per_sample: bits_per_sample as u16,
        audio_format: audio_format as u16,
        byte_rate,
        block_align: block_align as u16,
        riff_size,
        num_frames: payload.len() / block_align as usize,
        data: payload,
        tag,
    })
}
