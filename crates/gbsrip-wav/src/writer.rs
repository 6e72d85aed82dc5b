//! RIFF/WAVE header and trailing tag chunk.
//!
//! The header is written once, before any sample data, with sizes derived
//! from the planned frame count and the finished tag block.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{WavError, WavResult};
use crate::format::WavFormat;
use crate::id3::TagBlock;

/// Size of the header written by [`write_header`].
pub const HEADER_SIZE: usize = 44;

/// Chunk id of the trailing tag chunk.
pub const TAG_CHUNK_ID: &[u8; 4] = b"ID3 ";

/// Chunk id plus chunk length.
const CHUNK_HEADER_SIZE: u64 = 8;

/// Bytes between the RIFF size field and the data payload.
const RIFF_OVERHEAD: u64 = 36;

const FORMAT_PCM: u16 = 1;
const FMT_CHUNK_SIZE: u32 = 16;

/// Size of the `data` chunk payload for `total_frames` frames.
pub fn data_size(format: &WavFormat, total_frames: u64) -> WavResult<u32> {
    let size = total_frames
        .checked_mul(u64::from(format.block_align()))
        .ok_or_else(|| WavError::data_too_large("data chunk", u64::MAX))?;
    u32::try_from(size).map_err(|_| WavError::data_too_large("data chunk", size))
}

/// Bytes the trailing tag chunk adds after the data chunk.
pub fn trailing_size(tags: &TagBlock) -> u64 {
    if tags.has_frames() {
        tags.len() as u64 + CHUNK_HEADER_SIZE
    } else {
        0
    }
}

/// Value of the RIFF size field.
pub fn riff_size(format: &WavFormat, total_frames: u64, tags: &TagBlock) -> WavResult<u32> {
    let size = u64::from(data_size(format, total_frames)?) + RIFF_OVERHEAD + trailing_size(tags);
    u32::try_from(size).map_err(|_| WavError::data_too_large("RIFF chunk", size))
}

/// Writes the 44-byte RIFF/WAVE header.
pub fn write_header<W: Write>(
    writer: &mut W,
    format: &WavFormat,
    total_frames: u64,
    tags: &TagBlock,
) -> WavResult<()> {
    let riff = riff_size(format, total_frames, tags)?;
    let data = data_size(format, total_frames)?;
    let byte_rate = format.byte_rate().ok_or_else(|| {
        WavError::data_too_large(
            "byte rate",
            u64::from(format.sample_rate) * u64::from(format.block_align()),
        )
    })?;

    writer.write_all(b"RIFF")?;
    writer.write_u32::<LittleEndian>(riff)?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_u32::<LittleEndian>(FMT_CHUNK_SIZE)?;
    writer.write_u16::<LittleEndian>(FORMAT_PCM)?;
    writer.write_u16::<LittleEndian>(format.channels)?;
    writer.write_u32::<LittleEndian>(format.sample_rate)?;
    writer.write_u32::<LittleEndian>(byte_rate)?;
    writer.write_u16::<LittleEndian>(format.block_align())?;
    writer.write_u16::<LittleEndian>(format.bits_per_sample)?;

    writer.write_all(b"data")?;
    writer.write_u32::<LittleEndian>(data)?;

    Ok(())
}

/// Appends the tag block as an `ID3 ` chunk.
///
/// Nothing is written for a block without frames. The chunk is not padded
/// to an even length.
pub fn write_footer<W: Write>(writer: &mut W, tags: &TagBlock) -> WavResult<()> {
    if !tags.has_frames() {
        return Ok(());
    }
    let len = tags.len();
    let len = u32::try_from(len).map_err(|_| WavError::data_too_large("tag chunk", len as u64))?;

    writer.write_all(TAG_CHUNK_ID)?;
    writer.write_u32::<LittleEndian>(len)?;
    writer.write_all(tags.as_bytes())?;
    Ok(())
}

/// Writes a complete file from already packed PCM bytes.
///
/// A trailing partial frame in `pcm` is dropped.
pub fn write_wav<W: Write>(
    writer: &mut W,
    format: &WavFormat,
    pcm: &[u8],
    tags: &TagBlock,
) -> WavResult<()> {
    let block_align = usize::from(format.block_align()).max(1);
    let frames = pcm.len() / block_align;

    write_header(writer, format, frames as u64, tags)?;
    writer.write_all(&pcm[..frames * block_align])?;
    write_footer(writer, tags)
}
