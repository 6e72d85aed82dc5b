//! Growable ID3v2.4 tag block.
//!
//! The block is a 10-byte tag header followed by frames. Every mutating call
//! leaves the header's syncsafe size equal to the number of bytes after the
//! header, so the block can be written out at any point.
//!
//! All text frames use encoding `0x03` (UTF-8) and a NUL terminator.

use tracing::trace;

use crate::error::{WavError, WavResult};

/// Size of the tag header.
pub const TAG_HEADER_SIZE: usize = 10;

/// Size of a frame header.
pub const FRAME_HEADER_SIZE: usize = 10;

/// Major version written into the tag header.
pub const TAG_VERSION: u8 = 4;

/// The tag buffer grows in steps of this many bytes.
pub const GROWTH_STEP: usize = 512;

/// Largest value a 28-bit syncsafe integer can hold.
pub const SYNCSAFE_MAX: usize = 0x0FFF_FFFF;

const ENCODING_UTF8: u8 = 0x03;

/// Four-character frame identifier.
pub type FrameId = [u8; 4];

/// Frame identifiers used for rendered tracks.
pub mod frame {
    use super::FrameId;

    /// Album title.
    pub const ALBUM: FrameId = *b"TALB";
    /// Lead artist.
    pub const ARTIST: FrameId = *b"TPE1";
    /// Composer.
    pub const COMPOSER: FrameId = *b"TCOM";
    /// Release time.
    pub const RELEASE_DATE: FrameId = *b"TDRL";
    /// Track title.
    pub const TITLE: FrameId = *b"TIT2";
    /// User-defined text.
    pub const USER_TEXT: FrameId = *b"TXXX";
    /// Comment.
    pub const COMMENT: FrameId = *b"COMM";
}

/// Encodes a value as a 28-bit syncsafe integer (7 bits per byte).
pub fn encode_syncsafe(value: u32) -> [u8; 4] {
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

/// Decodes a 28-bit syncsafe integer.
pub fn decode_syncsafe(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7F))
}

/// An ID3v2.4 tag under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBlock {
    buf: Vec<u8>,
}

impl Default for TagBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl TagBlock {
    /// Creates a block holding only the tag header.
    pub fn new() -> Self {
        let mut block = Self {
            buf: Vec::with_capacity(GROWTH_STEP),
        };
        block.reset();
        block
    }

    /// Drops all frames, keeping the allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.buf
            .extend_from_slice(&[b'I', b'D', b'3', TAG_VERSION, 0, 0, 0, 0, 0, 0]);
        self.sync_header();
    }

    /// Appends a text information frame.
    pub fn add_text(&mut self, id: FrameId, text: &str) -> WavResult<()> {
        self.append_frame(id, &[], &[text.as_bytes()])
    }

    /// Appends a user-defined text frame (`TXXX`).
    pub fn add_private(&mut self, description: &str, text: &str) -> WavResult<()> {
        self.append_frame(
            frame::USER_TEXT,
            &[],
            &[description.as_bytes(), text.as_bytes()],
        )
    }

    /// Appends a comment frame with an empty description.
    pub fn add_comment(&mut self, language: &[u8; 3], text: &str) -> WavResult<()> {
        self.append_frame(frame::COMMENT, language, &[b"", text.as_bytes()])
    }

    /// True once at least one frame has been added.
    pub fn has_frames(&self) -> bool {
        self.buf.len() > TAG_HEADER_SIZE
    }

    /// Total size in bytes, header included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when the block holds no frames.
    pub fn is_empty(&self) -> bool {
        !self.has_frames()
    }

    /// Current buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Payload size declared in the tag header.
    pub fn declared_size(&self) -> u32 {
        decode_syncsafe([self.buf[6], self.buf[7], self.buf[8], self.buf[9]])
    }

    /// The encoded tag.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Writes one frame: `prefix` verbatim after the encoding byte, then each
    /// of `fields` followed by a NUL.
    fn append_frame(&mut self, id: FrameId, prefix: &[u8], fields: &[&[u8]]) -> WavResult<()> {
        let payload_len =
            1 + prefix.len() + fields.iter().map(|field| field.len() + 1).sum::<usize>();
        if payload_len > SYNCSAFE_MAX {
            return Err(WavError::frame_too_large(id, payload_len));
        }

        let needed = self.buf.len() + FRAME_HEADER_SIZE + payload_len;
        if needed - TAG_HEADER_SIZE > SYNCSAFE_MAX {
            return Err(WavError::frame_too_large(id, needed));
        }
        self.reserve_for(needed)?;

        self.buf.extend_from_slice(&id);
        self.buf
            .extend_from_slice(&encode_syncsafe(payload_len as u32));
        self.buf.extend_from_slice(&[0, 0, ENCODING_UTF8]);
        self.buf.extend_from_slice(prefix);
        for field in fields {
            self.buf.extend_from_slice(field);
            self.buf.push(0);
        }
        self.sync_header();

        trace!(
            frame = %String::from_utf8_lossy(&id),
            payload_len,
            total = self.buf.len(),
            "appended tag frame"
        );
        Ok(())
    }

    /// Grows capacity in fixed steps until `needed` bytes fit.
    fn reserve_for(&mut self, needed: usize) -> WavResult<()> {
        while self.buf.capacity() < needed {
            let requested = self.buf.capacity() + GROWTH_STEP;
            self.buf
                .try_reserve_exact(requested - self.buf.len())
                .map_err(|source| WavError::TagAlloc { requested, source })?;
        }
        Ok(())
    }

    fn sync_header(&mut self) {
        let size = (self.buf.len() - TAG_HEADER_SIZE) as u32;
        self.buf[6..TAG_HEADER_SIZE].copy_from_slice(&encode_syncsafe(size));
    }
}
