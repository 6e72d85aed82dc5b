//! Binary format validators for test infrastructure.
//!
//! These validators parse rendered files independently of the writer and
//! return structured information about their contents.

use std::fmt;

mod id3;
mod wav;

pub use id3::{validate_id3, Id3Frame, Id3Tag};
pub use wav::{validate_wav, WavInfo};

/// Error type for format validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    /// The format being validated.
    pub format: &'static str,
    /// Description of what went wrong.
    pub message: String,
    /// Byte offset where the error occurred, if applicable.
    pub offset: Option<usize>,
}

impl FormatError {
    /// Create a new format error.
    pub fn new(format: &'static str, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
            offset: None,
        }
    }

    /// Create a format error with a byte offset.
    pub fn at_offset(format: &'static str, message: impl Into<String>, offset: usize) -> Self {
        Self {
            format,
            message: message.into(),
            offset: Some(offset),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(offset) = self.offset {
            write!(
                f,
                "{} error at offset {}: {}",
                self.format, offset, self.message
            )
        } else {
            write!(f, "{} error: {}", self.format, self.message)
        }
    }
}

impl std::error::Error for FormatError {}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = FormatError::new("WAV", "bad");
        assert_eq!(err.to_string(), "WAV error: bad");
        let err = FormatError::at_offset("ID3", "short", 12);
        assert_eq!(err.to_string(), "ID3 error at offset 12: short");
    }

    #[test]
    fn test_little_endian_readers() {
        let data = [0x34, 0x12, 0x78, 0x56];
        assert_eq!(read_u16_le(&data, 0), 0x1234);
        assert_eq!(read_u32_le(&data, 0), 0x5678_1234);
    }
}
