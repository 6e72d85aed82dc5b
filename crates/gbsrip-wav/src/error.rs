//! Error types for WAV output.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type for WAV output operations.
pub type WavResult<T> = Result<T, WavError>;

/// Errors raised while assembling tags or writing a WAV file.
#[derive(Debug, Error)]
pub enum WavError {
    /// Writing to the output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tag block could not grow to hold another frame.
    #[error("failed to grow tag block to {requested} bytes: {source}")]
    TagAlloc {
        /// Capacity that was requested.
        requested: usize,
        /// The allocator failure.
        #[source]
        source: TryReserveError,
    },

    /// A frame payload or the whole tag does not fit a 28-bit syncsafe size.
    #[error("tag frame {frame} would be {size} bytes, over the 28-bit size limit")]
    FrameTooLarge {
        /// The four-character frame id.
        frame: String,
        /// Size that was rejected.
        size: usize,
    },

    /// A size field does not fit the 32-bit RIFF layout.
    #[error("{what} of {size} bytes does not fit a 32-bit RIFF size field")]
    DataTooLarge {
        /// Which size overflowed.
        what: &'static str,
        /// The offending size.
        size: u64,
    },
}

impl WavError {
    /// Creates a frame size error for a four-byte frame id.
    pub fn frame_too_large(frame: [u8; 4], size: usize) -> Self {
        WavError::FrameTooLarge {
            frame: String::from_utf8_lossy(&frame).into_owned(),
            size,
        }
    }

    /// Creates a RIFF size overflow error.
    pub fn data_too_large(what: &'static str, size: u64) -> Self {
        WavError::DataTooLarge { what, size }
    }
}
