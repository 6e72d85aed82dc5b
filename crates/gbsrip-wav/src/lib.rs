//! gbsrip WAV output
//!
//! This crate turns a stream of stereo sample pairs into a tagged 16-bit PCM
//! WAV file without ever holding a whole track in memory.
//!
//! # Overview
//!
//! The output file layout is fixed up front:
//!
//! ```text
//! RIFF <size> WAVE
//! fmt  16 <PCM, channels, rate, byte rate, block align, 16 bits>
//! data <data size> <interleaved little-endian i16 samples>
//! ID3  <tag size> <ID3v2.4 tag block>        (only when tags were added)
//! ```
//!
//! Because the frame count and the tag block are both known before rendering
//! starts, the header is written first with final sizes and never patched.
//!
//! # Example
//!
//! ```
//! use gbsrip_wav::{frame, write_footer, write_header, ChannelLayout, RenderSession, TagBlock, WavFormat};
//!
//! let mut tags = TagBlock::new();
//! tags.add_text(frame::TITLE, "Title Screen")?;
//!
//! let format = WavFormat::from_layout(ChannelLayout::Stereo, 48_000);
//! let mut file = Vec::new();
//! write_header(&mut file, &format, 4, &tags)?;
//!
//! let mut session = RenderSession::new(file, ChannelLayout::Stereo, 4, 2);
//! for _ in 0..4 {
//!     session.push(1000, -1000)?;
//! }
//! assert!(session.is_complete());
//! let mut file = session.finish()?;
//! write_footer(&mut file, &tags)?;
//! # Ok::<(), gbsrip_wav::WavError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`id3`] - Growable ID3v2.4 tag block
//! - [`writer`] - RIFF/WAVE header and trailing tag chunk
//! - [`session`] - Per-track render session (sample window, counters, output)
//! - [`fade`] - Linear fade-out envelope
//! - [`pcm`] - Little-endian 16-bit packing

pub mod error;
pub mod fade;
pub mod format;
pub mod id3;
pub mod pcm;
pub mod session;
pub mod writer;


pub use error::{WavError, WavResult};
pub use fade::apply_fade;
pub use format::{ChannelLayout, WavFormat};
pub use id3::{frame, FrameId, TagBlock};
pub use session::{RenderCounters, RenderSession, SampleWindow, WINDOW_FRAMES};
pub use writer::{write_footer, write_header, write_wav};
