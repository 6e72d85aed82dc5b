//! gbsrip End-to-End Test Infrastructure
//!
//! This crate drives the real render pipeline (planner, render session, WAV
//! writer and tag block) with a scripted engine, so whole songs can be
//! rendered and checked without an emulator installed:
//!
//! - Rendering: song image + playlist -> one WAV file per track
//! - Validation: RIFF layout, sample counts and the trailing `ID3 ` chunk
//! - **Determinism**: byte-identical output across runs and window sizes
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gbsrip-tests
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use gbsrip_tests::fixtures::{GbsImage, RenderFixture, ScriptedEngine};
//! use gbsrip_tests::harness::render_song;
//!
//! let fixture = RenderFixture::new();
//! let image = GbsImage::new("Demo", 2).to_bytes();
//! let tracks = render_song(ScriptedEngine::new(), &fixture.config(1000), &image, None, fixture.path())?;
//! assert_eq!(tracks.len(), 2);
//! ```

pub mod determinism;
pub mod fixtures;
pub mod format_validators;
pub mod harness;

// Re-export commonly used items
pub use determinism::{compute_hash, hash_file, verify_hash_determinism};
pub use fixtures::{EngineCall, GbsImage, RenderFixture, ScriptedEngine, Waveform};
pub use format_validators::{validate_wav, FormatError, Id3Frame, WavInfo};
