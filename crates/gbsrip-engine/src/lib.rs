//! gbsrip sound engine interface
//!
//! Renders are driven through the [`SoundEngine`] trait: the caller loads a
//! song image, configures output, selects a track and then calls
//! [`SoundEngine::run_step`] repeatedly, handing it a sample callback each
//! time. An engine may emit any number of samples per step.
//!
//! ```no_run
//! use gbsrip_engine::{ExternalEngine, SoundEngine};
//!
//! let image = std::fs::read("song.gbs")?;
//! let mut engine = ExternalEngine::new();
//! let info = engine.load(&image)?;
//! engine.set_sample_rate(48_000);
//! engine.reset()?;
//! engine.select_track(info.first_track)?;
//!
//! let mut frames = 0u64;
//! while frames < 48_000 {
//!     engine.run_step(&mut |_sample| {
//!         frames += 1;
//!         Ok(())
//!     })?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`gbs`] - GBS image header parsing
//! - [`model`] - Emulated hardware models
//! - [`external`] - Engine backed by an external emulator process

pub mod error;
pub mod external;
pub mod gbs;
pub mod model;
mod types;

pub use error::{EngineError, EngineResult};
pub use external::{EngineConfig, ExternalEngine};
pub use gbs::GbsHeader;
pub use model::HardwareModel;
pub use types::{ChannelMode, SongInfo, StereoSample};

use std::io;

/// Per-sample callback handed to [`SoundEngine::run_step`].
pub type SampleSink<'a> = dyn FnMut(StereoSample) -> io::Result<()> + 'a;

/// A sound engine that renders a loaded song image.
pub trait SoundEngine {
    /// Short name for diagnostics.
    fn name(&self) -> &str;

    /// Loads a song image and returns its metadata.
    fn load(&mut self, image: &[u8]) -> EngineResult<SongInfo>;

    /// Sets the output sample rate in Hz.
    fn set_sample_rate(&mut self, rate: u32);

    /// Sets the channel mode the caller renders in.
    fn set_channel_mode(&mut self, mode: ChannelMode);

    /// Selects the emulated hardware.
    fn set_model(&mut self, model: HardwareModel);

    /// Returns the engine to its power-on state.
    fn reset(&mut self) -> EngineResult<()>;

    /// Starts playback of a zero-based track index.
    fn select_track(&mut self, index: u32) -> EngineResult<()>;

    /// Advances emulation by one engine-defined quantum.
    ///
    /// `on_sample` receives every stereo pair produced during the step. An
    /// error from the callback ends the step and is returned as
    /// [`EngineError::Output`].
    fn run_step(&mut self, on_sample: &mut SampleSink<'_>) -> EngineResult<()>;
}
