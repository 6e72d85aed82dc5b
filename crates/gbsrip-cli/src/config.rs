//! Render settings.

use std::path::{Path, PathBuf};

use gbsrip_engine::{ChannelMode, EngineConfig, HardwareModel};
use gbsrip_wav::{ChannelLayout, WavFormat};

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Settings shared by every track of one run.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel layout.
    pub layout: ChannelLayout,
    /// Emulated hardware.
    pub model: HardwareModel,
    /// Output directory; `None` writes next to the song file.
    pub out_dir: Option<PathBuf>,
    /// External engine settings.
    pub engine: EngineConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            layout: ChannelLayout::Stereo,
            model: HardwareModel::default(),
            out_dir: None,
            engine: EngineConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Sets the sample rate.
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Sets the channel layout.
    pub fn with_layout(mut self, layout: ChannelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the hardware model.
    pub fn with_model(mut self, model: HardwareModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the output directory.
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Sets the engine configuration.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Channel mode to request from the engine.
    pub fn channel_mode(&self) -> ChannelMode {
        match self.layout {
            ChannelLayout::Mono => ChannelMode::Mono,
            ChannelLayout::Stereo => ChannelMode::Stereo,
        }
    }

    /// Output WAV format.
    pub fn wav_format(&self) -> WavFormat {
        WavFormat::from_layout(self.layout, self.sample_rate)
    }

    /// Directory the tracks of `song` are written to.
    pub fn output_dir_for(&self, song: &Path) -> PathBuf {
        match &self.out_dir {
            Some(dir) => dir.clone(),
            None => song
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}
