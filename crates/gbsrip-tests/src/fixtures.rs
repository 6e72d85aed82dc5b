//! Test fixtures: synthetic song images, a scripted engine and temporary
//! output directories.

use std::fs;
use std::path::{Path, PathBuf};

use gbsrip_cli::RenderConfig;
use gbsrip_engine::{
    ChannelMode, EngineError, EngineResult, GbsHeader, HardwareModel, SampleSink, SongInfo,
    SoundEngine, StereoSample,
};
use tempfile::TempDir;

/// Builder for minimal GBS images.
#[derive(Debug, Clone)]
pub struct GbsImage {
    pub title: String,
    pub author: String,
    pub copyright: String,
    pub track_count: u8,
    /// First song as stored (1-based).
    pub first_song: u8,
}

impl GbsImage {
    /// An image with `track_count` tracks starting at the first one.
    pub fn new(title: &str, track_count: u8) -> Self {
        Self {
            title: title.to_string(),
            author: String::new(),
            copyright: String::new(),
            track_count,
            first_song: 1,
        }
    }

    /// Set the author field.
    pub fn author(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }

    /// Set the copyright field.
    pub fn copyright(mut self, copyright: &str) -> Self {
        self.copyright = copyright.to_string();
        self
    }

    /// Set the stored (1-based) first song.
    pub fn first_song(mut self, first: u8) -> Self {
        self.first_song = first;
        self
    }

    /// Encode the header followed by a few bytes of code.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = vec![0u8; 0x80];
        data[0..3].copy_from_slice(b"GBS");
        data[0x03] = 1;
        data[0x04] = self.track_count;
        data[0x05] = self.first_song;
        data[0x06..0x08].copy_from_slice(&0x0400u16.to_le_bytes());
        data[0x08..0x0A].copy_from_slice(&0x0400u16.to_le_bytes());
        data[0x0A..0x0C].copy_from_slice(&0x0410u16.to_le_bytes());
        data[0x0C..0x0E].copy_from_slice(&0xFFFEu16.to_le_bytes());
        write_text(&mut data[0x10..0x30], &self.title);
        write_text(&mut data[0x30..0x50], &self.author);
        write_text(&mut data[0x50..0x70], &self.copyright);
        // ret
        data[0x70] = 0xC9;
        data
    }
}

fn write_text(field: &mut [u8], text: &str) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(field.len());
    field[..len].copy_from_slice(&bytes[..len]);
}

/// Signal produced by [`ScriptedEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Square wave whose period depends on the track, right channel at half
    /// amplitude.
    Square { amplitude: i16 },
    /// The same value on both channels.
    Constant(i16),
    /// Left is the frame position, right is the track index.
    Counter,
}

/// Calls recorded by [`ScriptedEngine`], in order. Steps are counted
/// separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Load,
    SetSampleRate(u32),
    SetChannelMode(ChannelMode),
    SetModel(HardwareModel),
    Reset,
    SelectTrack(u32),
}

/// Deterministic engine for pipeline tests.
///
/// Loading parses the real GBS header. Each step emits `samples_per_step`
/// stereo pairs of the configured waveform, restarting at position zero on
/// every track selection.
#[derive(Debug)]
pub struct ScriptedEngine {
    waveform: Waveform,
    samples_per_step: usize,
    fail_after_steps: Option<u64>,
    song: Option<SongInfo>,
    track: Option<u32>,
    position: u64,
    steps: u64,
    calls: Vec<EngineCall>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    /// Square wave, 256 samples per step.
    pub fn new() -> Self {
        Self {
            waveform: Waveform::Square { amplitude: 8000 },
            samples_per_step: 256,
            fail_after_steps: None,
            song: None,
            track: None,
            position: 0,
            steps: 0,
            calls: Vec::new(),
        }
    }

    /// Use a different waveform.
    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Emit this many samples per step (zero is allowed).
    pub fn samples_per_step(mut self, count: usize) -> Self {
        self.samples_per_step = count;
        self
    }

    /// Fail every step after the first `steps` successful ones.
    pub fn fail_after_steps(mut self, steps: u64) -> Self {
        self.fail_after_steps = Some(steps);
        self
    }

    /// Recorded calls.
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Number of `run_step` calls.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Tracks selected so far, in order.
    pub fn selected_tracks(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::SelectTrack(index) => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// The sample this engine produces for `track` at frame `position`.
    pub fn sample_at(waveform: Waveform, track: u32, position: u64) -> StereoSample {
        match waveform {
            Waveform::Square { amplitude } => {
                let half_period = 8 + u64::from(track) * 2;
                let left = if (position / half_period) % 2 == 0 {
                    amplitude
                } else {
                    -amplitude
                };
                StereoSample::new(left, left / 2)
            }
            Waveform::Constant(value) => StereoSample::new(value, value),
            Waveform::Counter => StereoSample::new(
                (position % 0x8000) as i16,
                (track % 0x8000) as i16,
            ),
        }
    }
}

impl SoundEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn load(&mut self, image: &[u8]) -> EngineResult<SongInfo> {
        self.calls.push(EngineCall::Load);
        let info = GbsHeader::parse(image)?.song_info();
        self.song = Some(info.clone());
        self.track = None;
        Ok(info)
    }

    fn set_sample_rate(&mut self, rate: u32) {
        self.calls.push(EngineCall::SetSampleRate(rate));
    }

    fn set_channel_mode(&mut self, mode: ChannelMode) {
        self.calls.push(EngineCall::SetChannelMode(mode));
    }

    fn set_model(&mut self, model: HardwareModel) {
        self.calls.push(EngineCall::SetModel(model));
    }

    fn reset(&mut self) -> EngineResult<()> {
        self.calls.push(EngineCall::Reset);
        self.track = None;
        self.position = 0;
        Ok(())
    }

    fn select_track(&mut self, index: u32) -> EngineResult<()> {
        self.calls.push(EngineCall::SelectTrack(index));
        let song = self.song.as_ref().ok_or(EngineError::NotStarted)?;
        if !song.has_track(index) {
            return Err(EngineError::invalid_image(format!(
                "track {} out of range",
                index
            )));
        }
        self.track = Some(index);
        self.position = 0;
        Ok(())
    }

    fn run_step(&mut self, on_sample: &mut SampleSink<'_>) -> EngineResult<()> {
        let track = self.track.ok_or(EngineError::NotStarted)?;
        if self.fail_after_steps.is_some_and(|limit| self.steps >= limit) {
            return Err(EngineError::ProcessFailed { code: Some(3) });
        }
        self.steps += 1;

        for _ in 0..self.samples_per_step {
            let sample = Self::sample_at(self.waveform, track, self.position);
            self.position += 1;
            on_sample(sample).map_err(EngineError::Output)?;
        }
        Ok(())
    }
}

/// A temporary directory holding a song, an optional playlist and the
/// rendered output.
pub struct RenderFixture {
    pub root: TempDir,
}

impl Default for RenderFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderFixture {
    /// Create an empty fixture directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the fixture root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write a file into the fixture.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Create a subdirectory for output.
    pub fn subdir(&self, name: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::create_dir_all(&path).expect("Failed to create output dir");
        path
    }

    /// Render settings for tests at `sample_rate`, writing into the fixture.
    pub fn config(&self, sample_rate: u32) -> RenderConfig {
        RenderConfig::default()
            .with_sample_rate(sample_rate)
            .with_out_dir(self.root.path())
    }

    /// Names of the `.wav` files in `dir`, sorted.
    pub fn wav_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("Failed to read output dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".wav"))
            .collect();
        names.sort();
        names
    }
}
