//! Sound engine backed by an external emulator process.
//!
//! The emulator is started once per track and must write raw signed 16-bit
//! little-endian stereo frames to stdout. `gbsplay` is used by default; any
//! program that can be told which file, track and sample rate to play works
//! through [`EngineConfig::args`].

use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::gbs::GbsHeader;
use crate::model::HardwareModel;
use crate::types::{ChannelMode, SongInfo, StereoSample};
use crate::{SampleSink, SoundEngine};

/// Program looked up on `PATH` when nothing else is configured.
pub const DEFAULT_PROGRAM: &str = "gbsplay";

/// Environment variable overriding the engine program.
pub const ENGINE_ENV_VAR: &str = "GBSRIP_ENGINE";

/// Frames read from the engine per [`SoundEngine::run_step`].
pub const DEFAULT_QUANTUM_FRAMES: usize = 1024;

/// Bytes per s16le stereo frame on the engine's stdout.
const FRAME_BYTES: usize = 4;

/// Default `gbsplay` arguments: quiet, raw s16le on stdout, one subsong
/// played for up to ten hours with no fade, gap or silence detection.
pub fn default_args() -> Vec<String> {
    [
        "-q", "-o", "stdout", "-E", "l", "-r", "{rate}", "-t", "36000", "-f", "0", "-g", "0",
        "-T", "0", "{file}", "{track}", "{track}",
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect()
}

/// Configuration for the external engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine executable (name on `PATH` or path).
    pub program: Option<PathBuf>,
    /// Argument template; see [`substitute`] for placeholders.
    pub args: Vec<String>,
    /// Frames consumed per step.
    pub quantum_frames: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: default_args(),
            quantum_frames: DEFAULT_QUANTUM_FRAMES,
        }
    }
}

impl EngineConfig {
    /// Sets the engine executable.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Replaces the argument template.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the frames consumed per step.
    pub fn quantum_frames(mut self, frames: usize) -> Self {
        self.quantum_frames = frames.max(1);
        self
    }

    /// Whether the argument template passes the hardware model on.
    pub fn passes_model(&self) -> bool {
        self.args.iter().any(|arg| arg.contains("{model}"))
    }

    /// Returns `model` when it differs from the default but the argument
    /// template has no `{model}` to carry it.
    pub fn ignored_model(&self, model: HardwareModel) -> Option<HardwareModel> {
        (model != HardwareModel::default() && !self.passes_model()).then_some(model)
    }

    /// Locates the engine executable.
    ///
    /// Checks the configured program, then `GBSRIP_ENGINE`, then
    /// [`DEFAULT_PROGRAM`] on `PATH`.
    pub fn resolve_program(&self) -> EngineResult<PathBuf> {
        if let Some(program) = &self.program {
            return lookup(program.as_os_str());
        }

        if let Some(program) = std::env::var_os(ENGINE_ENV_VAR).filter(|p| !p.is_empty()) {
            return lookup(&program);
        }

        lookup(DEFAULT_PROGRAM.as_ref())
    }
}

fn lookup(program: &std::ffi::OsStr) -> EngineResult<PathBuf> {
    which::which(program).map_err(|_| EngineError::EngineNotFound {
        program: program.to_string_lossy().into_owned(),
    })
}

/// Values substituted into the argument template.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    pub file: &'a Path,
    pub index: u32,
    pub sample_rate: u32,
    pub model: HardwareModel,
}

/// Expands placeholders in one argument.
///
/// `{file}` image path, `{track}` one-based track, `{index}` zero-based
/// track, `{rate}` sample rate, `{model}` hardware model name.
pub fn substitute(arg: &str, invocation: &Invocation<'_>) -> String {
    arg.replace("{file}", &invocation.file.to_string_lossy())
        .replace("{track}", &(invocation.index + 1).to_string())
        .replace("{index}", &invocation.index.to_string())
        .replace("{rate}", &invocation.sample_rate.to_string())
        .replace("{model}", invocation.model.as_str())
}

/// A running engine process and its partially consumed output.
struct EngineProcess {
    child: Child,
    stdout: ChildStdout,
    buf: Vec<u8>,
    filled: usize,
    finished: bool,
}

impl EngineProcess {
    fn spawn(program: &Path, args: &[String]) -> EngineResult<Self> {
        debug!(program = %program.display(), ?args, "spawning engine");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| EngineError::SpawnFailed {
                program: program.to_path_buf(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Io(std::io::Error::other("engine stdout not captured")))?;

        Ok(Self {
            child,
            stdout,
            buf: Vec::new(),
            filled: 0,
            finished: false,
        })
    }

    /// Reads once into the buffer; returns the bytes read.
    fn fill(&mut self, capacity: usize) -> std::io::Result<usize> {
        if self.buf.len() < capacity {
            self.buf.resize(capacity, 0);
        }
        loop {
            match self.stdout.read(&mut self.buf[self.filled..capacity]) {
                Ok(n) => {
                    self.filled += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

/// Engine that renders by running an emulator program per track.
pub struct ExternalEngine {
    config: EngineConfig,
    image: Option<tempfile::NamedTempFile>,
    sample_rate: u32,
    channel_mode: ChannelMode,
    model: HardwareModel,
    process: Option<EngineProcess>,
}

impl Default for ExternalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine with the given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            image: None,
            sample_rate: 48_000,
            channel_mode: ChannelMode::Stereo,
            model: HardwareModel::default(),
            process: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Channel mode last requested by the caller.
    pub fn channel_mode(&self) -> ChannelMode {
        self.channel_mode
    }

    fn image_path(&self) -> EngineResult<&Path> {
        self.image
            .as_ref()
            .map(|file| file.path())
            .ok_or_else(|| EngineError::invalid_image("no song image loaded"))
    }
}

impl SoundEngine for ExternalEngine {
    fn name(&self) -> &str {
        "external"
    }

    fn load(&mut self, image: &[u8]) -> EngineResult<SongInfo> {
        let header = GbsHeader::parse(image)?;

        let mut file = tempfile::Builder::new()
            .prefix("gbsrip-")
            .suffix(".gbs")
            .tempfile()?;
        file.write_all(image)?;
        file.flush()?;

        self.process = None;
        self.image = Some(file);
        Ok(header.song_info())
    }

    fn set_sample_rate(&mut self, rate: u32) {
        self.sample_rate = rate;
    }

    fn set_channel_mode(&mut self, mode: ChannelMode) {
        // engine output stays stereo; the caller downmixes
        self.channel_mode = mode;
    }

    fn set_model(&mut self, model: HardwareModel) {
        if let Some(model) = self.config.ignored_model(model) {
            warn!(
                model = model.as_str(),
                "engine arguments have no {{model}} placeholder; the model selection is ignored"
            );
        }
        self.model = model;
    }

    fn reset(&mut self) -> EngineResult<()> {
        self.process = None;
        Ok(())
    }

    fn select_track(&mut self, index: u32) -> EngineResult<()> {
        self.process = None;

        let program = self.config.resolve_program()?;
        let invocation = Invocation {
            file: self.image_path()?,
            index,
            sample_rate: self.sample_rate,
            model: self.model,
        };
        let args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| substitute(arg, &invocation))
            .collect();

        self.process = Some(EngineProcess::spawn(&program, &args)?);
        Ok(())
    }

    fn run_step(&mut self, on_sample: &mut SampleSink<'_>) -> EngineResult<()> {
        let quantum = self.config.quantum_frames.max(1);
        let process = self.process.as_mut().ok_or(EngineError::NotStarted)?;

        if process.finished {
            for _ in 0..quantum {
                on_sample(StereoSample::SILENCE).map_err(EngineError::Output)?;
            }
            return Ok(());
        }

        if process.fill(quantum * FRAME_BYTES)? == 0 {
            let status = process.child.wait()?;
            process.finished = true;
            if !status.success() {
                return Err(EngineError::ProcessFailed {
                    code: status.code(),
                });
            }
            warn!("engine output ended before the track did; padding with silence");
            return Ok(());
        }

        let complete = process.filled - process.filled % FRAME_BYTES;
        for frame in process.buf[..complete].chunks_exact(FRAME_BYTES) {
            let sample = StereoSample::new(
                LittleEndian::read_i16(&frame[0..2]),
                LittleEndian::read_i16(&frame[2..4]),
            );
            on_sample(sample).map_err(EngineError::Output)?;
        }
        process.buf.copy_within(complete..process.filled, 0);
        process.filled -= complete;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_args_request_raw_stdout() {
        let args = default_args();
        assert_eq!(args[0], "-q");
        assert!(args.windows(2).any(|w| w == ["-o", "stdout"]));
        assert!(args.windows(2).any(|w| w == ["-E", "l"]));
        assert_eq!(args.iter().filter(|a| *a == "{track}").count(), 2);
    }

    #[test]
    fn placeholders_are_substituted() {
        let invocation = Invocation {
            file: Path::new("/tmp/song.gbs"),
            index: 4,
            sample_rate: 44_100,
            model: HardwareModel::CgbE,
        };
        assert_eq!(substitute("{file}", &invocation), "/tmp/song.gbs");
        assert_eq!(substitute("{track}", &invocation), "5");
        assert_eq!(substitute("{index}", &invocation), "4");
        assert_eq!(substitute("--rate={rate}", &invocation), "--rate=44100");
        assert_eq!(substitute("{model}", &invocation), "cgb-e");
        assert_eq!(substitute("-q", &invocation), "-q");
    }

    #[test]
    fn config_builder() {
        let config = EngineConfig::default()
            .program("/opt/emu")
            .args(["{file}", "{track}"])
            .quantum_frames(0);
        assert_eq!(config.program, Some(PathBuf::from("/opt/emu")));
        assert_eq!(config.args, vec!["{file}", "{track}"]);
        assert_eq!(config.quantum_frames, 1);
    }

    #[test]
    fn default_args_cannot_carry_model() {
        let config = EngineConfig::default();
        assert!(!config.passes_model());
        assert_eq!(config.ignored_model(HardwareModel::DmgB), None);
        assert_eq!(
            config.ignored_model(HardwareModel::CgbE),
            Some(HardwareModel::CgbE)
        );

        let file = Path::new("s.gbs");
        let args_for = |model| {
            let invocation = Invocation {
                file,
                index: 0,
                sample_rate: 48_000,
                model,
            };
            config
                .args
                .iter()
                .map(|arg| substitute(arg, &invocation))
                .collect::<Vec<_>>()
        };
        assert_eq!(args_for(HardwareModel::DmgB), args_for(HardwareModel::CgbE));
    }

    #[test]
    fn model_placeholder_is_honored() {
        let config = EngineConfig::default().args(["--model={model}", "{file}"]);
        assert!(config.passes_model());
        assert_eq!(config.ignored_model(HardwareModel::CgbE), None);
    }

    #[test]
    fn missing_program_is_reported() {
        let config = EngineConfig::default().program("/nonexistent/gbsrip-engine-xyz");
        let err = config.resolve_program().unwrap_err();
        assert!(matches!(err, EngineError::EngineNotFound { .. }));
    }

    #[test]
    fn run_step_requires_selected_track() {
        let mut engine = ExternalEngine::new();
        let err = engine.run_step(&mut |_| Ok(())).unwrap_err();
        assert!(matches!(err, EngineError::NotStarted));
    }

    #[test]
    fn select_track_requires_image() {
        let mut engine = ExternalEngine::with_config(EngineConfig::default().program("sh"));
        assert!(engine.select_track(0).is_err());
    }

    #[test]
    fn load_rejects_invalid_image() {
        let mut engine = ExternalEngine::new();
        assert!(matches!(
            engine.load(b"not a gbs"),
            Err(EngineError::InvalidImage { .. })
        ));
    }
}
