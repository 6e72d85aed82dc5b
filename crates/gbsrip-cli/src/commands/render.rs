//! Render command implementation
//!
//! Loads a song, plans its tracks and writes one WAV file per track.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use gbsrip_engine::{EngineConfig, ExternalEngine, HardwareModel};
use gbsrip_m3u::PlaylistDirectives;
use gbsrip_wav::ChannelLayout;

use super::{read_input, summary};
use crate::config::RenderConfig;
use crate::render::{RenderEvent, Renderer};

/// Options for the render command.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Downmix to one channel.
    pub mono: bool,
    /// Emulated hardware.
    pub model: HardwareModel,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output directory (default: next to the song).
    pub out_dir: Option<PathBuf>,
    /// Engine executable override.
    pub engine: Option<PathBuf>,
    /// Engine argument template override, whitespace separated.
    pub engine_args: Option<String>,
}

impl RenderOptions {
    /// Builds the render configuration.
    pub fn to_config(&self) -> RenderConfig {
        let mut engine = EngineConfig::default();
        if let Some(program) = &self.engine {
            engine = engine.program(program);
        }
        if let Some(args) = &self.engine_args {
            engine = engine.args(args.split_whitespace());
        }

        let layout = if self.mono {
            ChannelLayout::Mono
        } else {
            ChannelLayout::Stereo
        };

        let mut config = RenderConfig::default()
            .with_sample_rate(self.sample_rate)
            .with_layout(layout)
            .with_model(self.model)
            .with_engine(engine);
        if let Some(dir) = &self.out_dir {
            config = config.with_out_dir(dir);
        }
        config
    }
}

/// Run the render command
///
/// # Arguments
/// * `song_path` - Path to the GBS file
/// * `playlist_path` - Optional companion playlist
/// * `options` - Output and engine options
///
/// # Returns
/// Exit code: 0 when every planned track was written
pub fn run(song_path: &str, playlist_path: Option<&str>, options: &RenderOptions) -> Result<ExitCode> {
    let start = Instant::now();
    let config = options.to_config();
    let song_path = Path::new(song_path);

    let image = read_input(song_path, "song")?;
    let playlist = playlist_path
        .map(|path| read_input(Path::new(path), "playlist"))
        .transpose()?;

    let engine = ExternalEngine::with_config(config.engine.clone());
    let mut renderer = Renderer::new(engine, config);
    let song = renderer.load(&image)?;

    summary::print_song(&song);
    if let Some(playlist) = &playlist {
        summary::print_directives(&PlaylistDirectives::scan(playlist), &song);
    }

    let config = renderer.config();
    let out_dir = config.output_dir_for(song_path);
    if !out_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;
    }

    match config.engine.ignored_model(config.model) {
        Some(model) => println!(
            "{} {} requested, but the engine arguments have no {{model}} placeholder",
            "Warning:".yellow().bold(),
            model.display_name()
        ),
        None => println!("{} {}", "Emulating:".cyan().bold(), config.model.display_name()),
    }
    println!(
        "{} 16-bit, {}-channel, {} Hz WAVE",
        "Rendering as:".cyan().bold(),
        config.layout.channels(),
        config.sample_rate
    );
    println!();

    let interactive = std::io::stdout().is_terminal();
    let mut on_event = |event: RenderEvent<'_>| match event {
        RenderEvent::TrackStarted { plan, path } => {
            println!(
                "{} track {} to {}",
                "Saving".green().bold(),
                plan.ordinal,
                path.display()
            );
        }
        RenderEvent::Progress { percent, .. } if interactive => {
            print!("\r  {:>3}%", percent);
            let _ = std::io::stdout().flush();
        }
        RenderEvent::Progress { .. } => {}
        RenderEvent::TrackFinished(track) => {
            if interactive {
                println!("\r  {}", "done".green());
            }
            println!(
                "  {} {} bytes",
                "->".dimmed(),
                track.bytes.to_string().dimmed()
            );
        }
    };

    let rendered = renderer.render_all(&song, playlist.as_deref(), &out_dir, &mut on_event)?;

    println!();
    println!(
        "{} {} track(s) in {:.1}s",
        "Rendered".green().bold(),
        rendered.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(ExitCode::SUCCESS)
}
