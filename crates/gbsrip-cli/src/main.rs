//! gbsrip CLI - render GBS songs to tagged WAV files
//!
//! Every track of a GBS image (or every track listed in a companion NEZ-style
//! M3U playlist) is rendered to its own 16-bit PCM WAV file with an embedded
//! ID3v2.4 tag chunk.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use gbsrip_engine::HardwareModel;
use tracing_subscriber::EnvFilter;

use gbsrip_cli::commands;
use gbsrip_cli::commands::render::RenderOptions;
use gbsrip_cli::config::DEFAULT_SAMPLE_RATE;

/// gbsrip - GBS to WAV renderer
#[derive(Parser)]
#[command(name = "gbsrip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every track of a song to WAV files
    Render {
        /// Path to the GBS file
        song: String,

        /// Companion M3U playlist with titles, lengths and fades
        playlist: Option<String>,

        /// Render a single downmixed channel
        #[arg(long)]
        mono: bool,

        /// Hardware model to emulate (dmg-b, cgb-e, agb-a, sgb, ... or dmg/cgb/agb/gbp)
        #[arg(long, default_value = "dmg-b", value_parser = parse_model)]
        model: HardwareModel,

        /// Output sample rate in Hz
        #[arg(long, visible_alias = "samplerate", default_value_t = DEFAULT_SAMPLE_RATE,
              value_parser = clap::value_parser!(u32).range(1..))]
        sample_rate: u32,

        /// Output directory (default: the song's directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Engine executable (default: $GBSRIP_ENGINE, then gbsplay on PATH)
        #[arg(long)]
        engine: Option<PathBuf>,

        /// Engine argument template; placeholders {file} {track} {index} {rate} {model}
        #[arg(long, allow_hyphen_values = true)]
        engine_args: Option<String>,
    },

    /// Show song metadata and the planned tracks without rendering
    Inspect {
        /// Path to the GBS file
        song: String,

        /// Companion M3U playlist
        playlist: Option<String>,

        /// Sample rate used for frame counts
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE,
              value_parser = clap::value_parser!(u32).range(1..))]
        sample_rate: u32,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check the engine installation and environment
    Doctor {
        /// Engine executable to check instead of the default lookup
        #[arg(long)]
        engine: Option<PathBuf>,
    },
}

fn parse_model(name: &str) -> Result<HardwareModel, String> {
    name.parse::<HardwareModel>().map_err(|e| {
        let known: Vec<&str> = HardwareModel::ALL.iter().map(|m| m.as_str()).collect();
        format!("{} (expected one of: {}, dmg, cgb, agb, gbp)", e, known.join(", "))
    })
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            song,
            playlist,
            mono,
            model,
            sample_rate,
            out_dir,
            engine,
            engine_args,
        } => {
            let options = RenderOptions {
                mono,
                model,
                sample_rate,
                out_dir,
                engine,
                engine_args,
            };
            commands::render::run(&song, playlist.as_deref(), &options)
        }
        Commands::Inspect {
            song,
            playlist,
            sample_rate,
            json,
        } => commands::inspect::run(&song, playlist.as_deref(), sample_rate, json),
        Commands::Doctor { engine } => commands::doctor::run(engine.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_render_defaults() {
        let cli = Cli::try_parse_from(["gbsrip", "render", "song.gbs"]).unwrap();
        match cli.command {
            Commands::Render {
                song,
                playlist,
                mono,
                model,
                sample_rate,
                ..
            } => {
                assert_eq!(song, "song.gbs");
                assert_eq!(playlist, None);
                assert!(!mono);
                assert_eq!(model, HardwareModel::DmgB);
                assert_eq!(sample_rate, 48_000);
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_cli_parses_render_options() {
        let cli = Cli::try_parse_from([
            "gbsrip",
            "-v",
            "render",
            "--mono",
            "--model",
            "CGB",
            "--samplerate",
            "44100",
            "--engine-args",
            "-o stdout {file}",
            "song.gbs",
            "song.m3u",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Render {
                playlist,
                mono,
                model,
                sample_rate,
                engine_args,
                ..
            } => {
                assert_eq!(playlist.as_deref(), Some("song.m3u"));
                assert!(mono);
                assert_eq!(model, HardwareModel::CgbE);
                assert_eq!(sample_rate, 44_100);
                assert_eq!(engine_args.as_deref(), Some("-o stdout {file}"));
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_model() {
        let err = Cli::try_parse_from(["gbsrip", "render", "--model", "nes", "song.gbs"])
            .err()
            .expect("unknown model must fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("unknown model 'nes'"));
    }

    #[test]
    fn test_cli_rejects_zero_sample_rate() {
        assert!(Cli::try_parse_from(["gbsrip", "render", "--sample-rate", "0", "song.gbs"]).is_err());
    }

    #[test]
    fn test_cli_requires_song() {
        assert!(Cli::try_parse_from(["gbsrip", "render"]).is_err());
    }

    #[test]
    fn test_cli_parses_inspect_json() {
        let cli = Cli::try_parse_from(["gbsrip", "inspect", "--json", "a.gbs"]).unwrap();
        match cli.command {
            Commands::Inspect { song, json, .. } => {
                assert_eq!(song, "a.gbs");
                assert!(json);
            }
            _ => panic!("expected inspect command"),
        }
    }

    #[test]
    fn test_cli_parses_doctor() {
        let cli = Cli::try_parse_from(["gbsrip", "doctor"]).unwrap();
        assert!(matches!(cli.command, Commands::Doctor { engine: None }));
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
