//! Inspect command implementation
//!
//! Shows song metadata, album tags and the planned tracks without running
//! an engine.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use gbsrip_engine::{GbsHeader, SongInfo};
use gbsrip_m3u::PlaylistDirectives;
use serde::Serialize;

use super::{read_input, summary};
use crate::metadata::{AlbumTags, TrackPlan, TrackPlanner};

/// Machine-readable inspect output.
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub song: SongInfo,
    pub album: AlbumTags,
    pub sample_rate: u32,
    pub tracks: Vec<PlannedTrack>,
}

/// One planned track in [`InspectOutput`].
#[derive(Debug, Serialize)]
pub struct PlannedTrack {
    #[serde(flatten)]
    pub plan: TrackPlan,
    pub file_name: String,
    pub duration_secs: f64,
}

/// Builds the inspect report for a song image and optional playlist.
pub fn inspect(image: &[u8], playlist: Option<&[u8]>, sample_rate: u32) -> Result<InspectOutput> {
    let song = GbsHeader::parse(image)
        .context("failed to parse song header")?
        .song_info();
    let directives = playlist.map(PlaylistDirectives::scan).unwrap_or_default();
    let album = AlbumTags::resolve(&directives, &song);

    let tracks = TrackPlanner::new(&song, playlist, sample_rate)
        .map(|plan| PlannedTrack {
            file_name: plan.file_name(),
            duration_secs: plan.duration_secs(sample_rate),
            plan,
        })
        .collect();

    Ok(InspectOutput {
        song,
        album,
        sample_rate,
        tracks,
    })
}

/// Run the inspect command
///
/// # Arguments
/// * `song_path` - Path to the GBS file
/// * `playlist_path` - Optional companion playlist
/// * `sample_rate` - Sample rate used to compute frame counts
/// * `json_output` - Print JSON instead of colored text
pub fn run(
    song_path: &str,
    playlist_path: Option<&str>,
    sample_rate: u32,
    json_output: bool,
) -> Result<ExitCode> {
    let image = read_input(Path::new(song_path), "song")?;
    let playlist = playlist_path
        .map(|path| read_input(Path::new(path), "playlist"))
        .transpose()?;

    let report = inspect(&image, playlist.as_deref(), sample_rate)?;

    if json_output {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{}", json);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Inspecting:".cyan().bold(), song_path);
    println!();
    summary::print_song(&report.song);
    if let Some(playlist) = &playlist {
        summary::print_directives(&PlaylistDirectives::scan(playlist), &report.song);
    }

    println!("{} ({} Hz)", "Tracks:".bold(), sample_rate);
    if report.tracks.is_empty() {
        println!("  {}", "(no tracks planned)".yellow());
    }
    for track in &report.tracks {
        summary::print_plan(&track.plan, sample_rate);
    }
    Ok(ExitCode::SUCCESS)
}
