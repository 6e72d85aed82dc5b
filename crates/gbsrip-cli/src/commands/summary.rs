//! Human-readable summaries shared by `render` and `inspect`.

use colored::Colorize;
use gbsrip_engine::SongInfo;
use gbsrip_m3u::PlaylistDirectives;

use crate::metadata::TrackPlan;

pub(super) fn print_song(song: &SongInfo) {
    println!("{}", "Song:".bold());
    println!("  {} {}", "Title:".dimmed(), song.title);
    println!("  {} {}", "Author:".dimmed(), song.author);
    println!("  {} {}", "Copyright:".dimmed(), song.copyright);
    println!("  {} {}", "Tracks:".dimmed(), song.track_count);
    println!("  {} {}", "First track:".dimmed(), song.first_track + 1);
    println!();
}

/// Prints the playlist directives that differ from the song's own metadata.
pub(super) fn print_directives(directives: &PlaylistDirectives, song: &SongInfo) {
    println!("{}", "Playlist tags:".bold());
    if directives.is_empty() {
        println!("  {}", "(none)".dimmed());
    }

    let rows = [
        ("Title:", directives.title.as_deref().filter(|t| *t != song.title)),
        ("Artist:", directives.artist.as_deref().filter(|a| *a != song.author)),
        ("Composer:", directives.composer.as_deref()),
        ("Date:", directives.date.as_deref()),
        ("Ripper:", directives.ripper.as_deref()),
        ("Tagger:", directives.tagger.as_deref()),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            println!("  {} {}", label.dimmed(), value);
        }
    }
    println!();
}

pub(super) fn print_plan(plan: &TrackPlan, sample_rate: u32) {
    let fade = plan.fade_frames as f64 / f64::from(sample_rate.max(1));
    println!(
        "  {} {} {}",
        format!("{:03}", plan.ordinal).cyan(),
        plan.file_name(),
        format!(
            "(track {}, {:.1}s, fade {:.1}s)",
            plan.index + 1,
            plan.duration_secs(sample_rate),
            fade
        )
        .dimmed()
    );
}
