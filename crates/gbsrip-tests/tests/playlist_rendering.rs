//! Playlist-driven render tests for gbsrip
//!
//! Tests verify:
//! - Titles, lengths and fades taken from playlist track entries
//! - Album tags from the playlist's leading comment block
//! - Skipping of unusable entries and stopping when entries run out
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gbsrip-tests --test playlist_rendering
//! ```

use std::fs;

use gbsrip_cli::commands::inspect::inspect;
use gbsrip_tests::fixtures::{GbsImage, RenderFixture, ScriptedEngine};
use gbsrip_tests::format_validators::validate_wav;
use gbsrip_tests::harness::{render_song, render_with};
use pretty_assertions::assert_eq;

const RATE: u32 = 100;

const ALBUM_PLAYLIST: &str = "\
# @TITLE: Foo
# @ARTIST:Bar
# @RIPPER ripper
# @TAGGER tagger
song.gbs::GBS,2,Boss\\, Part 2,0:05,,1
song.gbs::GBS,0,Intro,0:03
";

// ============================================================================
// Track Entries
// ============================================================================

#[test]
fn test_playlist_titles_and_lengths() {
    let fixture = RenderFixture::new();
    let image = GbsImage::new("Engine Title", 3).author("Engine Author").to_bytes();

    let tracks = render_song(
        ScriptedEngine::new(),
        &fixture.config(RATE),
        &image,
        Some(ALBUM_PLAYLIST.as_bytes()),
        fixture.path(),
    )
    .unwrap();

    // Two entries for three tracks: rendering stops when the playlist runs out.
    assert_eq!(tracks.len(), 2);
    assert_eq!(
        RenderFixture::wav_names(fixture.path()),
        vec!["001 Boss, Part 2.wav", "002 Intro.wav"]
    );

    // 5 s + 1 s fade
    assert_eq!(tracks[0].plan.index, 2);
    assert_eq!(tracks[0].plan.total_frames, 600);
    assert_eq!(tracks[0].plan.fade_frames, 100);
    // 3 s + default 10 s fade
    assert_eq!(tracks[1].plan.index, 0);
    assert_eq!(tracks[1].plan.total_frames, 1300);
    assert_eq!(tracks[1].plan.fade_frames, 1000);

    for track in &tracks {
        let info = validate_wav(&fs::read(&track.path).unwrap()).unwrap();
        assert_eq!(info.num_frames as u64, track.plan.total_frames);
    }
}

#[test]
fn test_playlist_album_tags_override_engine_metadata() {
    let fixture = RenderFixture::new();
    let image = GbsImage::new("Engine Title", 3).author("Engine Author").to_bytes();

    let tracks = render_song(
        ScriptedEngine::new(),
        &fixture.config(RATE),
        &image,
        Some(ALBUM_PLAYLIST.as_bytes()),
        fixture.path(),
    )
    .unwrap();

    let info = validate_wav(&fs::read(&tracks[0].path).unwrap()).unwrap();
    let tag = info.tag.expect("tag chunk");
    assert_eq!(tag.frame_ids(), vec!["TALB", "TPE1", "TIT2", "TXXX", "TXXX"]);
    assert_eq!(tag.text("TALB").as_deref(), Some("Foo"));
    assert_eq!(tag.text("TPE1").as_deref(), Some("Bar"));
    assert_eq!(tag.text("TIT2").as_deref(), Some("Boss, Part 2"));
    assert_eq!(tag.user_text("gbs_ripper").as_deref(), Some("ripper"));
    assert_eq!(tag.user_text("gbs_tagger").as_deref(), Some("tagger"));
}

#[test]
fn test_plain_first_comment_is_album_title() {
    let fixture = RenderFixture::new();
    let image = GbsImage::new("Engine Title", 1).author("Engine Author").to_bytes();
    let playlist = b"# Some Game\n# @COMPOSER Someone\nsong.gbs::GBS,0,,0:02,,0\n";

    let tracks = render_song(
        ScriptedEngine::new(),
        &fixture.config(RATE),
        &image,
        Some(&playlist[..]),
        fixture.path(),
    )
    .unwrap();

    // Empty title field: fallback title, and no fade at all.
    assert_eq!(tracks[0].plan.title, "Engine Title 001/001");
    assert_eq!(tracks[0].plan.total_frames, 200);
    assert_eq!(tracks[0].plan.fade_frames, 0);

    let info = validate_wav(&fs::read(&tracks[0].path).unwrap()).unwrap();
    let tag = info.tag.expect("tag chunk");
    assert_eq!(tag.frame_ids(), vec!["TALB", "TPE1", "TCOM", "TIT2"]);
    assert_eq!(tag.text("TALB").as_deref(), Some("Some Game"));
    assert_eq!(tag.text("TPE1").as_deref(), Some("Engine Author"));
    assert_eq!(tag.text("TCOM").as_deref(), Some("Someone"));
}

// ============================================================================
// Skipped and Exhausted Entries
// ============================================================================

#[test]
fn test_unusable_entries_are_skipped() {
    let fixture = RenderFixture::new();
    let image = GbsImage::new("Tune", 3).to_bytes();
    let playlist = b"\
song.gbs::GBS,-1,Negative,0:01
not a track line
song.gbs::GBS,9,Out Of Range,0:01
song.gbs::GBS,$1,Hex,0:01,,0
";

    let run = render_with(
        ScriptedEngine::new(),
        fixture.config(RATE),
        &image,
        Some(&playlist[..]),
        fixture.path(),
    )
    .unwrap();

    assert_eq!(run.tracks.len(), 1);
    assert_eq!(run.tracks[0].plan.index, 1);
    assert_eq!(run.tracks[0].plan.title, "Hex");
    assert_eq!(run.engine.selected_tracks(), vec![1]);
    assert_eq!(
        RenderFixture::wav_names(fixture.path()),
        vec!["001 Hex.wav"]
    );
}

#[test]
fn test_track_count_bounds_playlist_entries() {
    let fixture = RenderFixture::new();
    let image = GbsImage::new("Tune", 2).to_bytes();
    let playlist = b"\
a.gbs,0,One,0:01,,0
a.gbs,1,Two,0:01,,0
a.gbs,0,Again,0:01,,0
a.gbs,1,More,0:01,,0
";

    let run = render_with(
        ScriptedEngine::new(),
        fixture.config(RATE),
        &image,
        Some(&playlist[..]),
        fixture.path(),
    )
    .unwrap();

    assert_eq!(run.started, vec![1, 2]);
    assert_eq!(run.engine.selected_tracks(), vec![0, 1]);
}

#[test]
fn test_first_track_offsets_ordinals() {
    let fixture = RenderFixture::new();
    let image = GbsImage::new("Tune", 3).first_song(2).to_bytes();
    let playlist = b"a.gbs,0,Zero,0:01,,0\na.gbs,0,Zero Again,0:01,,0\n";

    let run = render_with(
        ScriptedEngine::new(),
        fixture.config(RATE),
        &image,
        Some(&playlist[..]),
        fixture.path(),
    )
    .unwrap();

    assert_eq!(run.started, vec![2, 3]);
    assert_eq!(
        RenderFixture::wav_names(fixture.path()),
        vec!["002 Zero.wav", "003 Zero Again.wav"]
    );
}

#[test]
fn test_playlist_without_tracks_renders_nothing() {
    let fixture = RenderFixture::new();
    let image = GbsImage::new("Tune", 2).to_bytes();

    let run = render_with(
        ScriptedEngine::new(),
        fixture.config(RATE),
        &image,
        Some(&b"# just a comment\n"[..]),
        fixture.path(),
    )
    .unwrap();

    assert!(run.tracks.is_empty());
    assert!(run.engine.selected_tracks().is_empty());
}

// ============================================================================
// Inspect Agrees With Render
// ============================================================================

#[test]
fn test_inspect_plans_match_rendered_tracks() {
    let fixture = RenderFixture::new();
    let image = GbsImage::new("Engine Title", 3).to_bytes();

    let report = inspect(&image, Some(ALBUM_PLAYLIST.as_bytes()), RATE).unwrap();
    let tracks = render_song(
        ScriptedEngine::new(),
        &fixture.config(RATE),
        &image,
        Some(ALBUM_PLAYLIST.as_bytes()),
        fixture.path(),
    )
    .unwrap();

    assert_eq!(report.tracks.len(), tracks.len());
    for (planned, rendered) in report.tracks.iter().zip(&tracks) {
        assert_eq!(planned.plan, rendered.plan);
        assert_eq!(
            rendered.path.file_name().unwrap().to_string_lossy(),
            planned.file_name
        );
    }
}
