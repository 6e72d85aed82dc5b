//! Property-based validation tests for gbsrip using proptest.
//!
//! These tests check pipeline-wide invariants for arbitrary inputs: the
//! planner never panics on any playlist, written files always validate, and
//! tag text survives the trip into the file.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gbsrip-tests --test proptest_validation
//! ```

use proptest::prelude::*;

use gbsrip_cli::{AlbumTags, TrackPlanner};
use gbsrip_engine::SongInfo;
use gbsrip_m3u::PlaylistDirectives;
use gbsrip_tests::format_validators::{validate_id3, validate_wav};
use gbsrip_wav::{
    apply_fade, frame, pcm, write_footer, write_header, write_wav, ChannelLayout, RenderSession,
    TagBlock, WavFormat,
};

fn song(track_count: u32, first_track: u32) -> SongInfo {
    SongInfo {
        title: "Song".to_string(),
        author: String::new(),
        copyright: String::new(),
        track_count,
        first_track: first_track.min(track_count.saturating_sub(1)),
    }
}

/// Playlist-shaped text: a mix of comments, track lines and junk.
fn playlist_text() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        "# [ -~]{0,30}",
        "# @(TITLE|ARTIST|COMPOSER|DATE|RIPPER|TAGGER)[: ]?[ -~]{0,20}",
        "[a-z]{1,8}\\.gbs(::GBS)?,-?[0-9]{1,3},[ -~&&[^,]]{0,12}(,[0-9:.\\-]{0,9}){0,4}",
        "[ -~]{0,40}",
    ];
    prop::collection::vec(line, 0..12).prop_map(|lines| lines.join("\n"))
}

// ============================================================================
// 1. Planning Arbitrary Playlists
// ============================================================================

proptest! {
    /// Arbitrary bytes never panic the planner.
    #[test]
    fn planner_never_panics_on_bytes(
        data in prop::collection::vec(any::<u8>(), 0..512),
        count in 1u32..20,
    ) {
        let song = song(count, 0);
        let plans: Vec<_> = TrackPlanner::new(&song, Some(data.as_slice()), 1000).collect();
        prop_assert!(plans.len() <= count as usize);
        let _ = PlaylistDirectives::scan(&data);
    }

    /// Plans stay inside the song and ordinals count up from the first track.
    #[test]
    fn planned_tracks_are_in_range(
        text in playlist_text(),
        count in 1u32..10,
        first in 0u32..10,
        rate in 1u32..2000,
    ) {
        let song = song(count, first);
        let plans: Vec<_> = TrackPlanner::new(&song, Some(text.as_bytes()), rate).collect();

        prop_assert!(plans.len() <= song.playable_tracks().len());
        for (offset, plan) in plans.iter().enumerate() {
            prop_assert!(plan.index < count);
            prop_assert_eq!(plan.ordinal, song.first_track + 1 + offset as u32);
            prop_assert!(plan.total_frames >= plan.fade_frames);
            prop_assert!(plan.file_name().ends_with(".wav"));
            prop_assert!(!plan.file_name().contains('/'));
        }
    }

    /// Without a playlist every playable track is planned exactly once.
    #[test]
    fn unlisted_plans_cover_playable_tracks(count in 1u32..40, first in 0u32..40) {
        let song = song(count, first);
        let indices: Vec<u32> = TrackPlanner::new(&song, None, 10).map(|p| p.index).collect();
        prop_assert_eq!(indices, song.playable_tracks().collect::<Vec<_>>());
    }
}

// ============================================================================
// 2. Written Files Always Validate
// ============================================================================

proptest! {
    /// Any PCM payload and tag text produces a valid file.
    #[test]
    fn written_files_validate(
        samples in prop::collection::vec(any::<i16>(), 0..400),
        mono in any::<bool>(),
        rate in 1u32..200_000,
        title in "[^\\x00]{0,40}",
    ) {
        let format = if mono { WavFormat::mono(rate) } else { WavFormat::stereo(rate) };
        let mut tags = TagBlock::new();
        if !title.is_empty() {
            tags.add_text(frame::TITLE, &title).unwrap();
        }
        let mut pcm_bytes = Vec::new();
        pcm::pack_frames(&samples, &mut pcm_bytes);

        let mut out = Vec::new();
        write_wav(&mut out, &format, &pcm_bytes, &tags).unwrap();
        let info = validate_wav(&out).unwrap();

        let channels = usize::from(format.channels);
        prop_assert_eq!(info.num_frames, samples.len() / channels);
        prop_assert_eq!(info.sample_rate, rate);
        prop_assert_eq!(
            info.samples(&out),
            samples[..info.num_frames * channels].to_vec()
        );
        match info.tag {
            Some(tag) => {
                prop_assert_eq!(tag.text("TIT2"), Some(title));
            }
            None => {
                prop_assert!(title.is_empty());
            }
        }
    }

    /// Album tags from any playlist comments decode back unchanged.
    #[test]
    fn album_tags_survive_encoding(
        album in "[^\\x00\\r\\n]{1,30}",
        artist in "[^\\x00\\r\\n]{1,30}",
        track_title in "[^\\x00]{0,30}",
    ) {
        let tags = AlbumTags {
            title: Some(album.clone()),
            artist: Some(artist.clone()),
            ..AlbumTags::default()
        };
        let block = tags.tag_block(&track_title).unwrap();
        let decoded = validate_id3(block.as_bytes()).unwrap();

        prop_assert_eq!(decoded.text("TALB"), Some(album));
        prop_assert_eq!(decoded.text("TPE1"), Some(artist));
        if track_title.is_empty() {
            prop_assert!(decoded.frame("TIT2").is_none());
        } else {
            prop_assert_eq!(decoded.text("TIT2"), Some(track_title));
        }
    }
}

// ============================================================================
// 3. Streaming Matches Single-Pass Rendering
// ============================================================================

proptest! {
    /// A session's output equals fading the whole track in one pass.
    #[test]
    fn session_matches_single_pass(
        frames in prop::collection::vec((any::<i16>(), any::<i16>()), 0..600),
        fade in 0u64..700,
        window in 1usize..300,
    ) {
        let total = frames.len() as u64;
        let format = WavFormat::stereo(8000);
        let tags = TagBlock::new();

        let mut streamed = Vec::new();
        write_header(&mut streamed, &format, total, &tags).unwrap();
        let mut session =
            RenderSession::with_window_frames(streamed, ChannelLayout::Stereo, total, fade, window);
        for &(left, right) in &frames {
            session.push(left, right).unwrap();
        }
        let mut streamed = session.finish().unwrap();
        write_footer(&mut streamed, &tags).unwrap();

        let mut interleaved: Vec<i16> = frames.iter().flat_map(|&(l, r)| [l, r]).collect();
        apply_fade(&mut interleaved, 2, 0, fade);
        let mut pcm_bytes = Vec::new();
        pcm::pack_frames(&interleaved, &mut pcm_bytes);
        let mut single = Vec::new();
        write_wav(&mut single, &format, &pcm_bytes, &tags).unwrap();

        prop_assert_eq!(streamed, single);
    }
}
