//! Album tags, per-track plans and output file names.

use std::fmt;
use std::path::{Path, PathBuf};

use gbsrip_engine::SongInfo;
use gbsrip_m3u::{PlaylistDirectives, PlaylistLine, PlaylistParser};
use gbsrip_wav::{frame, TagBlock, WavResult};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Render length of a track when no playlist is given, fade included.
pub const UNLISTED_TOTAL_SECS: u64 = 180;
/// Fade length used when none is specified.
pub const DEFAULT_FADE_SECS: u64 = 10;
/// Playlist track length when neither length nor fade is given.
pub const LISTED_LENGTH_SECS: u64 = 170;
/// Playlist track length when only the fade is given.
pub const LISTED_LENGTH_WITH_FADE_SECS: u64 = 180;

/// Characters replaced by `_` in output file names.
const UNSAFE_FILE_CHARS: &[char] = &['/', '\\', ':', '*', '"', '?', '<', '>', '|'];

/// Album-level tags attached to every track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlbumTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub composer: Option<String>,
    pub date: Option<String>,
    pub ripper: Option<String>,
    pub tagger: Option<String>,
}

impl AlbumTags {
    /// Merges playlist directives with engine metadata.
    ///
    /// Playlist values win; the engine's title and author fill in when the
    /// playlist has none and the engine string is non-empty.
    pub fn resolve(directives: &PlaylistDirectives, song: &SongInfo) -> Self {
        let engine_value = |value: &str| (!value.is_empty()).then(|| value.to_string());

        Self {
            title: directives
                .title
                .clone()
                .or_else(|| engine_value(&song.title)),
            artist: directives
                .artist
                .clone()
                .or_else(|| engine_value(&song.author)),
            composer: directives.composer.clone(),
            date: directives.date.clone(),
            ripper: directives.ripper.clone(),
            tagger: directives.tagger.clone(),
        }
    }

    /// Builds the tag block for one track.
    pub fn tag_block(&self, track_title: &str) -> WavResult<TagBlock> {
        let mut block = TagBlock::new();
        self.fill_tag_block(&mut block, track_title)?;
        Ok(block)
    }

    /// Resets `block` and writes this album's frames plus the track title.
    pub fn fill_tag_block(&self, block: &mut TagBlock, track_title: &str) -> WavResult<()> {
        block.reset();
        if let Some(title) = &self.title {
            block.add_text(frame::ALBUM, title)?;
        }
        if let Some(artist) = &self.artist {
            block.add_text(frame::ARTIST, artist)?;
        }
        if let Some(composer) = &self.composer {
            block.add_text(frame::COMPOSER, composer)?;
        }
        if let Some(date) = &self.date {
            block.add_text(frame::RELEASE_DATE, date)?;
        }
        if !track_title.is_empty() {
            block.add_text(frame::TITLE, track_title)?;
        }
        if let Some(ripper) = &self.ripper {
            block.add_private("gbs_ripper", ripper)?;
        }
        if let Some(tagger) = &self.tagger {
            block.add_private("gbs_tagger", tagger)?;
        }
        Ok(())
    }
}

/// Everything needed to render one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackPlan {
    /// Zero-based engine track index.
    pub index: u32,
    /// One-based output number.
    pub ordinal: u32,
    /// Frames to render, fade included.
    pub total_frames: u64,
    /// Frames of fade-out at the end.
    pub fade_frames: u64,
    /// Track title.
    pub title: String,
}

/// Why a playlist track entry was not rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSkip {
    /// The entry's track number is negative.
    NegativeTrack(i32),
    /// The entry's track number is past the last track.
    TrackOutOfRange { track: i32, count: u32 },
}

impl fmt::Display for PlanSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanSkip::NegativeTrack(track) => write!(f, "negative track number {}", track),
            PlanSkip::TrackOutOfRange { track, count } => {
                write!(f, "track {} is outside the song's {} tracks", track, count)
            }
        }
    }
}

fn secs_to_frames(secs: u64, rate: u32) -> u64 {
    secs * u64::from(rate)
}

fn ms_to_frames(ms: i32, rate: u32) -> Option<u64> {
    let ms = u64::try_from(ms).ok()?;
    Some(ms * u64::from(rate) / 1000)
}

/// Title used when the playlist gives none.
pub fn fallback_title(song: &SongInfo, index: u32) -> String {
    format!("{} {:03}/{:03}", song.title, index + 1, song.track_count)
}

impl TrackPlan {
    /// Plan for a track rendered without a playlist.
    pub fn unlisted(song: &SongInfo, index: u32, ordinal: u32, sample_rate: u32) -> Self {
        Self {
            index,
            ordinal,
            total_frames: secs_to_frames(UNLISTED_TOTAL_SECS, sample_rate),
            fade_frames: secs_to_frames(DEFAULT_FADE_SECS, sample_rate),
            title: fallback_title(song, index),
        }
    }

    /// Plan for a playlist track entry.
    pub fn listed(
        line: &PlaylistLine<'_>,
        song: &SongInfo,
        ordinal: u32,
        sample_rate: u32,
    ) -> Result<Self, PlanSkip> {
        let track = line.track.unwrap_or_default();
        let index = u32::try_from(track).map_err(|_| PlanSkip::NegativeTrack(track))?;
        if !song.has_track(index) {
            return Err(PlanSkip::TrackOutOfRange {
                track,
                count: song.track_count,
            });
        }

        let fade = line.fade_ms.and_then(|ms| ms_to_frames(ms, sample_rate));
        let length = line
            .length_ms
            .and_then(|ms| ms_to_frames(ms, sample_rate))
            .unwrap_or_else(|| {
                let secs = if fade.is_some() {
                    LISTED_LENGTH_WITH_FADE_SECS
                } else {
                    LISTED_LENGTH_SECS
                };
                secs_to_frames(secs, sample_rate)
            });
        let fade_frames = fade.unwrap_or_else(|| secs_to_frames(DEFAULT_FADE_SECS, sample_rate));

        Ok(Self {
            index,
            ordinal,
            total_frames: length + fade_frames,
            fade_frames,
            title: line.title().unwrap_or_else(|| fallback_title(song, index)),
        })
    }

    /// Output file name: ordinal plus sanitized title.
    pub fn file_name(&self) -> String {
        format!("{:03} {}.wav", self.ordinal, sanitize_file_name(&self.title))
    }

    /// Full output path inside `dir`.
    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }

    /// Render length in seconds at `sample_rate`.
    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        self.total_frames as f64 / f64::from(sample_rate.max(1))
    }
}

/// Replaces characters that are unsafe in file names with `_`.
pub fn sanitize_file_name(title: &str) -> String {
    title.replace(UNSAFE_FILE_CHARS, "_")
}

/// Produces the plans for a song, one per rendered track.
///
/// Without a playlist every playable track is planned in order. With one,
/// each plan consumes the next usable track entry; planning ends when the
/// song's playable range or the playlist runs out.
pub struct TrackPlanner<'a> {
    song: &'a SongInfo,
    sample_rate: u32,
    playlist: Option<PlaylistParser<'a>>,
    cursor: u32,
    done: bool,
}

impl<'a> TrackPlanner<'a> {
    /// Creates a planner. The playlist is read from its first line.
    pub fn new(song: &'a SongInfo, playlist: Option<&'a [u8]>, sample_rate: u32) -> Self {
        Self {
            song,
            sample_rate,
            playlist: playlist.map(PlaylistParser::new),
            cursor: song.playable_tracks().start,
            done: false,
        }
    }

    fn next_listed(&mut self) -> Option<TrackPlan> {
        let parser = self.playlist.as_mut()?;
        loop {
            let Some(line) = parser.next_track() else {
                info!("playlist has no more track entries");
                return None;
            };
            match TrackPlan::listed(&line, self.song, self.cursor + 1, self.sample_rate) {
                Ok(plan) => return Some(plan),
                Err(skip) => warn!(
                    line = %String::from_utf8_lossy(line.line),
                    "skipping playlist entry: {}", skip
                ),
            }
        }
    }
}

impl Iterator for TrackPlanner<'_> {
    type Item = TrackPlan;

    fn next(&mut self) -> Option<TrackPlan> {
        if self.done || self.cursor >= self.song.track_count {
            return None;
        }

        let plan = if self.playlist.is_some() {
            self.next_listed()
        } else {
            Some(TrackPlan::unlisted(
                self.song,
                self.cursor,
                self.cursor + 1,
                self.sample_rate,
            ))
        };

        match plan {
            Some(plan) => {
                debug!(
                    index = plan.index,
                    ordinal = plan.ordinal,
                    total_frames = plan.total_frames,
                    fade_frames = plan.fade_frames,
                    title = %plan.title,
                    "planned track"
                );
                self.cursor += 1;
                Some(plan)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}
