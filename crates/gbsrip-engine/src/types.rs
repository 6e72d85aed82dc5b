use serde::Serialize;

/// One stereo sample pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StereoSample {
    pub left: i16,
    pub right: i16,
}

impl StereoSample {
    pub const SILENCE: StereoSample = StereoSample { left: 0, right: 0 };

    pub fn new(left: i16, right: i16) -> Self {
        Self { left, right }
    }
}

/// Channel mode requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelMode {
    Mono,
    #[default]
    Stereo,
}

impl ChannelMode {
    pub fn channels(self) -> u16 {
        match self {
            ChannelMode::Mono => 1,
            ChannelMode::Stereo => 2,
        }
    }
}

/// Song metadata reported by the engine after loading an image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SongInfo {
    /// Album title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Copyright line.
    pub copyright: String,
    /// Number of tracks in the image.
    pub track_count: u32,
    /// Zero-based index of the first playable track.
    pub first_track: u32,
}

impl SongInfo {
    /// Zero-based indices of the playable tracks.
    pub fn playable_tracks(&self) -> std::ops::Range<u32> {
        self.first_track.min(self.track_count)..self.track_count
    }

    /// True when `index` is a valid track of this song.
    pub fn has_track(&self, index: u32) -> bool {
        index < self.track_count
    }
}
