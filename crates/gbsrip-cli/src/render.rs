//! Render driver.
//!
//! Connects a [`SoundEngine`] to the WAV pipeline: for every planned track
//! it writes the header, runs the engine until the track's frame budget is
//! spent and appends the tag chunk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gbsrip_engine::{SongInfo, SoundEngine};
use gbsrip_m3u::PlaylistDirectives;
use gbsrip_wav::writer::riff_size;
use gbsrip_wav::{write_footer, write_header, RenderSession, TagBlock};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::metadata::{AlbumTags, TrackPlan, TrackPlanner};

/// A finished track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTrack {
    /// The plan the track was rendered from.
    pub plan: TrackPlan,
    /// Output file.
    pub path: PathBuf,
    /// Size of the output file in bytes.
    pub bytes: u64,
}

/// Progress notifications from the driver.
#[derive(Debug)]
pub enum RenderEvent<'a> {
    /// A track is about to be rendered.
    TrackStarted { plan: &'a TrackPlan, path: &'a Path },
    /// Whole-percent progress of the current track.
    Progress { plan: &'a TrackPlan, percent: u32 },
    /// A track was written.
    TrackFinished(&'a RenderedTrack),
}

/// Drives one engine through a song's tracks.
pub struct Renderer<E: SoundEngine> {
    engine: E,
    config: RenderConfig,
}

impl<E: SoundEngine> Renderer<E> {
    /// Creates a renderer and applies the output settings to the engine.
    pub fn new(mut engine: E, config: RenderConfig) -> Self {
        engine.set_sample_rate(config.sample_rate);
        engine.set_channel_mode(config.channel_mode());
        engine.set_model(config.model);
        Self { engine, config }
    }

    /// The render settings.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Loads a song image into the engine.
    pub fn load(&mut self, image: &[u8]) -> Result<SongInfo> {
        self.engine
            .load(image)
            .with_context(|| format!("{} engine failed to load song image", self.engine.name()))
    }

    /// Renders every planned track of `song` into `out_dir`.
    ///
    /// `playlist` is the raw companion playlist, if any. Album tags come from
    /// its leading comments with the song's own metadata as fallback.
    pub fn render_all(
        &mut self,
        song: &SongInfo,
        playlist: Option<&[u8]>,
        out_dir: &Path,
        on_event: &mut dyn FnMut(RenderEvent<'_>),
    ) -> Result<Vec<RenderedTrack>> {
        let directives = playlist.map(PlaylistDirectives::scan).unwrap_or_default();
        let album = AlbumTags::resolve(&directives, song);
        let mut tags = TagBlock::new();
        let mut rendered = Vec::new();

        for plan in TrackPlanner::new(song, playlist, self.config.sample_rate) {
            album
                .fill_tag_block(&mut tags, &plan.title)
                .with_context(|| format!("failed to build tags for track {}", plan.ordinal))?;
            let path = plan.output_path(out_dir);
            let track = self.render_track(&plan, &tags, &path, on_event)?;
            rendered.push(track);
        }

        info!(tracks = rendered.len(), "render finished");
        Ok(rendered)
    }

    /// Renders one track to `path`.
    ///
    /// On failure the partially written file is removed.
    pub fn render_track(
        &mut self,
        plan: &TrackPlan,
        tags: &TagBlock,
        path: &Path,
        on_event: &mut dyn FnMut(RenderEvent<'_>),
    ) -> Result<RenderedTrack> {
        on_event(RenderEvent::TrackStarted { plan, path });
        info!(
            index = plan.index,
            ordinal = plan.ordinal,
            path = %path.display(),
            "rendering track"
        );

        let file = File::create(path)
            .with_context(|| format!("failed to create output file: {}", path.display()))?;
        let bytes = match self.write_track(plan, tags, path, BufWriter::new(file), on_event) {
            Ok(bytes) => bytes,
            Err(err) => {
                // the header already claims the full size; drop the partial file
                if let Err(remove) = fs::remove_file(path) {
                    warn!(path = %path.display(), error = %remove, "failed to remove partial output");
                }
                return Err(err);
            }
        };
        debug!(bytes, "track written");

        let track = RenderedTrack {
            plan: plan.clone(),
            path: path.to_path_buf(),
            bytes,
        };
        on_event(RenderEvent::TrackFinished(&track));
        Ok(track)
    }

    fn write_track(
        &mut self,
        plan: &TrackPlan,
        tags: &TagBlock,
        path: &Path,
        mut output: BufWriter<File>,
        on_event: &mut dyn FnMut(RenderEvent<'_>),
    ) -> Result<u64> {
        let format = self.config.wav_format();
        write_header(&mut output, &format, plan.total_frames, tags)
            .with_context(|| format!("failed to write WAV header: {}", path.display()))?;

        self.engine.reset()?;
        self.engine
            .select_track(plan.index)
            .with_context(|| format!("failed to start track {}", plan.index + 1))?;

        let mut session =
            RenderSession::new(output, self.config.layout, plan.total_frames, plan.fade_frames);
        let mut next_percent = 0;
        while !session.is_complete() {
            self.engine
                .run_step(&mut |sample| session.push(sample.left, sample.right))
                .with_context(|| format!("failed while rendering {}", path.display()))?;

            let percent = percent_done(session.frames_accepted(), plan.total_frames);
            if percent >= next_percent {
                on_event(RenderEvent::Progress { plan, percent });
                next_percent = percent + 1;
            }
        }

        let mut output = session
            .finish()
            .with_context(|| format!("failed to write samples: {}", path.display()))?;
        write_footer(&mut output, tags)
            .with_context(|| format!("failed to write tag chunk: {}", path.display()))?;
        output
            .flush()
            .with_context(|| format!("failed to flush {}", path.display()))?;

        Ok(u64::from(riff_size(&format, plan.total_frames, tags)?) + 8)
    }

    /// Returns the engine.
    pub fn into_engine(self) -> E {
        self.engine
    }
}

fn percent_done(done: u64, total: u64) -> u32 {
    if total == 0 {
        return 100;
    }
    (done.saturating_mul(100) / total).min(100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_whole_and_bounded() {
        assert_eq!(percent_done(0, 200), 0);
        assert_eq!(percent_done(1, 200), 0);
        assert_eq!(percent_done(2, 200), 1);
        assert_eq!(percent_done(200, 200), 100);
        assert_eq!(percent_done(5, 0), 100);
    }
}
