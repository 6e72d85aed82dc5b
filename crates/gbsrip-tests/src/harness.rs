//! Render harness: runs the full driver against any engine and collects
//! what it reported.

use std::path::Path;

use anyhow::Result;
use gbsrip_cli::{RenderConfig, RenderEvent, RenderedTrack, Renderer};
use gbsrip_engine::SoundEngine;

/// Outcome of one harness run.
#[derive(Debug)]
pub struct RenderRun<E> {
    /// Tracks written, in order.
    pub tracks: Vec<RenderedTrack>,
    /// The engine after rendering.
    pub engine: E,
    /// Progress percentages reported per track, in order.
    pub progress: Vec<Vec<u32>>,
    /// Ordinals announced by `TrackStarted`.
    pub started: Vec<u32>,
}

/// Load `image` and render every planned track into `out_dir`.
pub fn render_with<E: SoundEngine>(
    engine: E,
    config: RenderConfig,
    image: &[u8],
    playlist: Option<&[u8]>,
    out_dir: &Path,
) -> Result<RenderRun<E>> {
    let mut renderer = Renderer::new(engine, config);
    let song = renderer.load(image)?;

    let mut progress: Vec<Vec<u32>> = Vec::new();
    let mut started = Vec::new();
    let mut on_event = |event: RenderEvent<'_>| match event {
        RenderEvent::TrackStarted { plan, .. } => {
            started.push(plan.ordinal);
            progress.push(Vec::new());
        }
        RenderEvent::Progress { percent, .. } => {
            if let Some(track) = progress.last_mut() {
                track.push(percent);
            }
        }
        RenderEvent::TrackFinished(_) => {}
    };
    let tracks = renderer.render_all(&song, playlist, out_dir, &mut on_event)?;

    Ok(RenderRun {
        tracks,
        engine: renderer.into_engine(),
        progress,
        started,
    })
}

/// [`render_with`], returning only the written tracks.
pub fn render_song<E: SoundEngine>(
    engine: E,
    config: &RenderConfig,
    image: &[u8],
    playlist: Option<&[u8]>,
    out_dir: &Path,
) -> Result<Vec<RenderedTrack>> {
    Ok(render_with(engine, config.clone(), image, playlist, out_dir)?.tracks)
}
