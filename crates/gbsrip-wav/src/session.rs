//! Per-track render session.
//!
//! A [`RenderSession`] is the state captured by the engine's sample callback:
//! it collects sample pairs into a fixed window, and whenever the window
//! fills it fades, packs and writes it. Memory use is bounded by the window
//! size no matter how long the track is.

use std::io::{self, Write};

use tracing::{debug, trace};

use crate::fade::apply_fade;
use crate::format::ChannelLayout;
use crate::pcm::{downmix, pack_frames};

/// Frames held by a window before it is flushed.
pub const WINDOW_FRAMES: usize = 8192;

/// Frame budget of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCounters {
    /// Frames still to be accepted; zero ends the run.
    pub frames_remaining: u64,
    /// Length of the fade-out in frames.
    pub fade_frames: u64,
}

/// Fixed-capacity buffer of interleaved samples.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: Vec<i16>,
    capacity: usize,
}

impl SampleWindow {
    /// Creates a window holding `capacity` samples (not frames).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends one sample. The caller flushes before the window overflows.
    pub fn push(&mut self, sample: i16) {
        debug_assert!(self.samples.len() < self.capacity);
        self.samples.push(sample);
    }

    /// Samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples are held.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when the window has reached capacity.
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Maximum number of samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Mutable view of the held samples.
    pub fn filled_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    /// Resets the fill cursor.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Streams one track's samples to an output.
#[derive(Debug)]
pub struct RenderSession<W: Write> {
    output: W,
    layout: ChannelLayout,
    window: SampleWindow,
    counters: RenderCounters,
    total_frames: u64,
    frames_written: u64,
    packed: Vec<u8>,
}

impl<W: Write> RenderSession<W> {
    /// Creates a session with the default window of [`WINDOW_FRAMES`].
    pub fn new(output: W, layout: ChannelLayout, total_frames: u64, fade_frames: u64) -> Self {
        Self::with_window_frames(output, layout, total_frames, fade_frames, WINDOW_FRAMES)
    }

    /// Creates a session with a custom window size (at least one frame).
    pub fn with_window_frames(
        output: W,
        layout: ChannelLayout,
        total_frames: u64,
        fade_frames: u64,
        window_frames: usize,
    ) -> Self {
        let capacity = window_frames.max(1) * usize::from(layout.channels());
        Self {
            output,
            layout,
            window: SampleWindow::with_capacity(capacity),
            counters: RenderCounters {
                frames_remaining: total_frames,
                fade_frames,
            },
            total_frames,
            frames_written: 0,
            packed: Vec::with_capacity(capacity * 2),
        }
    }

    /// Accepts one stereo sample pair.
    ///
    /// Pairs arriving after the frame budget is spent are ignored.
    pub fn push(&mut self, left: i16, right: i16) -> io::Result<()> {
        if self.counters.frames_remaining == 0 {
            return Ok(());
        }

        match self.layout {
            ChannelLayout::Mono => self.window.push(downmix(left, right)),
            ChannelLayout::Stereo => {
                self.window.push(left);
                self.window.push(right);
            }
        }
        self.counters.frames_remaining -= 1;

        if self.window.is_full() {
            self.flush_window()?;
        }
        Ok(())
    }

    /// True once the frame budget is spent.
    pub fn is_complete(&self) -> bool {
        self.counters.frames_remaining == 0
    }

    /// Current counters.
    pub fn counters(&self) -> RenderCounters {
        self.counters
    }

    /// Frames planned for this track.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Frames accepted so far.
    pub fn frames_accepted(&self) -> u64 {
        self.total_frames - self.counters.frames_remaining
    }

    /// Frames already written to the output.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Writes any partially filled window and returns the flushed output.
    pub fn finish(mut self) -> io::Result<W> {
        if !self.window.is_empty() {
            self.flush_window()?;
        }
        self.output.flush()?;
        debug!(
            frames = self.frames_written,
            planned = self.total_frames,
            "render session finished"
        );
        Ok(self.output)
    }

    fn flush_window(&mut self) -> io::Result<()> {
        let channels = usize::from(self.layout.channels());
        let samples = self.window.filled_mut();
        let frames = samples.len() / channels;

        apply_fade(
            samples,
            channels,
            self.counters.frames_remaining,
            self.counters.fade_frames,
        );
        pack_frames(samples, &mut self.packed);
        self.output.write_all(&self.packed)?;

        self.frames_written += frames as u64;
        self.window.clear();
        trace!(frames, remaining = self.counters.frames_remaining, "flushed window");
        Ok(())
    }
}
