//! Linear fade-out envelope.
//!
//! The envelope is anchored to the end of the track. A window of samples is
//! described by how many frames still follow it, so each frame's gain depends
//! only on its distance from the final frame and a track faded window by
//! window is identical to one faded in a single pass.

use crate::pcm::clamp_i16;

/// Applies the fade-out envelope to one window of interleaved samples.
///
/// `frames_remaining` is the number of frames of the track that come after
/// this window. With `fade_frames` of zero the window is left untouched.
pub fn apply_fade(samples: &mut [i16], channels: usize, frames_remaining: u64, fade_frames: u64) {
    if fade_frames == 0 || channels == 0 {
        return;
    }

    let frame_count = (samples.len() / channels) as u64;
    let tail = frames_remaining.saturating_add(frame_count);
    let start = tail.saturating_sub(fade_frames);
    let silence_floor = start + fade_frames.min(tail);
    if start >= frame_count {
        return;
    }

    let scale = fade_frames as f64;
    // start < frame_count here, so it fits in usize
    for (i, frame) in samples
        .chunks_exact_mut(channels)
        .enumerate()
        .skip(start as usize)
    {
        let i = i as u64;
        if i >= silence_floor {
            frame.fill(0);
            continue;
        }
        let gain = (silence_floor - i) as f64 / scale;
        for sample in frame {
            *sample = clamp_i16((f64::from(*sample) * gain) as i32);
        }
    }
}
