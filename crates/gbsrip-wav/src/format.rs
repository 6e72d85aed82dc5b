//! WAV file format parameters.

/// Output channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLayout {
    /// Left and right averaged into one channel.
    Mono,
    /// Interleaved left/right.
    #[default]
    Stereo,
}

impl ChannelLayout {
    /// Number of interleaved channels.
    pub fn channels(self) -> u16 {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }
}

/// WAV file format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (always 16).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Creates a mono WAV format.
    pub fn mono(sample_rate: u32) -> Self {
        Self::from_layout(ChannelLayout::Mono, sample_rate)
    }

    /// Creates a stereo WAV format.
    pub fn stereo(sample_rate: u32) -> Self {
        Self::from_layout(ChannelLayout::Stereo, sample_rate)
    }

    /// Creates a 16-bit format for the given layout.
    pub fn from_layout(layout: ChannelLayout, sample_rate: u32) -> Self {
        Self {
            channels: layout.channels(),
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// Bytes per sample (per channel).
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per sample frame.
    pub fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Bytes per second, or `None` when it overflows the 32-bit field.
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate.checked_mul(u32::from(self.block_align()))
    }
}
