//! 16-bit little-endian PCM packing.

use byteorder::{ByteOrder, LittleEndian};

/// Bytes per packed sample.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Writes one sample into the first two bytes of `out`.
///
/// # Panics
///
/// Panics if `out` is shorter than two bytes.
pub fn pack_i16le(out: &mut [u8], sample: i16) {
    LittleEndian::write_i16(&mut out[..BYTES_PER_SAMPLE], sample);
}

/// Reads one sample from the first two bytes of `bytes`.
///
/// # Panics
///
/// Panics if `bytes` is shorter than two bytes.
pub fn unpack_i16le(bytes: &[u8]) -> i16 {
    LittleEndian::read_i16(&bytes[..BYTES_PER_SAMPLE])
}

/// Packs interleaved samples into `out`, replacing its contents.
pub fn pack_frames(samples: &[i16], out: &mut Vec<u8>) {
    out.clear();
    out.resize(samples.len() * BYTES_PER_SAMPLE, 0);
    LittleEndian::write_i16_into(samples, out);
}

/// Saturates a widened sample back into 16 bits.
pub fn clamp_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Averages a stereo pair, truncating toward zero.
pub fn downmix(left: i16, right: i16) -> i16 {
    clamp_i16((i32::from(left) + i32::from(right)) / 2)
}
