//! GBS image header.
//!
//! ```text
//! 0x00  "GBS"            magic
//! 0x03  u8               version (1)
//! 0x04  u8               number of songs
//! 0x05  u8               first song (1-based)
//! 0x06  u16 LE           load address
//! 0x08  u16 LE           init address
//! 0x0A  u16 LE           play address
//! 0x0C  u16 LE           stack pointer
//! 0x0E  u8               timer modulo
//! 0x0F  u8               timer control
//! 0x10  [u8; 32]         title
//! 0x30  [u8; 32]         author
//! 0x50  [u8; 32]         copyright
//! 0x70                   code
//! ```

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{EngineError, EngineResult};
use crate::types::SongInfo;

/// Size of the fixed header.
pub const HEADER_SIZE: usize = 0x70;

const MAGIC: &[u8; 3] = b"GBS";
const SUPPORTED_VERSION: u8 = 1;
const TEXT_FIELD_SIZE: usize = 32;

/// Parsed GBS header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GbsHeader {
    pub version: u8,
    pub song_count: u8,
    /// First song as stored (1-based).
    pub first_song: u8,
    pub load_address: u16,
    pub init_address: u16,
    pub play_address: u16,
    pub stack_pointer: u16,
    pub timer_modulo: u8,
    pub timer_control: u8,
    pub title: String,
    pub author: String,
    pub copyright: String,
}

impl GbsHeader {
    /// Parses the header at the start of `image`.
    pub fn parse(image: &[u8]) -> EngineResult<Self> {
        if image.len() < HEADER_SIZE {
            return Err(EngineError::invalid_image(format!(
                "{} bytes is shorter than the {}-byte GBS header",
                image.len(),
                HEADER_SIZE
            )));
        }
        if &image[0..3] != MAGIC {
            return Err(EngineError::invalid_image("missing GBS signature"));
        }

        let version = image[0x03];
        if version != SUPPORTED_VERSION {
            return Err(EngineError::invalid_image(format!(
                "unsupported GBS version {}",
                version
            )));
        }

        let song_count = image[0x04];
        if song_count == 0 {
            return Err(EngineError::invalid_image("image declares no songs"));
        }

        Ok(Self {
            version,
            song_count,
            first_song: image[0x05],
            load_address: LittleEndian::read_u16(&image[0x06..]),
            init_address: LittleEndian::read_u16(&image[0x08..]),
            play_address: LittleEndian::read_u16(&image[0x0A..]),
            stack_pointer: LittleEndian::read_u16(&image[0x0C..]),
            timer_modulo: image[0x0E],
            timer_control: image[0x0F],
            title: text_field(&image[0x10..]),
            author: text_field(&image[0x30..]),
            copyright: text_field(&image[0x50..]),
        })
    }

    /// Zero-based first playable track, clamped into the song range.
    pub fn first_track(&self) -> u32 {
        let first = u32::from(self.first_song.saturating_sub(1));
        first.min(u32::from(self.song_count) - 1)
    }

    /// Metadata in the form engines report it.
    pub fn song_info(&self) -> SongInfo {
        SongInfo {
            title: self.title.clone(),
            author: self.author.clone(),
            copyright: self.copyright.clone(),
            track_count: u32::from(self.song_count),
            first_track: self.first_track(),
        }
    }
}

/// Reads a NUL-padded text field, replacing invalid UTF-8.
fn text_field(bytes: &[u8]) -> String {
    let field = &bytes[..TEXT_FIELD_SIZE];
    let end = field.iter().position(|&b| b == 0).unwrap_or(TEXT_FIELD_SIZE);
    String::from_utf8_lossy(&field[..end]).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn image(count: u8, first: u8) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE + 16];
        data[0..3].copy_from_slice(b"GBS");
        data[3] = 1;
        data[4] = count;
        data[5] = first;
        data[0x06..0x08].copy_from_slice(&0x3F00u16.to_le_bytes());
        data[0x0A..0x0C].copy_from_slice(&0x4000u16.to_le_bytes());
        data[0x10..0x15].copy_from_slice(b"Title");
        data[0x30..0x36].copy_from_slice(b"Author");
        data[0x50..0x50 + 32].copy_from_slice(&[b'C'; 32]);
        data
    }

    #[test]
    fn parses_fields() {
        let header = GbsHeader::parse(&image(12, 3)).unwrap();
        assert_eq!(header.song_count, 12);
        assert_eq!(header.first_song, 3);
        assert_eq!(header.load_address, 0x3F00);
        assert_eq!(header.play_address, 0x4000);
        assert_eq!(header.title, "Title");
        assert_eq!(header.author, "Author");
        assert_eq!(header.copyright, "C".repeat(32));
    }

    #[test]
    fn song_info_uses_zero_based_first_track() {
        let info = GbsHeader::parse(&image(12, 3)).unwrap().song_info();
        assert_eq!(info.track_count, 12);
        assert_eq!(info.first_track, 2);
        assert_eq!(info.playable_tracks(), 2..12);
    }

    #[test]
    fn first_track_is_clamped() {
        assert_eq!(GbsHeader::parse(&image(4, 0)).unwrap().first_track(), 0);
        assert_eq!(GbsHeader::parse(&image(4, 9)).unwrap().first_track(), 3);
    }

    #[test]
    fn rejects_bad_images() {
        assert!(matches!(
            GbsHeader::parse(b"GBS"),
            Err(EngineError::InvalidImage { .. })
        ));

        let mut bad_magic = image(1, 1);
        bad_magic[0] = b'X';
        assert!(GbsHeader::parse(&bad_magic).is_err());

        let mut bad_version = image(1, 1);
        bad_version[3] = 2;
        let err = GbsHeader::parse(&bad_version).unwrap_err();
        assert!(err.to_string().contains("version 2"));

        assert!(GbsHeader::parse(&image(0, 1)).is_err());
    }
}
