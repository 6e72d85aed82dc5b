//! ID3v2.4 tag validator.

use super::FormatError;

const HEADER_SIZE: usize = 10;

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Frame {
    /// Four-character frame id.
    pub id: String,
    /// Frame flags.
    pub flags: u16,
    /// Raw payload, encoding byte included.
    pub payload: Vec<u8>,
}

impl Id3Frame {
    /// Text encoding byte (0x03 = UTF-8).
    pub fn encoding(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// NUL-terminated fields after the encoding byte.
    ///
    /// A trailing field without a terminator is still returned.
    pub fn fields(&self) -> Vec<String> {
        let body = self.payload.get(1..).unwrap_or_default();
        let body = body.strip_suffix(&[0u8]).unwrap_or(body);
        body.split(|&b| b == 0)
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect()
    }

    /// Value of a text frame.
    pub fn text(&self) -> Option<String> {
        self.fields().into_iter().next()
    }
}

/// A decoded tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Tag {
    /// Major version byte.
    pub version: u8,
    /// Payload size declared in the header.
    pub declared_size: usize,
    /// Frames in file order.
    pub frames: Vec<Id3Frame>,
}

impl Id3Tag {
    /// First frame with the given id.
    pub fn frame(&self, id: &str) -> Option<&Id3Frame> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// Text of the first frame with the given id.
    pub fn text(&self, id: &str) -> Option<String> {
        self.frame(id).and_then(Id3Frame::text)
    }

    /// Value of the `TXXX` frame with the given description.
    pub fn user_text(&self, description: &str) -> Option<String> {
        self.frames
            .iter()
            .filter(|f| f.id == "TXXX")
            .map(Id3Frame::fields)
            .find(|fields| fields.first().map(String::as_str) == Some(description))
            .and_then(|fields| fields.get(1).cloned())
    }

    /// Frame ids in file order.
    pub fn frame_ids(&self) -> Vec<&str> {
        self.frames.iter().map(|f| f.id.as_str()).collect()
    }
}

fn syncsafe(bytes: &[u8]) -> Result<usize, FormatError> {
    if bytes.iter().any(|&b| b & 0x80 != 0) {
        return Err(FormatError::new("ID3", "size byte has its high bit set"));
    }
    Ok(bytes
        .iter()
        .fold(0usize, |acc, &b| (acc << 7) | usize::from(b)))
}

/// Validate an ID3v2 tag and decode its frames.
///
/// The declared size must match the data exactly and the frames must tile
/// the payload with no padding.
pub fn validate_id3(data: &[u8]) -> Result<Id3Tag, FormatError> {
    if data.len() < HEADER_SIZE {
        return Err(FormatError::new(
            "ID3",
            format!("Tag too short: {} bytes", data.len()),
        ));
    }
    if &data[0..3] != b"ID3" {
        return Err(FormatError::at_offset("ID3", "Missing 'ID3' magic", 0));
    }

    let version = data[3];
    let declared_size = syncsafe(&data[6..10])?;
    if declared_size != data.len() - HEADER_SIZE {
        return Err(FormatError::at_offset(
            "ID3",
            format!(
                "Declared size {} does not match payload of {} bytes",
                declared_size,
                data.len() - HEADER_SIZE
            ),
            6,
        ));
    }

    let mut frames = Vec::new();
    let mut offset = HEADER_SIZE;
    while offset < data.len() {
        if offset + HEADER_SIZE > data.len() {
            return Err(FormatError::at_offset("ID3", "Truncated frame header", offset));
        }
        let id = String::from_utf8_lossy(&data[offset..offset + 4]).into_owned();
        let size = syncsafe(&data[offset + 4..offset + 8])
            .map_err(|e| FormatError::at_offset("ID3", e.message, offset + 4))?;
        let flags = u16::from_be_bytes([data[offset + 8], data[offset + 9]]);
        let start = offset + HEADER_SIZE;
        let end = start + size;
        if end > data.len() {
            return Err(FormatError::at_offset(
                "ID3",
                format!("Frame {} overruns the tag ({} bytes)", id, size),
                offset,
            ));
        }
        frames.push(Id3Frame {
            id,
            flags,
            payload: data[start..end].to_vec(),
        });
        offset = end;
    }

    Ok(Id3Tag {
        version,
        declared_size,
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbsrip_wav::{frame, TagBlock};

    #[test]
    fn test_decodes_tag_block() {
        let mut block = TagBlock::new();
        block.add_text(frame::ALBUM, "Foo").unwrap();
        block.add_private("gbs_ripper", "someone").unwrap();

        let tag = validate_id3(block.as_bytes()).unwrap();
        assert_eq!(tag.version, 4);
        assert_eq!(tag.frame_ids(), vec!["TALB", "TXXX"]);
        assert_eq!(tag.text("TALB").as_deref(), Some("Foo"));
        assert_eq!(tag.frame("TALB").unwrap().encoding(), Some(3));
        assert_eq!(tag.user_text("gbs_ripper").as_deref(), Some("someone"));
        assert_eq!(tag.user_text("gbs_tagger"), None);
    }

    #[test]
    fn test_empty_block_has_no_frames() {
        let tag = validate_id3(TagBlock::new().as_bytes()).unwrap();
        assert_eq!(tag.declared_size, 0);
        assert!(tag.frames.is_empty());
    }

    #[test]
    fn test_rejects_size_mismatch() {
        let mut block = TagBlock::new();
        block.add_text(frame::TITLE, "x").unwrap();
        let mut bytes = block.as_bytes().to_vec();
        bytes.push(0);
        assert!(validate_id3(&bytes).is_err());
    }

    #[test]
    fn test_rejects_bad_magic() {
        assert!(validate_id3(b"TAG\x04\0\0\0\0\0\0").is_err());
    }
}
