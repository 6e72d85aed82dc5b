//! Line-at-a-time playlist parser.
//!
//! [`PlaylistParser`] owns nothing but a borrowed buffer and a scan offset.
//! Every call to [`PlaylistParser::parse_next`] consumes exactly one line and
//! returns it classified, so callers can interleave parsing with other work
//! (the renderer pulls one track line per rendered track).

use crate::number::{parse_loop_count, parse_timestamp, parse_track};


/// Classification of a parsed playlist line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty line, or a line that does not carry a parsable track number.
    Unknown,
    /// A line starting with `#`.
    Comment,
    /// A line with at least a filename and a track number.
    Track,
}

/// A single classified playlist line.
///
/// Optional numeric fields are `None` when the field is absent, empty or
/// malformed. All times are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistLine<'a> {
    /// Line classification.
    pub kind: LineKind,
    /// The full line without its terminator.
    pub line: &'a [u8],
    /// The filename field (including any `::TYPE` suffix).
    pub filename: Option<&'a [u8]>,
    /// The title field exactly as written, escapes included.
    pub raw_title: Option<&'a [u8]>,
    /// Engine track number.
    pub track: Option<i32>,
    /// Total song length.
    pub length_ms: Option<i32>,
    /// Length of the looping section.
    pub loop_ms: Option<i32>,
    /// Length of the intro before the loop starts.
    pub intro_ms: Option<i32>,
    /// Fade-out length.
    pub fade_ms: Option<i32>,
    /// Number of times to play the loop.
    pub loops: Option<i32>,
}

impl<'a> PlaylistLine<'a> {
    fn unknown(line: &'a [u8]) -> Self {
        Self {
            kind: LineKind::Unknown,
            line,
            filename: None,
            raw_title: None,
            track: None,
            length_ms: None,
            loop_ms: None,
            intro_ms: None,
            fade_ms: None,
            loops: None,
        }
    }

    /// Classifies and parses one line (terminator already removed).
    pub fn parse(line: &'a [u8]) -> Self {
        let mut parsed = Self::unknown(line);

        match line.first() {
            None => {}
            Some(b'#') => parsed.kind = LineKind::Comment,
            Some(_) => {
                parsed.parse_track_fields(Fields::new(line));
            }
        }

        parsed
    }

    /// Fills in track fields until the line runs out of fields.
    fn parse_track_fields(&mut self, mut fields: Fields<'a>) -> Option<()> {
        let filename = fields.next()?;
        let track_field = fields.next()?;
        self.filename = Some(filename);
        self.track = Some(parse_track(track_field)?);
        self.kind = LineKind::Track;

        self.raw_title = Some(fields.next()?);
        self.length_ms = parse_timestamp(fields.next()?);
        self.apply_loop_field(fields.next()?);
        self.fade_ms = parse_timestamp(fields.next()?);
        self.loops = parse_loop_count(fields.next()?);
        Some(())
    }

    /// Interprets the loop field relative to the already parsed length.
    ///
    /// - `-` loops the whole song.
    /// - `MM:SS-` is the intro length; the loop is what remains.
    /// - `MM:SS` is the loop length; the intro is what precedes it.
    fn apply_loop_field(&mut self, field: &[u8]) {
        if field == b"-" {
            self.loop_ms = self.length_ms;
            self.intro_ms = Some(0);
            return;
        }

        let Some(value) = parse_timestamp(field) else {
            return;
        };

        if field.ends_with(b"-") {
            self.intro_ms = Some(value);
            self.loop_ms = self.length_ms.map(|length| length.saturating_sub(value));
        } else {
            self.loop_ms = Some(value);
            self.intro_ms = self.length_ms.map(|length| length.saturating_sub(value));
        }
    }

    /// Returns true for [`LineKind::Track`] lines.
    pub fn is_track(&self) -> bool {
        self.kind == LineKind::Track
    }

    /// Length in bytes of the unescaped title.
    ///
    /// Use this to size a buffer for [`copy_title`](Self::copy_title).
    pub fn title_len(&self) -> usize {
        self.unescaped_title().count()
    }

    /// Copies the unescaped title into `dest`, truncating to its length.
    ///
    /// Returns the number of bytes written.
    pub fn copy_title(&self, dest: &mut [u8]) -> usize {
        let mut written = 0;
        for (slot, byte) in dest.iter_mut().zip(self.unescaped_title()) {
            *slot = byte;
            written += 1;
        }
        written
    }

    /// The unescaped title, or `None` when the field is absent or empty.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn title(&self) -> Option<String> {
        let bytes: Vec<u8> = self.unescaped_title().collect();
        if bytes.is_empty() {
            return None;
        }
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn unescaped_title(&self) -> Unescape<'a> {
        Unescape {
            bytes: self.raw_title.unwrap_or_default().iter(),
        }
    }
}

/// Iterator that drops each escaping backslash and keeps the byte after it.
struct Unescape<'a> {
    bytes: std::slice::Iter<'a, u8>,
}

impl Iterator for Unescape<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let byte = *self.bytes.next()?;
        if byte == b'\\' {
            self.bytes.next().copied()
        } else {
            Some(byte)
        }
    }
}

/// Index of the first unescaped byte matching `is_target`, or `data.len()`.
fn find_unescaped(data: &[u8], is_target: impl Fn(u8) -> bool) -> usize {
    let mut pos = 0;
    while pos < data.len() {
        let byte = data[pos];
        if byte == b'\\' {
            pos += 2;
            continue;
        }
        if is_target(byte) {
            return pos;
        }
        pos += 1;
    }
    data.len()
}

/// Splits a line on unescaped commas.
///
/// A trailing comma produces a final empty field; a line without commas is a
/// single field.
struct Fields<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a [u8]) -> Self {
        Self { rest: Some(line) }
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let rest = self.rest?;
        let end = find_unescaped(rest, |b| b == b',');
        if end < rest.len() {
            self.rest = Some(&rest[end + 1..]);
        } else {
            self.rest = None;
        }
        Some(&rest[..end])
    }
}

/// Incremental parser over one playlist buffer.
#[derive(Debug, Clone)]
pub struct PlaylistParser<'a> {
    src: &'a [u8],
    offset: usize,
}

impl<'a> PlaylistParser<'a> {
    /// Creates a parser positioned at the start of `src`.
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, offset: 0 }
    }

    /// Moves back to the start of the buffer.
    pub fn rewind(&mut self) {
        self.offset = 0;
    }

    /// Byte offset of the next unparsed line.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Parses the next line.
    ///
    /// Returns `None` once the buffer is exhausted. Lines end at an unescaped
    /// `\n`, `\r\n` or bare `\r`.
    pub fn parse_next(&mut self) -> Option<PlaylistLine<'a>> {
        if self.offset >= self.src.len() {
            return None;
        }

        let rest = &self.src[self.offset..];
        let end = find_unescaped(rest, |b| b == b'\n' || b == b'\r');
        let mut line = &rest[..end];

        let consumed = match rest.get(end) {
            Some(b'\r') if rest.get(end + 1) == Some(&b'\n') => end + 2,
            Some(b'\n') => {
                // an escaped \r directly before the \n is still part of the terminator
                if let Some(stripped) = line.strip_suffix(b"\r") {
                    line = stripped;
                }
                end + 1
            }
            Some(_) => end + 1,
            None => end,
        };
        self.offset += consumed;

        Some(PlaylistLine::parse(line))
    }

    /// Skips forward to the next [`LineKind::Track`] line.
    pub fn next_track(&mut self) -> Option<PlaylistLine<'a>> {
        self.find(|line| line.is_track())
    }
}

impl<'a> Iterator for PlaylistParser<'a> {
    type Item = PlaylistLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_next()
    }
}
