//! gbsrip playlist parser
//!
//! Parses the NEZ-style extended M3U playlists that ship alongside GBS rips.
//! Each track line carries the engine track number plus optional title and
//! timing information:
//!
//! ```text
//! # @TITLE Some Game
//! # @ARTIST Some Composer
//! song.gbs::GBS,0,Title Screen,1:30.500,-,10,2
//! song.gbs::GBS,$1A,Boss\, Part 2,2:05,0:12-,8
//! ```
//!
//! Fields are comma separated; a backslash escapes the following byte
//! (including commas and line terminators). Titles keep their escapes until
//! they are retrieved with [`PlaylistLine::title`].
//!
//! # Crate Structure
//!
//! - [`PlaylistParser`] - Line-at-a-time parser over one immutable buffer
//! - [`PlaylistLine`] - A classified line with its parsed fields
//! - [`PlaylistDirectives`] - Album-level `@TITLE`/`@ARTIST`/... comment tags
//!
//! # Example
//!
//! ```
//! use gbsrip_m3u::{LineKind, PlaylistParser};
//!
//! let text = b"# @TITLE Demo\nsong.gbs,0,Intro,0:45\n";
//! let mut parser = PlaylistParser::new(text);
//!
//! assert_eq!(parser.parse_next().unwrap().kind, LineKind::Comment);
//! let track = parser.parse_next().unwrap();
//! assert_eq!(track.kind, LineKind::Track);
//! assert_eq!(track.title().as_deref(), Some("Intro"));
//! assert_eq!(track.length_ms, Some(45_000));
//! ```

pub mod directives;
mod number;
pub mod parser;

pub use directives::{Directive, PlaylistDirectives};
pub use parser::{LineKind, PlaylistLine, PlaylistParser};
