//! Album-level tags embedded in leading playlist comments.
//!
//! Rippers put album information in the comment block at the top of a
//! playlist using `@MARKER` directives:
//!
//! ```text
//! # Some Game (GBS)
//! # @ARTIST: Some Composer
//! # @DATE 1998
//! ```
//!
//! A first comment line without any marker is taken as the album title
//! unless an explicit `@TITLE` is present.

use crate::parser::{LineKind, PlaylistParser};

/// A recognized comment directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `@TITLE` - album title.
    Title,
    /// `@ARTIST` - performing artist.
    Artist,
    /// `@COMPOSER` - composer.
    Composer,
    /// `@DATE` - release date.
    Date,
    /// `@RIPPER` - who ripped the music.
    Ripper,
    /// `@TAGGER` - who wrote the playlist.
    Tagger,
}

impl Directive {
    /// All directives, in matching priority order.
    pub const ALL: [Directive; 6] = [
        Directive::Title,
        Directive::Artist,
        Directive::Composer,
        Directive::Date,
        Directive::Ripper,
        Directive::Tagger,
    ];

    /// The case-sensitive marker text.
    pub fn marker(&self) -> &'static str {
        match self {
            Directive::Title => "@TITLE",
            Directive::Artist => "@ARTIST",
            Directive::Composer => "@COMPOSER",
            Directive::Date => "@DATE",
            Directive::Ripper => "@RIPPER",
            Directive::Tagger => "@TAGGER",
        }
    }

    /// Finds the first directive in `text` and returns it with its value.
    ///
    /// After the marker a single `:` or `@` is skipped, then spaces.
    pub fn find_in(text: &str) -> Option<(Directive, &str)> {
        Directive::ALL.iter().find_map(|&directive| {
            let marker = directive.marker();
            let start = text.find(marker)? + marker.len();
            let rest = &text[start..];
            let rest = rest
                .strip_prefix(':')
                .or_else(|| rest.strip_prefix('@'))
                .unwrap_or(rest);
            Some((directive, rest.trim_start_matches(' ')))
        })
    }
}

/// Album metadata collected from the leading comment block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistDirectives {
    /// Album title.
    pub title: Option<String>,
    /// Artist.
    pub artist: Option<String>,
    /// Composer.
    pub composer: Option<String>,
    /// Release date.
    pub date: Option<String>,
    /// Ripper credit.
    pub ripper: Option<String>,
    /// Tagger credit.
    pub tagger: Option<String>,
}

impl PlaylistDirectives {
    /// Scans comment lines from the start of `src` up to the first
    /// non-comment line.
    pub fn scan(src: &[u8]) -> Self {
        let mut directives = Self::default();
        let mut plain_title = None;

        for (index, line) in PlaylistParser::new(src).enumerate() {
            if line.kind != LineKind::Comment {
                break;
            }
            let text = String::from_utf8_lossy(line.line);

            match Directive::find_in(&text) {
                Some((_, "")) => {}
                Some((directive, value)) => {
                    *directives.slot_mut(directive) = Some(value.to_string());
                }
                None if index == 0 => {
                    let value = text.trim_start_matches('#').trim_start_matches(' ');
                    if !value.is_empty() {
                        plain_title = Some(value.to_string());
                    }
                }
                None => {}
            }
        }

        if directives.title.is_none() {
            directives.title = plain_title;
        }
        directives
    }

    /// Returns the value stored for `directive`.
    pub fn get(&self, directive: Directive) -> Option<&str> {
        match directive {
            Directive::Title => self.title.as_deref(),
            Directive::Artist => self.artist.as_deref(),
            Directive::Composer => self.composer.as_deref(),
            Directive::Date => self.date.as_deref(),
            Directive::Ripper => self.ripper.as_deref(),
            Directive::Tagger => self.tagger.as_deref(),
        }
    }

    fn slot_mut(&mut self, directive: Directive) -> &mut Option<String> {
        match directive {
            Directive::Title => &mut self.title,
            Directive::Artist => &mut self.artist,
            Directive::Composer => &mut self.composer,
            Directive::Date => &mut self.date,
            Directive::Ripper => &mut self.ripper,
            Directive::Tagger => &mut self.tagger,
        }
    }

    /// True when no directive was found.
    pub fn is_empty(&self) -> bool {
        Directive::ALL.iter().all(|&d| self.get(d).is_none())
    }
}
