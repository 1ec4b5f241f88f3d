//! Post text templates
//!
//! A template is plain text with `{artist}`, `{title}` and `{url}`
//! placeholders. `{{` and `}}` produce literal braces.

use crate::types::ListeningEvent;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Template used when the configuration does not provide one
pub const DEFAULT_TEMPLATE: &str = "#NowPlaying\n\n{artist} - \"{title}\"\n\nSong info: {url}\n#bot #np #fediplay #timelinemute";

/// Errors found while parsing a template
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown placeholder '{{{0}}}' (expected artist, title or url)")]
    UnknownPlaceholder(String),

    #[error("Unclosed placeholder starting at byte {0}")]
    Unclosed(usize),

    #[error("Unmatched '}}' at byte {0}")]
    UnmatchedClose(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Artist,
    Title,
    Url,
}

/// A parsed post template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PostTemplate {
    /// Parses a template string
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed(pos));
                    }

                    let segment = match name.trim() {
                        "artist" => Segment::Artist,
                        "title" => Segment::Title,
                        "url" => Segment::Url,
                        _ => return Err(TemplateError::UnknownPlaceholder(name)),
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                }
                '}' => return Err(TemplateError::UnmatchedClose(pos)),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Renders the post text for a listening event
    pub fn render(&self, event: &ListeningEvent) -> String {
        let mut out = String::with_capacity(self.source.len() + 64);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Artist => out.push_str(event.artist_display()),
                Segment::Title => out.push_str(&event.track_title),
                Segment::Url => out.push_str(&event.track_url),
            }
        }
        out
    }

    /// Returns the original template text
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for PostTemplate {
    fn default() -> Self {
        // DEFAULT_TEMPLATE is covered by test_default_template_parses
        Self::parse(DEFAULT_TEMPLATE).unwrap_or_else(|_| Self {
            source: String::new(),
            segments: Vec::new(),
        })
    }
}

impl FromStr for PostTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PostTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
