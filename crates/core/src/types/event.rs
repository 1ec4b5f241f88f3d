//! Listening events and the synchronization watermark

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scrobble: the user played a track at `timestamp`
///
/// Timestamps are unix seconds and unique per event for a given user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningEvent {
    /// Unix seconds when the track was played
    pub timestamp: i64,
    /// Track title
    pub track_title: String,
    /// Artist name, if the provider knows it
    pub artist_name: Option<String>,
    /// Link to the track page
    pub track_url: String,
}

impl ListeningEvent {
    /// Placeholder rendered when the provider has no artist
    pub const UNKNOWN_ARTIST: &'static str = "?";

    /// Creates a new listening event
    pub fn new(
        timestamp: i64,
        track_title: impl Into<String>,
        artist_name: Option<String>,
        track_url: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            track_title: track_title.into(),
            artist_name,
            track_url: track_url.into(),
        }
    }

    /// Returns the artist name, or `"?"` when unknown
    pub fn artist_display(&self) -> &str {
        self.artist_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(Self::UNKNOWN_ARTIST)
    }

    /// Returns true if this event is strictly newer than the watermark
    pub fn is_after(&self, watermark: Watermark) -> bool {
        self.timestamp > watermark.value()
    }
}

/// Timestamp of the newest listening event already mirrored
///
/// All events with `timestamp <= watermark` are considered processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watermark(i64);

impl Watermark {
    /// Value used when nothing has been persisted yet
    pub const INITIAL: Self = Self(1);

    /// Creates a watermark from unix seconds
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw unix-seconds value
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Moves the watermark forward to `timestamp`; never moves it back
    ///
    /// Returns true if the watermark changed.
    pub fn advance_to(&mut self, timestamp: i64) -> bool {
        if timestamp > self.0 {
            self.0 = timestamp;
            true
        } else {
            false
        }
    }
}

impl Default for Watermark {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Watermark {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
