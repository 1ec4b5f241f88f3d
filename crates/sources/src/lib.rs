// FILE: crates/sources/src/lib.rs
//! Listening-history adapters
//!
//! [`EventSource`] is the seam the sync engine depends on. [`LastFmSource`]
//! talks to the real service; [`MemorySource`] stands in for it in tests.

mod lastfm;
mod memory;
mod traits;

pub use lastfm::{collect_pages, parse_recent_tracks, LastFmSource, RecentTracksPage};
pub use memory::MemorySource;
pub use traits::{normalize_events, EventSource, SourceMetadata};

// Re-export the error taxonomy so adapters and callers share one import path
pub use scrobblecast_core::{SourceError, SourceResult};
