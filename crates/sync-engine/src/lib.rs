// crates/sync-engine/src/lib.rs
//! Scrobble-to-timeline synchronization
//!
//! Two passes share the adapter seams from the sources and sinks crates:
//! - [`RetentionSweeper`] deletes old now-playing posts
//! - [`SyncEngine`] posts new scrobbles and advances the watermark
//!
//! # Example
//!
//! ```rust
//! use scrobblecast_core::{ListeningEvent, MemoryProgressStore, ProgressStore, Watermark};
//! use scrobblecast_sinks::MemorySink;
//! use scrobblecast_sources::MemorySource;
//! use scrobblecast_sync_engine::{SyncConfig, SyncEngine};
//!
//! let source = MemorySource::with_events(vec![ListeningEvent::new(
//!     1_700_000_000,
//!     "Song",
//!     Some("Artist".to_string()),
//!     "https://www.last.fm/music/Artist/_/Song",
//! )]);
//! let sink = MemorySink::new();
//! let mut store = MemoryProgressStore::new();
//!
//! let engine = SyncEngine::new(SyncConfig::default());
//! let report = engine.run(&source, &sink, &mut store).unwrap();
//!
//! assert_eq!(report.published.len(), 1);
//! assert_eq!(store.get().unwrap(), Watermark::new(1_700_000_000));
//! ```

mod engine;
mod error;
mod sweeper;

pub use engine::{SyncConfig, SyncEngine, SyncReport};
pub use error::{SyncError, SyncResult};
pub use sweeper::{RetentionSweeper, SweepFailure, SweepReport};
