//! Core types for scrobblecast
//!
//! Shared by the adapters, the configuration layer and the sync engine:
//! listening events, timeline posts, the watermark and its store contract,
//! and the adapter error taxonomy.

pub mod error;
pub mod progress;
pub mod template;
pub mod types;

// Re-export commonly used types
pub use error::{
    ErrorSeverity, SinkError, SinkResult, SourceError, SourceResult, StoreError, StoreResult,
};
pub use progress::{MemoryProgressStore, ProgressStore};
pub use template::{PostTemplate, TemplateError, DEFAULT_TEMPLATE};
pub use types::{
    Engagement, ListeningEvent, PostId, SweepPolicy, TimelinePost, Visibility, Watermark,
};
