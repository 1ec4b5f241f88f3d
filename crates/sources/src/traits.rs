// FILE: src/traits.rs
// ============================================================================

use scrobblecast_core::{ListeningEvent, SourceResult, Watermark};

/// A remote listening-history provider
pub trait EventSource: Send + Sync {
    /// Returns every event strictly newer than `watermark`, oldest first
    ///
    /// An empty result is not an error. Paging against the provider is the
    /// implementation's business; callers see one ordered sequence.
    fn fetch_since(&self, watermark: Watermark) -> SourceResult<Vec<ListeningEvent>>;

    /// Get metadata about the source
    fn metadata(&self) -> SourceMetadata;
}

/// Source metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    pub name: String,
    pub base_url: String,
    pub user: String,
}

/// Puts events into the order the engine expects: strictly after
/// `watermark`, ascending, one event per timestamp
pub fn normalize_events(mut events: Vec<ListeningEvent>, watermark: Watermark) -> Vec<ListeningEvent> {
    events.retain(|e| e.is_after(watermark));
    events.sort_by_key(|e| e.timestamp);
    events.dedup_by_key(|e| e.timestamp);
    events
}
