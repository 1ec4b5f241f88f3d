// FILE: crates/sources/src/memory.rs

use crate::traits::normalize_events;
use crate::{EventSource, SourceMetadata};
use scrobblecast_core::{ListeningEvent, SourceError, SourceResult, Watermark};
use std::sync::{Arc, Mutex};

/// In-memory listening history
///
/// Clones share the same history, so a test can keep a handle, `push` new
/// scrobbles between runs and inspect how often the engine fetched.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    events: Vec<ListeningEvent>,
    failure: Option<SourceError>,
    fetches: Vec<Watermark>,
}

impl MemorySource {
    /// Creates an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source holding `events` in any order
    pub fn with_events(events: Vec<ListeningEvent>) -> Self {
        let source = Self::new();
        for event in events {
            source.push(event);
        }
        source
    }

    /// Records a new scrobble
    pub fn push(&self, event: ListeningEvent) {
        if let Ok(mut state) = self.inner.lock() {
            state.events.push(event);
        }
    }

    /// Makes every following fetch fail with `error`; `None` clears it
    pub fn set_failure(&self, error: Option<SourceError>) {
        if let Ok(mut state) = self.inner.lock() {
            state.failure = error;
        }
    }

    /// Watermarks passed to `fetch_since`, in call order
    pub fn fetches(&self) -> Vec<Watermark> {
        self.inner
            .lock()
            .map(|s| s.fetches.clone())
            .unwrap_or_default()
    }
}

impl EventSource for MemorySource {
    fn fetch_since(&self, watermark: Watermark) -> SourceResult<Vec<ListeningEvent>> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| SourceError::Unavailable("Lock poisoned".to_string()))?;
        state.fetches.push(watermark);

        if let Some(error) = &state.failure {
            return Err(error.clone());
        }

        Ok(normalize_events(state.events.clone(), watermark))
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "In-memory history".to_string(),
            base_url: String::new(),
            user: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(ts: i64) -> ListeningEvent {
        ListeningEvent::new(ts, "Song", Some("Artist".to_string()), "http://x")
    }

    #[test]
    fn test_fetch_since_is_strict_and_ordered() {
        let source = MemorySource::with_events(vec![event(12), event(5), event(9)]);
        let events = source.fetch_since(Watermark::new(5)).unwrap();
        let stamps: Vec<i64> = events.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![9, 12]);
    }

    #[test]
    fn test_empty_result_is_ok() {
        let source = MemorySource::new();
        assert!(source.fetch_since(Watermark::INITIAL).unwrap().is_empty());
    }

    #[test]
    fn test_failure_injection() {
        let source = MemorySource::with_events(vec![event(10)]);
        source.set_failure(Some(SourceError::Unavailable("offline".to_string())));
        assert!(source.fetch_since(Watermark::INITIAL).is_err());

        source.set_failure(None);
        assert_eq!(source.fetch_since(Watermark::INITIAL).unwrap().len(), 1);
        assert_eq!(source.fetches().len(), 2);
    }

    #[test]
    fn test_clones_share_history() {
        let source = MemorySource::new();
        let handle = source.clone();
        handle.push(event(42));
        assert_eq!(source.fetch_since(Watermark::INITIAL).unwrap().len(), 1);
    }
}
