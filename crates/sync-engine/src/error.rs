// crates/sync-engine/src/error.rs
//! Error types for sync and sweep runs

use scrobblecast_core::{SinkError, SourceError, StoreError, Watermark};
use thiserror::Error;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that end a sync or sweep run
#[derive(Debug, Error)]
pub enum SyncError {
    /// Listening history could not be fetched; nothing was persisted
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The timeline failed mid-run; progress up to `watermark` was saved
    #[error("{error} (progress saved at watermark {watermark})")]
    SinkUnavailable {
        #[source]
        error: SinkError,
        watermark: Watermark,
    },

    /// The timeline could not be listed
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The watermark could not be read or persisted
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Returns the watermark persisted before the failure, if any
    pub fn saved_watermark(&self) -> Option<Watermark> {
        match self {
            Self::SinkUnavailable { watermark, .. } => Some(*watermark),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_unavailable_display() {
        let err = SyncError::SinkUnavailable {
            error: SinkError::Unavailable("HTTP 503".to_string()),
            watermark: Watermark::new(1_700_000_000),
        };
        let text = err.to_string();
        assert!(text.contains("HTTP 503"));
        assert!(text.contains("1700000000"));
        assert_eq!(err.saved_watermark(), Some(Watermark::new(1_700_000_000)));
    }

    #[test]
    fn test_source_error_converts() {
        let err: SyncError = SourceError::Unavailable("dns".to_string()).into();
        assert!(matches!(err, SyncError::Source(_)));
        assert!(err.saved_watermark().is_none());
    }

    #[test]
    fn test_store_error_display() {
        let err: SyncError = StoreError::Write("disk full".to_string()).into();
        assert!(err.to_string().contains("disk full"));
    }
}
