//! Error taxonomy shared by the adapters and the engine
//!
//! Every adapter failure falls into one of two severity tiers:
//! - **Recoverable**: affects a single item (one publish, one delete); the
//!   surrounding loop logs it and moves on.
//! - **Fatal**: transport or authorization trouble; the current phase stops
//!   and the error is surfaced to the operator. Nothing retries internally.

use std::fmt;
use thiserror::Error;

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Only the current item is affected
    Recoverable,
    /// The current phase must stop
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Result type for listening-history operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised by an event source adapter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Transport or authorization failure talking to the provider
    #[error("Listening source unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with an API-level error
    #[error("Listening source error {code}: {message}")]
    Api { code: i64, message: String },

    /// The provider answered with a payload we could not understand
    #[error("Failed to parse listening history: {0}")]
    Parse(String),
}

impl SourceError {
    /// Every source failure aborts the fetch phase
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    /// Returns true for transport/auth failures
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result type for timeline operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors raised by a post sink adapter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The timeline refused this particular post (length limits, validation)
    #[error("Post rejected: {0}")]
    Rejected(String),

    /// Transport or authorization failure talking to the timeline
    #[error("Timeline unavailable: {0}")]
    Unavailable(String),

    /// The timeline answered with a payload we could not understand
    #[error("Failed to parse timeline response: {0}")]
    Parse(String),
}

impl SinkError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rejected(_) => ErrorSeverity::Recoverable,
            Self::Unavailable(_) | Self::Parse(_) => ErrorSeverity::Fatal,
        }
    }

    /// Returns true if only the current item is affected
    pub fn is_recoverable(&self) -> bool {
        self.severity() == ErrorSeverity::Recoverable
    }
}

/// Result type for watermark persistence
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while reading or persisting the watermark
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage could not be read
    #[error("Failed to read progress marker: {0}")]
    Read(String),

    /// Underlying storage could not be written
    #[error("Failed to persist progress marker: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_is_recoverable() {
        let err = SinkError::Rejected("text too long".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_unavailable_is_fatal() {
        let err = SinkError::Unavailable("connection refused".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_source_errors_are_fatal() {
        let err = SourceError::Api {
            code: 6,
            message: "User not found".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(!err.is_unavailable());
        assert!(SourceError::Unavailable("dns".to_string()).is_unavailable());
    }

    #[test]
    fn test_error_display() {
        let err = SourceError::Api {
            code: 29,
            message: "Rate limit exceeded".to_string(),
        };
        assert!(err.to_string().contains("29"));
        assert!(err.to_string().contains("Rate limit"));

        let err = StoreError::Write("disk full".to_string());
        assert!(err.to_string().contains("persist"));
    }
}
