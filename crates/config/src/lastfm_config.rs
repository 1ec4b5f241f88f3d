//! `[lastfm]` section: whose history to mirror and how far we got

use crate::validation::{ConfigSection, ValidationError};
use scrobblecast_core::Watermark;
use serde::{Deserialize, Serialize};

/// Listening-history settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LastFmConfig {
    /// Account whose scrobbles are mirrored
    pub user: String,

    /// Timestamp of the newest scrobble already posted
    pub last_timestamp: Watermark,
}

impl ConfigSection for LastFmConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        if self.last_timestamp.value() < 0 {
            return Err(vec![ValidationError::with_value(
                "lastfm.last_timestamp",
                "must not be negative",
                self.last_timestamp,
            )]);
        }
        Ok(())
    }

    fn section_name(&self) -> &'static str {
        "lastfm"
    }
}
