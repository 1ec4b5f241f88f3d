//! `[mastodon]` section: the user-level session token

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Timeline session settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MastodonConfig {
    /// Token obtained from the first interactive login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl MastodonConfig {
    /// Returns the token if one has been stored
    pub fn token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

impl ConfigSection for MastodonConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = Vec::new();
        if let Some(token) = &self.access_token {
            results.push(Validator::not_empty(token, "mastodon.access_token"));
        }
        Validator::collect_errors(results)
    }

    fn section_name(&self) -> &'static str {
        "mastodon"
    }
}
