//! `[sync]` section: how listening events become posts

use crate::validation::{ConfigSection, ValidationError, Validator};
use scrobblecast_core::{PostTemplate, Visibility, DEFAULT_TEMPLATE};
use serde::{Deserialize, Serialize};

/// Upper bound for posts per run
pub const MAX_POSTS_PER_RUN: usize = 50;

/// Posting settings for the sync engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PostingConfig {
    /// Maximum number of posts published per run
    pub max_count: usize,

    /// Visibility of created posts
    pub visibility: Visibility,

    /// Post text template with {artist}, {title} and {url} placeholders
    pub template: String,
}

impl PostingConfig {
    /// Parses the configured template
    pub fn post_template(&self) -> Result<PostTemplate, ValidationError> {
        PostTemplate::parse(&self.template)
            .map_err(|e| ValidationError::with_value("sync.template", e.to_string(), &self.template))
    }
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            max_count: 1,
            visibility: Visibility::Public,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl ConfigSection for PostingConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let results = vec![
            Validator::in_range(self.max_count, 1, MAX_POSTS_PER_RUN, "sync.max_count"),
            Validator::not_empty(&self.template, "sync.template"),
            self.post_template().map(|_| ()),
        ];

        Validator::collect_errors(results)
    }

    fn section_name(&self) -> &'static str {
        "sync"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PostingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_count, 1);
        assert_eq!(config.visibility, Visibility::Public);
    }

    #[test]
    fn test_zero_max_count_rejected() {
        let config = PostingConfig {
            max_count: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors[0].field, "sync.max_count");
    }

    #[test]
    fn test_bad_template_rejected() {
        let config = PostingConfig {
            template: "{album} by {artist}".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "sync.template"));
    }
}
