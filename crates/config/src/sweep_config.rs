//! `[sweep]` section: retention of old now-playing posts

use crate::validation::{ConfigSection, ValidationError, Validator};
use chrono::Duration;
use scrobblecast_core::SweepPolicy;
use serde::{Deserialize, Serialize};

/// Retention sweep settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweepConfig {
    /// Run the sweep before syncing
    pub enabled: bool,

    /// Minimum post age in days before deletion
    pub min_age_days: u32,

    /// Only posts carrying one of these tags are deleted (empty = any)
    pub required_tags: Vec<String>,

    /// Keep posts that were favourited or reblogged
    pub exempt_if_engaged: bool,

    /// Maximum deletions per run
    pub max_candidates: usize,

    /// Maximum number of own posts inspected per run
    pub scan_limit: usize,
}

impl SweepConfig {
    /// Builds the retention policy described by this section
    pub fn policy(&self) -> SweepPolicy {
        let tags: Vec<&str> = self.required_tags.iter().map(String::as_str).collect();
        SweepPolicy::new(
            Duration::days(i64::from(self.min_age_days)),
            &tags,
            self.exempt_if_engaged,
        )
        .with_max_candidates(self.max_candidates)
        .with_scan_limit(self.scan_limit)
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_age_days: 14,
            required_tags: vec!["nowplaying".to_string()],
            exempt_if_engaged: true,
            max_candidates: 20,
            scan_limit: 400,
        }
    }
}

impl ConfigSection for SweepConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::in_range(self.min_age_days, 0, 3650, "sweep.min_age_days"),
            Validator::in_range(self.max_candidates, 1, 1000, "sweep.max_candidates"),
            Validator::in_range(self.scan_limit, 1, 10_000, "sweep.scan_limit"),
        ];

        for tag in &self.required_tags {
            results.push(Validator::not_empty(tag, "sweep.required_tags"));
        }

        Validator::collect_errors(results)
    }

    fn section_name(&self) -> &'static str {
        "sweep"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = SweepConfig::default().policy();
        assert_eq!(policy, SweepPolicy::default());
    }

    #[test]
    fn test_policy_lowercases_tags() {
        let config = SweepConfig {
            required_tags: vec!["NowPlaying".to_string()],
            ..Default::default()
        };
        assert_eq!(config.policy().required_tags, vec!["nowplaying".to_string()]);
    }

    #[test]
    fn test_empty_tag_rejected() {
        let config = SweepConfig {
            required_tags: vec![String::new()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_scan_limit_rejected() {
        let config = SweepConfig {
            scan_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
