//! Retention policy for the caller's own posts

use super::post::TimelinePost;
use chrono::{DateTime, Duration, Utc};

/// Decides which of the caller's own posts are old enough to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPolicy {
    /// Posts younger than this are always kept
    pub min_age: Duration,
    /// Lowercased tag names; empty means any post qualifies
    pub required_tags: Vec<String>,
    /// Keep posts that received any favourite or reblog
    pub exempt_if_engaged: bool,
    /// Stop after this many delete-candidates
    pub max_candidates: usize,
    /// Stop after scanning this many posts
    pub scan_limit: usize,
}

impl SweepPolicy {
    /// Creates a policy with the default scan budget
    pub fn new(min_age: Duration, required_tags: &[&str], exempt_if_engaged: bool) -> Self {
        Self {
            min_age,
            required_tags: required_tags.iter().map(|t| t.to_lowercase()).collect(),
            exempt_if_engaged,
            max_candidates: 20,
            scan_limit: 400,
        }
    }

    /// Sets the candidate budget
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Sets the scan budget
    pub fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit;
        self
    }

    /// Returns true if `post` should be deleted at time `now`
    pub fn is_candidate(&self, post: &TimelinePost, now: DateTime<Utc>) -> bool {
        if post.age_at(now) < self.min_age {
            return false;
        }

        if self.exempt_if_engaged && !post.engagement.is_untouched() {
            return false;
        }

        self.required_tags.is_empty() || self.required_tags.iter().any(|tag| post.has_tag(tag))
    }
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self::new(Duration::days(14), &["nowplaying"], true)
    }
}
