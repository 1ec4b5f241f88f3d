// crates/sync-engine/src/sweeper.rs
//! Retention pass over the caller's own posts

use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Utc};
use scrobblecast_core::{PostId, SinkError, SweepPolicy};
use scrobblecast_sinks::PostSink;

/// A delete that failed; the sweep carried on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub post: PostId,
    pub error: SinkError,
}

/// What a sweep did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Posts evaluated
    pub scanned: usize,
    /// Posts that did not qualify for deletion
    pub kept: usize,
    /// Posts deleted, newest first
    pub deleted: Vec<PostId>,
    /// Candidates whose delete failed
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    /// Delete-candidates seen, deleted or not
    pub fn candidates(&self) -> usize {
        self.deleted.len() + self.failures.len()
    }

    /// Returns true if every candidate was deleted
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Deletes old posts that match a [`SweepPolicy`]
pub struct RetentionSweeper {
    policy: SweepPolicy,
}

impl RetentionSweeper {
    pub fn new(policy: SweepPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SweepPolicy {
        &self.policy
    }

    /// Sweeps relative to the current time
    pub fn sweep(&self, sink: &dyn PostSink) -> SyncResult<SweepReport> {
        self.sweep_at(sink, Utc::now())
    }

    /// Sweeps with post ages measured at `now`
    ///
    /// Scans at most `scan_limit` posts newest first and stops once
    /// `max_candidates` candidates have been handled. Only a listing failure
    /// ends the sweep early.
    pub fn sweep_at(&self, sink: &dyn PostSink, now: DateTime<Utc>) -> SyncResult<SweepReport> {
        let mut report = SweepReport::default();
        if self.policy.max_candidates == 0 {
            return Ok(report);
        }

        log::info!("Cleaning up old posts...");
        let posts = sink
            .list_own_recent(self.policy.scan_limit)
            .map_err(SyncError::Sink)?;

        for post in posts {
            report.scanned += 1;

            if !self.policy.is_candidate(&post, now) {
                report.kept += 1;
                continue;
            }

            match sink.delete(&post) {
                Ok(()) => {
                    log::debug!("Deleted {} from {}", post.id, post.created_at);
                    report.deleted.push(post.id);
                }
                Err(error) => {
                    log::warn!("Could not delete {}: {}", post.id, error);
                    report.failures.push(SweepFailure {
                        post: post.id,
                        error,
                    });
                }
            }

            if report.candidates() >= self.policy.max_candidates {
                log::debug!("Candidate budget reached");
                break;
            }
        }

        log::info!(
            "Sweep done: {} scanned, {} deleted, {} failed",
            report.scanned,
            report.deleted.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use scrobblecast_core::{Engagement, TimelinePost, Visibility};
    use scrobblecast_sinks::MemorySink;

    fn post(id: &str, now: DateTime<Utc>, days: i64, tags: &[&str]) -> TimelinePost {
        TimelinePost {
            id: PostId::new(id),
            created_at: now - Duration::days(days),
            visibility: Visibility::Public,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            engagement: Engagement::default(),
        }
    }

    #[test]
    fn test_untagged_posts_are_kept() {
        let now = Utc::now();
        let sink = MemorySink::new();
        sink.insert_post(post("tagged", now, 30, &["NowPlaying"]));
        sink.insert_post(post("personal", now, 30, &[]));

        let report = RetentionSweeper::new(SweepPolicy::default())
            .sweep_at(&sink, now)
            .unwrap();

        assert_eq!(report.deleted, vec![PostId::new("tagged")]);
        assert_eq!(report.kept, 1);
        assert_eq!(sink.remaining(), vec![PostId::new("personal")]);
    }

    #[test]
    fn test_age_boundary_is_inclusive() {
        let now = Utc::now();
        let sink = MemorySink::new();
        sink.insert_post(post("exact", now, 14, &["nowplaying"]));

        let report = RetentionSweeper::new(SweepPolicy::default())
            .sweep_at(&sink, now)
            .unwrap();

        assert_eq!(report.deleted.len(), 1);
    }

    #[test]
    fn test_candidate_budget() {
        let now = Utc::now();
        let sink = MemorySink::new();
        for day in 15..25 {
            sink.insert_post(post(&format!("p{day}"), now, day, &["nowplaying"]));
        }

        let policy = SweepPolicy::default().with_max_candidates(3);
        let report = RetentionSweeper::new(policy).sweep_at(&sink, now).unwrap();

        assert_eq!(
            report.deleted,
            vec![PostId::new("p15"), PostId::new("p16"), PostId::new("p17")]
        );
        assert_eq!(sink.remaining().len(), 7);
    }

    #[test]
    fn test_zero_budget_lists_nothing() {
        let sink = MemorySink::new();
        sink.set_listing_failure(Some(SinkError::Unavailable("down".to_string())));

        let policy = SweepPolicy::default().with_max_candidates(0);
        let report = RetentionSweeper::new(policy).sweep(&sink).unwrap();
        assert_eq!(report, SweepReport::default());
    }
}
