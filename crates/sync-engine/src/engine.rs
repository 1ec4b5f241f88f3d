// crates/sync-engine/src/engine.rs
//! Main sync engine

use crate::error::{SyncError, SyncResult};
use scrobblecast_core::{PostId, PostTemplate, ProgressStore, Visibility, Watermark};
use scrobblecast_sinks::PostSink;
use scrobblecast_sources::EventSource;

/// Configuration for the sync engine
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Successful publishes allowed per run
    pub max_count: usize,
    /// Visibility of published posts
    pub visibility: Visibility,
    /// Post text template
    pub template: PostTemplate,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_count: 1,
            visibility: Visibility::Public,
            template: PostTemplate::default(),
        }
    }
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Watermark read at the start of the run
    pub starting_watermark: Watermark,
    /// Watermark persisted at the end of the run
    pub watermark: Watermark,
    /// Events returned by the source
    pub fetched: usize,
    /// Ids of posts created, in publish order
    pub published: Vec<PostId>,
    /// Events the timeline refused and that were skipped
    pub rejected: Vec<i64>,
    /// Events at or below the watermark that the source should not have sent
    pub stale: usize,
    /// Events left for a later run
    pub pending: usize,
}

impl SyncReport {
    fn new(starting_watermark: Watermark, fetched: usize) -> Self {
        Self {
            starting_watermark,
            watermark: starting_watermark,
            fetched,
            published: Vec::new(),
            rejected: Vec::new(),
            stale: 0,
            pending: 0,
        }
    }

    /// Returns true if the run changed nothing
    pub fn is_noop(&self) -> bool {
        self.published.is_empty() && self.watermark == self.starting_watermark
    }
}

/// Mirrors new listening events to the timeline
///
/// One run reads the watermark, fetches newer events, publishes up to
/// `max_count` of them oldest first and persists the advanced watermark
/// once at the end. A crash mid-run can therefore re-post events whose
/// publish succeeded but whose watermark was never written.
pub struct SyncEngine {
    config: SyncConfig,
}

impl SyncEngine {
    /// Creates a new sync engine
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Gets the engine configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Performs one sync run
    pub fn run(
        &self,
        source: &dyn EventSource,
        sink: &dyn PostSink,
        store: &mut dyn ProgressStore,
    ) -> SyncResult<SyncReport> {
        let start = store.get()?;
        log::info!("Fetching scrobbles newer than {}", start);

        let events = source.fetch_since(start)?;
        let mut report = SyncReport::new(start, events.len());
        let mut watermark = start;

        if events.is_empty() {
            log::info!("No new scrobbles");
            store.set(watermark)?;
            return Ok(report);
        }
        log::debug!("Fetched {} new scrobbles", events.len());

        let mut outage = None;
        for (index, event) in events.iter().enumerate() {
            if report.published.len() >= self.config.max_count {
                report.pending = events.len() - index;
                break;
            }

            if !event.is_after(watermark) {
                log::warn!("Ignoring scrobble at {} (not after {})", event.timestamp, watermark);
                report.stale += 1;
                continue;
            }

            let text = self.config.template.render(event);
            match sink.publish(&text, self.config.visibility) {
                Ok(id) => {
                    log::info!(
                        "Posted {} - {} as {}",
                        event.artist_display(),
                        event.track_title,
                        id
                    );
                    watermark.advance_to(event.timestamp);
                    report.published.push(id);
                }
                Err(error) if error.is_recoverable() => {
                    log::warn!("Skipping scrobble at {}: {}", event.timestamp, error);
                    watermark.advance_to(event.timestamp);
                    report.rejected.push(event.timestamp);
                }
                Err(error) => {
                    log::error!("Stopping at scrobble {}: {}", event.timestamp, error);
                    report.pending = events.len() - index;
                    outage = Some(error);
                    break;
                }
            }
        }

        store.set(watermark)?;
        report.watermark = watermark;
        log::info!("Watermark saved at {}", watermark);

        match outage {
            Some(error) => Err(SyncError::SinkUnavailable { error, watermark }),
            None => Ok(report),
        }
    }
}
