// FILE: crates/sinks/src/memory.rs

use crate::traits::collect_own_posts;
use crate::PostSink;
use chrono::{DateTime, Utc};
use scrobblecast_core::{
    Engagement, PostId, SinkError, SinkResult, TimelinePost, Visibility,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A post created through [`MemorySink::publish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub id: PostId,
    pub text: String,
    pub visibility: Visibility,
}

/// In-memory timeline with scripted failures
///
/// Clones share state. Publish failures are keyed by the zero-based index of
/// the publish call, delete failures by post id.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<MemoryTimeline>>,
}

#[derive(Debug, Default)]
struct MemoryTimeline {
    posts: Vec<TimelinePost>,
    published: Vec<PublishedPost>,
    deleted: Vec<PostId>,
    publish_calls: usize,
    next_id: u64,
    publish_failures: HashMap<usize, SinkError>,
    delete_failures: HashMap<PostId, SinkError>,
    listing_failure: Option<SinkError>,
}

impl MemorySink {
    /// Creates an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryTimeline) -> T) -> SinkResult<T> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| SinkError::Unavailable("Lock poisoned".to_string()))?;
        Ok(f(&mut state))
    }

    /// Adds an existing post, e.g. an old now-playing status
    pub fn insert_post(&self, post: TimelinePost) {
        let _ = self.with_state(|s| s.posts.push(post));
    }

    /// Makes the publish call with index `call` fail with `error`
    pub fn fail_publish_on(&self, call: usize, error: SinkError) {
        let _ = self.with_state(|s| s.publish_failures.insert(call, error));
    }

    /// Makes deleting `id` fail with `error`
    pub fn fail_delete_of(&self, id: PostId, error: SinkError) {
        let _ = self.with_state(|s| s.delete_failures.insert(id, error));
    }

    /// Makes listing fail with `error`; `None` clears it
    pub fn set_listing_failure(&self, error: Option<SinkError>) {
        let _ = self.with_state(|s| s.listing_failure = error);
    }

    /// Posts successfully published, oldest first
    pub fn published(&self) -> Vec<PublishedPost> {
        self.with_state(|s| s.published.clone()).unwrap_or_default()
    }

    /// Ids of posts deleted, in deletion order
    pub fn deleted(&self) -> Vec<PostId> {
        self.with_state(|s| s.deleted.clone()).unwrap_or_default()
    }

    /// Ids of posts still on the timeline, newest first
    pub fn remaining(&self) -> Vec<PostId> {
        self.with_state(|s| {
            let mut posts = s.posts.clone();
            sort_newest_first(&mut posts);
            posts.into_iter().map(|p| p.id).collect()
        })
        .unwrap_or_default()
    }

    /// Number of publish attempts, successful or not
    pub fn publish_attempts(&self) -> usize {
        self.with_state(|s| s.publish_calls).unwrap_or_default()
    }

    /// Listing page of posts strictly older than `max_id`
    fn page(&self, max_id: Option<&PostId>, page_limit: usize) -> SinkResult<Vec<TimelinePost>> {
        self.with_state(|s| {
            let mut posts = s.posts.clone();
            sort_newest_first(&mut posts);
            let start = match max_id {
                Some(id) => posts
                    .iter()
                    .position(|p| &p.id == id)
                    .map(|i| i + 1)
                    .unwrap_or(posts.len()),
                None => 0,
            };
            posts.into_iter().skip(start).take(page_limit).collect()
        })
    }
}

fn sort_newest_first(posts: &mut [TimelinePost]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

impl PostSink for MemorySink {
    fn publish(&self, text: &str, visibility: Visibility) -> SinkResult<PostId> {
        self.with_state(|s| {
            let call = s.publish_calls;
            s.publish_calls += 1;

            if let Some(error) = s.publish_failures.remove(&call) {
                return Err(error);
            }

            s.next_id += 1;
            let id = PostId::new(format!("mem-{}", s.next_id));
            let now: DateTime<Utc> = Utc::now();
            s.posts.push(TimelinePost {
                id: id.clone(),
                created_at: now,
                visibility,
                tags: extract_tags(text),
                engagement: Engagement::default(),
            });
            s.published.push(PublishedPost {
                id: id.clone(),
                text: text.to_string(),
                visibility,
            });
            Ok(id)
        })?
    }

    fn list_own_recent(&self, limit: usize) -> SinkResult<Vec<TimelinePost>> {
        if let Some(error) = self.with_state(|s| s.listing_failure.clone())? {
            return Err(error);
        }
        collect_own_posts(limit, |max_id, page_limit| self.page(max_id, page_limit))
    }

    fn delete(&self, post: &TimelinePost) -> SinkResult<()> {
        self.with_state(|s| {
            if let Some(error) = s.delete_failures.get(&post.id) {
                return Err(error.clone());
            }
            // Already-deleted posts are fine: the goal state holds
            s.posts.retain(|p| p.id != post.id);
            s.deleted.push(post.id.clone());
            Ok(())
        })?
    }
}

/// Hashtags in `text`, lowercased, without the `#`
fn extract_tags(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|word| word.strip_prefix('#'))
        .map(|tag| {
            tag.trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_')
                .to_lowercase()
        })
        .filter(|tag| !tag.is_empty())
        .collect()
}
