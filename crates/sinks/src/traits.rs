// FILE: crates/sinks/src/traits.rs

use scrobblecast_core::{PostId, SinkResult, TimelinePost, Visibility};

/// A remote timeline the caller can post to and tidy up
pub trait PostSink: Send + Sync {
    /// Creates a post and returns its identifier
    ///
    /// Fails with `SinkError::Rejected` when the timeline refuses this post,
    /// `SinkError::Unavailable` on transport or auth trouble.
    fn publish(&self, text: &str, visibility: Visibility) -> SinkResult<PostId>;

    /// Returns at most `limit` of the caller's own posts, newest first
    fn list_own_recent(&self, limit: usize) -> SinkResult<Vec<TimelinePost>>;

    /// Deletes one of the caller's posts; a post that is already gone counts
    /// as deleted
    fn delete(&self, post: &TimelinePost) -> SinkResult<()>;
}

/// Posts requested per listing page
pub const PAGE_SIZE: usize = 40;

/// Pages backwards through a newest-first timeline
///
/// `fetch(max_id, page_limit)` returns the page strictly older than `max_id`
/// (or the newest page for `None`). Stops when `limit` posts are collected or
/// a page comes back empty.
pub fn collect_own_posts<F>(limit: usize, mut fetch: F) -> SinkResult<Vec<TimelinePost>>
where
    F: FnMut(Option<&PostId>, usize) -> SinkResult<Vec<TimelinePost>>,
{
    let mut posts: Vec<TimelinePost> = Vec::new();
    let mut max_id: Option<PostId> = None;

    while posts.len() < limit {
        let page_limit = PAGE_SIZE.min(limit - posts.len());
        let page = fetch(max_id.as_ref(), page_limit)?;

        let Some(last) = page.last() else {
            break;
        };
        if max_id.as_ref() == Some(&last.id) {
            // Provider ignored max_id; bail out instead of looping forever
            break;
        }
        max_id = Some(last.id.clone());

        let remaining = limit - posts.len();
        posts.extend(page.into_iter().take(remaining));
    }

    Ok(posts)
}
