// FILE: crates/sinks/src/mastodon.rs

use crate::traits::collect_own_posts;
use crate::PostSink;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use scrobblecast_core::{Engagement, PostId, SinkError, SinkResult, TimelinePost, Visibility};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration as StdDuration;

/// Mastodon-compatible timeline, authenticated with a user access token
pub struct MastodonSink {
    instance: String,
    access_token: String,
    account_id: OnceLock<String>,
    client: reqwest::blocking::Client,
}

impl MastodonSink {
    /// Create a sink for `instance` (e.g. `https://example.social`)
    pub fn new(instance: impl Into<String>, access_token: impl Into<String>) -> SinkResult<Self> {
        Ok(Self {
            instance: instance.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            account_id: OnceLock::new(),
            client: build_client()?,
        })
    }

    /// Returns the instance base URL
    pub fn instance(&self) -> &str {
        &self.instance
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.instance, path)
    }

    /// Resolves (once) the account the token belongs to
    fn account_id(&self) -> SinkResult<&str> {
        if let Some(id) = self.account_id.get() {
            return Ok(id.as_str());
        }

        let response = self
            .client
            .get(self.url("/api/v1/accounts/verify_credentials"))
            .bearer_auth(&self.access_token)
            .send()
            .map_err(transport_error)?;
        let body = read_success(response)?;

        let account: RawAccount = serde_json::from_str(&body)
            .map_err(|e| SinkError::Parse(format!("account: {}", e)))?;
        log::debug!("Authenticated as account {} ({})", account.id, account.acct);

        Ok(self.account_id.get_or_init(|| account.id).as_str())
    }

    /// Fetches one page of the caller's statuses older than `max_id`
    fn statuses_page(
        &self,
        account_id: &str,
        max_id: Option<&PostId>,
        limit: usize,
    ) -> SinkResult<Vec<TimelinePost>> {
        let mut request = self
            .client
            .get(self.url(&format!("/api/v1/accounts/{}/statuses", account_id)))
            .bearer_auth(&self.access_token)
            .query(&[("limit", limit.to_string())]);
        if let Some(max_id) = max_id {
            request = request.query(&[("max_id", max_id.as_str())]);
        }

        let response = request.send().map_err(transport_error)?;
        let body = read_success(response)?;
        parse_statuses(&body)
    }
}

impl PostSink for MastodonSink {
    fn publish(&self, text: &str, visibility: Visibility) -> SinkResult<PostId> {
        let response = self
            .client
            .post(self.url("/api/v1/statuses"))
            .bearer_auth(&self.access_token)
            .json(&NewStatus {
                status: text,
                visibility: visibility.as_str(),
            })
            .send()
            .map_err(transport_error)?;
        let body = read_success(response)?;

        let created: RawCreated = serde_json::from_str(&body)
            .map_err(|e| SinkError::Parse(format!("created status: {}", e)))?;
        log::info!("Published status {}", created.id);
        Ok(PostId::new(created.id))
    }

    fn list_own_recent(&self, limit: usize) -> SinkResult<Vec<TimelinePost>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let account_id = self.account_id()?.to_string();
        collect_own_posts(limit, |max_id, page_limit| {
            self.statuses_page(&account_id, max_id, page_limit)
        })
    }

    fn delete(&self, post: &TimelinePost) -> SinkResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/v1/statuses/{}", post.id)))
            .bearer_auth(&self.access_token)
            .send()
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            log::debug!("Status {} already gone", post.id);
            return Ok(());
        }
        read_success(response)?;
        log::debug!("Deleted status {}", post.id);
        Ok(())
    }
}

pub(crate) fn build_client() -> SinkResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(StdDuration::from_secs(30))
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION"),
        ))
        .build()
        .map_err(|e| SinkError::Unavailable(format!("HTTP client not available: {}", e)))
}

pub(crate) fn transport_error(e: reqwest::Error) -> SinkError {
    SinkError::Unavailable(format!("Request failed: {}", e))
}

/// Returns the body of a 2xx response, or the classified error
pub(crate) fn read_success(response: reqwest::blocking::Response) -> SinkResult<String> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| SinkError::Unavailable(format!("Failed to read response: {}", e)))?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(classify_failure(status, &body))
    }
}

/// Maps a non-success response onto the sink error taxonomy
///
/// Validation failures (422, 400) only concern the submitted post; anything
/// else means the timeline is unusable for now.
pub fn classify_failure(status: StatusCode, body: &str) -> SinkError {
    let detail = serde_json::from_str::<RawError>(body)
        .ok()
        .and_then(|e| e.error_description.or(e.error))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
    let message = format!("HTTP {}: {}", status.as_u16(), detail);

    match status {
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => SinkError::Rejected(message),
        _ => SinkError::Unavailable(message),
    }
}

/// Decodes a list of statuses
pub fn parse_statuses(body: &str) -> SinkResult<Vec<TimelinePost>> {
    let raw: Vec<RawStatus> = serde_json::from_str(body)
        .map_err(|e| SinkError::Parse(format!("statuses: {}", e)))?;
    Ok(raw.into_iter().map(RawStatus::into_post).collect())
}

#[derive(Debug, Serialize)]
struct NewStatus<'a> {
    status: &'a str,
    visibility: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    id: String,
    #[serde(default)]
    acct: String,
}

#[derive(Debug, Deserialize)]
struct RawError {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    id: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    visibility: String,
    #[serde(default)]
    tags: Vec<RawTag>,
    #[serde(default)]
    favourites_count: u64,
    #[serde(default)]
    reblogs_count: u64,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    name: String,
}

impl RawStatus {
    fn into_post(self) -> TimelinePost {
        TimelinePost {
            id: PostId::new(self.id),
            created_at: self.created_at,
            visibility: self.visibility.parse().unwrap_or_default(),
            tags: self.tags.into_iter().map(|t| t.name).collect(),
            engagement: Engagement {
                favorites: self.favourites_count,
                reblogs: self.reblogs_count,
            },
        }
    }
}
