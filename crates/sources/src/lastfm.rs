// FILE: crates/sources/src/lastfm.rs

use crate::traits::normalize_events;
use crate::{EventSource, SourceMetadata};
use scrobblecast_core::{ListeningEvent, SourceError, SourceResult, Watermark};
use serde::Deserialize;
use std::time::Duration as StdDuration;

/// Last.fm scrobble history for one user
pub struct LastFmSource {
    base_url: String,
    api_key: String,
    user: String,
    page_size: u32,
    max_pages: u32,
    client: reqwest::blocking::Client,
}

impl LastFmSource {
    const API_BASE: &'static str = "https://ws.audioscrobbler.com/2.0/";

    /// Largest page the API hands out
    pub const MAX_PAGE_SIZE: u32 = 200;

    /// Create a new Last.fm source with HTTP client
    pub fn new(api_key: impl Into<String>, user: impl Into<String>) -> SourceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(StdDuration::from_secs(30))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))
            .build()
            .map_err(|e| SourceError::Unavailable(format!("HTTP client not available: {}", e)))?;

        Ok(Self {
            base_url: Self::API_BASE.to_string(),
            api_key: api_key.into(),
            user: user.into(),
            page_size: Self::MAX_PAGE_SIZE,
            max_pages: 50,
            client,
        })
    }

    /// Points the source at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Caps how many pages a single fetch may walk
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Fetch one page of `user.getrecenttracks` between `from` and `to`
    fn fetch_page(
        &self,
        from: Watermark,
        to: Option<i64>,
        page: u32,
    ) -> SourceResult<RecentTracksPage> {
        let from = from.value().to_string();
        let limit = self.page_size.to_string();
        let page_param = page.to_string();

        let mut request = self
            .client
            .get(&self.base_url)
            .query(&[
                ("method", "user.getrecenttracks"),
                ("user", self.user.as_str()),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("from", from.as_str()),
                ("limit", limit.as_str()),
                ("page", page_param.as_str()),
            ]);
        if let Some(to) = to {
            request = request.query(&[("to", to.to_string())]);
        }

        let response = request
            .send()
            .map_err(|e| SourceError::Unavailable(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SourceError::Unavailable(format!("Failed to read response: {}", e)))?;

        // API errors come back as JSON with 4xx statuses, so parse before
        // looking at the status code
        match parse_recent_tracks(&body) {
            Ok(page) => Ok(page),
            Err(SourceError::Parse(_)) if !status.is_success() => Err(SourceError::Unavailable(
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            )),
            Err(e) => Err(e),
        }
    }
}

impl EventSource for LastFmSource {
    fn fetch_since(&self, watermark: Watermark) -> SourceResult<Vec<ListeningEvent>> {
        log::debug!(
            "Fetching scrobbles for {} since {}",
            self.user,
            watermark
        );
        let events = collect_pages(self.max_pages, |page, to| {
            self.fetch_page(watermark, to, page)
        })?;
        let events = normalize_events(events, watermark);
        log::info!("Found {} new scrobble(s) for {}", events.len(), self.user);
        Ok(events)
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Last.fm".to_string(),
            base_url: self.base_url.clone(),
            user: self.user.clone(),
        }
    }
}

/// One decoded page of recent tracks
#[derive(Debug, Clone, PartialEq)]
pub struct RecentTracksPage {
    pub page: u32,
    pub total_pages: u32,
    pub events: Vec<ListeningEvent>,
}

/// Walks the history pages and concatenates their events
///
/// Pages run newest first. `fetch(page, to)` is called for page 1 with no
/// upper bound; every later page is bounded by the newest timestamp seen on
/// page 1, so scrobbles arriving mid-walk cannot shift the page boundaries.
/// When there are more than `max_pages`, only the oldest `max_pages` are kept
/// so the engine never skips past unread history; the rest is picked up by
/// later runs.
pub fn collect_pages<F>(max_pages: u32, mut fetch: F) -> SourceResult<Vec<ListeningEvent>>
where
    F: FnMut(u32, Option<i64>) -> SourceResult<RecentTracksPage>,
{
    let first = fetch(1, None)?;
    // An exclusive `to` only moves boundaries towards duplicates, which
    // normalize_events drops
    let to = first.events.iter().map(|e| e.timestamp).max();
    let total_pages = first.total_pages.max(1);
    let max_pages = max_pages.max(1);

    let (mut events, start) = if total_pages <= max_pages {
        (first.events, 2)
    } else {
        log::warn!(
            "History spans {} pages, reading the oldest {} this run",
            total_pages,
            max_pages
        );
        (Vec::new(), total_pages - max_pages + 1)
    };

    for page in start..=total_pages {
        events.extend(fetch(page, to)?.events);
    }

    Ok(events)
}

/// Error codes that mean the service or our key is unusable right now
const UNAVAILABLE_CODES: &[i64] = &[4, 8, 9, 10, 11, 16, 26, 29];

/// Decodes a `user.getrecenttracks` JSON response
pub fn parse_recent_tracks(body: &str) -> SourceResult<RecentTracksPage> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| SourceError::Parse(format!("JSON parse error: {}", e)))?;

    if let Some(code) = envelope.error {
        let message = envelope.message.unwrap_or_else(|| "Unknown error".to_string());
        return Err(if UNAVAILABLE_CODES.contains(&code) {
            SourceError::Unavailable(format!("Last.fm error {}: {}", code, message))
        } else {
            SourceError::Api { code, message }
        });
    }

    let recent = envelope
        .recenttracks
        .ok_or_else(|| SourceError::Parse("missing 'recenttracks'".to_string()))?;

    let events = recent
        .track
        .into_vec()
        .into_iter()
        .filter_map(RawTrack::into_event)
        .collect();

    Ok(RecentTracksPage {
        page: recent.attr.page.as_u32().unwrap_or(1),
        total_pages: recent.attr.total_pages.as_u32().unwrap_or(1),
        events,
    })
}

#[derive(Debug, Deserialize)]
struct Envelope {
    recenttracks: Option<RecentTracks>,
    error: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecentTracks {
    #[serde(default)]
    track: OneOrMany<RawTrack>,
    #[serde(rename = "@attr")]
    attr: PageAttr,
}

#[derive(Debug, Deserialize)]
struct PageAttr {
    page: Numeric,
    #[serde(rename = "totalPages")]
    total_pages: Numeric,
}

/// The API returns a bare object instead of an array when a page holds a
/// single track
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Numbers arrive as strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Text(String),
}

impl Numeric {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Numeric::Int(v) => Some(*v),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_u32(&self) -> Option<u32> {
        self.as_i64().and_then(|v| u32::try_from(v).ok())
    }
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    name: String,
    #[serde(default)]
    url: String,
    artist: Option<RawArtist>,
    date: Option<RawDate>,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    #[serde(rename = "#text")]
    text: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDate {
    uts: Numeric,
}

impl RawTrack {
    /// The track currently playing has no date yet and is skipped
    fn into_event(self) -> Option<ListeningEvent> {
        let timestamp = self.date.as_ref().and_then(|d| d.uts.as_i64())?;
        let artist = self
            .artist
            .and_then(|a| a.name.or(a.text))
            .filter(|name| !name.trim().is_empty());

        Some(ListeningEvent::new(timestamp, self.name, artist, self.url))
    }
}
