//! Timeline posts as seen through the post sink

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned to a post by the timeline provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Creates a post ID from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the post ID as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who can see a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone, shown on public timelines
    #[default]
    Public,
    /// Visible to everyone, hidden from public timelines
    Unlisted,
    /// Followers only
    Private,
    /// Mentioned users only
    Direct,
}

impl Visibility {
    /// Returns the wire name used by the timeline API
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Unlisted => "unlisted",
            Visibility::Private => "private",
            Visibility::Direct => "direct",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "unlisted" => Ok(Visibility::Unlisted),
            "private" => Ok(Visibility::Private),
            "direct" => Ok(Visibility::Direct),
            other => Err(format!("unknown visibility '{}'", other)),
        }
    }
}

/// Favourite and reblog counters of a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub favorites: u64,
    pub reblogs: u64,
}

impl Engagement {
    /// Returns true if nobody favourited or reblogged the post
    pub fn is_untouched(&self) -> bool {
        self.favorites == 0 && self.reblogs == 0
    }
}

/// One of the caller's own posts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePost {
    pub id: PostId,
    pub created_at: DateTime<Utc>,
    pub visibility: Visibility,
    /// Hashtag names without the leading `#`
    pub tags: Vec<String>,
    pub engagement: Engagement,
}

impl TimelinePost {
    /// Age of the post relative to `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.created_at)
    }

    /// Returns true if the post carries `tag`, ignoring case
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(tags: &[&str]) -> TimelinePost {
        TimelinePost {
            id: PostId::new("1"),
            created_at: Utc::now(),
            visibility: Visibility::Public,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            engagement: Engagement::default(),
        }
    }

    #[test]
    fn test_has_tag_ignores_case() {
        let p = post(&["NowPlaying", "bot"]);
        assert!(p.has_tag("nowplaying"));
        assert!(p.has_tag("BOT"));
        assert!(!p.has_tag("np"));
    }

    #[test]
    fn test_has_tag_ignores_non_ascii_case() {
        let p = post(&["ÜBER", "Musique"]);
        assert!(p.has_tag("über"));
        assert!(p.has_tag("MUSIQUE"));
        assert!(!p.has_tag("uber"));
    }

    #[test]
    fn test_age() {
        let mut p = post(&[]);
        let now = Utc::now();
        p.created_at = now - Duration::days(3);
        assert_eq!(p.age_at(now), Duration::days(3));
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!("Unlisted".parse::<Visibility>(), Ok(Visibility::Unlisted));
        assert!("everyone".parse::<Visibility>().is_err());
        assert_eq!(Visibility::default().as_str(), "public");
    }

    #[test]
    fn test_engagement() {
        assert!(Engagement::default().is_untouched());
        let e = Engagement {
            favorites: 1,
            reblogs: 0,
        };
        assert!(!e.is_untouched());
    }
}
