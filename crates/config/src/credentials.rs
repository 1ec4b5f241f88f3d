//! Application-level API credentials
//!
//! These are static per installation and read once at startup. The file is
//! never written by scrobblecast.

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Client registration for the timeline instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MastodonCredentials {
    pub client_key: String,
    pub client_secret: String,
    /// Base URL of the instance, e.g. `https://example.social`
    pub instance: String,
}

/// API key pair for the listening-history service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastFmCredentials {
    pub api_key: String,
    pub shared_secret: String,
}

/// Both credential sets, fully populated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub mastodon: MastodonCredentials,
    pub lastfm: LastFmCredentials,
}

#[derive(Debug, Default, Deserialize)]
struct RawCredentials {
    mastodon: Option<RawMastodon>,
    lastfm: Option<RawLastFm>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMastodon {
    client_key: Option<String>,
    client_secret: Option<String>,
    instance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLastFm {
    api_key: Option<String>,
    shared_secret: Option<String>,
}

impl AppCredentials {
    /// Reads and checks the credential file at `path`
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents, path)
    }

    /// Parses credential TOML; `path` is only used in error messages
    pub fn parse(contents: &str, path: &Path) -> ConfigResult<Self> {
        let raw: RawCredentials = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let require = |section: &str, key: &str, value: Option<String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingCredential {
                    path: path.to_path_buf(),
                    section: section.to_string(),
                    key: key.to_string(),
                })
        };

        let mastodon = raw.mastodon.ok_or_else(|| missing_section(path, "mastodon"))?;
        let mastodon = MastodonCredentials {
            client_key: require("mastodon", "client_key", mastodon.client_key)?,
            client_secret: require("mastodon", "client_secret", mastodon.client_secret)?,
            instance: require("mastodon", "instance", mastodon.instance)?
                .trim_end_matches('/')
                .to_string(),
        };

        let lastfm = raw.lastfm.ok_or_else(|| missing_section(path, "lastfm"))?;
        let lastfm = LastFmCredentials {
            api_key: require("lastfm", "api_key", lastfm.api_key)?,
            shared_secret: require("lastfm", "shared_secret", lastfm.shared_secret)?,
        };

        log::debug!("Loaded app credentials from {}", path.display());
        Ok(Self { mastodon, lastfm })
    }
}

fn missing_section(path: &Path, section: &str) -> ConfigError {
    ConfigError::MissingCredential {
        path: PathBuf::from(path),
        section: section.to_string(),
        key: "*".to_string(),
    }
}
