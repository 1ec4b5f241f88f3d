//! scrobblecast configuration
//!
//! Two files are involved:
//! - the **session config** (`config.toml`), read at start and written after
//!   the first login and after every sync run (it holds the watermark);
//! - the **app credentials** (`app_credentials.toml`), static API keys that
//!   are only ever read.
//!
//! Both are reached through an explicit [`ConfigManager`] handle.
//!
//! # Example
//!
//! ```rust,no_run
//! use scrobblecast_config::ConfigManager;
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load().expect("Failed to load config");
//! println!("Posting at most {} per run", config.sync.max_count);
//! ```

mod credentials;
mod error;
mod lastfm_config;
mod manager;
mod mastodon_config;
mod persistence;
mod posting_config;
mod progress;
mod sweep_config;
mod validation;

pub use credentials::{AppCredentials, LastFmCredentials, MastodonCredentials};
pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::{ConfigManager, CONFIG_FILE_NAME, CREDENTIALS_FILE_NAME};
pub use progress::ConfigProgressStore;
pub use validation::{ConfigSection, Validator};

pub use lastfm_config::LastFmConfig;
pub use mastodon_config::MastodonConfig;
pub use posting_config::{PostingConfig, MAX_POSTS_PER_RUN};
pub use sweep_config::SweepConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root session configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Listening-history account and watermark
    pub lastfm: LastFmConfig,

    /// Timeline session token
    pub mastodon: MastodonConfig,

    /// Posting behaviour
    pub sync: PostingConfig,

    /// Retention sweep
    pub sweep: SweepConfig,
}

impl Config {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the entire configuration
    ///
    /// Returns all validation errors found across all sections.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.lastfm.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.mastodon.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.sync.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.sweep.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns the listening-history user, which must be configured before syncing
    pub fn require_lastfm_user(&self) -> ConfigResult<&str> {
        let user = self.lastfm.user.trim();
        if user.is_empty() {
            Err(ConfigError::MissingSetting("lastfm.user".to_string()))
        } else {
            Ok(user)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            lastfm: LastFmConfig::default(),
            mastodon: MastodonConfig::default(),
            sync: PostingConfig::default(),
            sweep: SweepConfig::default(),
        }
    }
}
