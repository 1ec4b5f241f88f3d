//! Configuration manager - the handle passed to every component that reads
//! or persists settings

use crate::credentials::AppCredentials;
use crate::persistence::ConfigPersistence;
use crate::progress::ConfigProgressStore;
use crate::{Config, ConfigError, ConfigResult};
use directories::ProjectDirs;
use scrobblecast_core::Watermark;
use std::path::{Path, PathBuf};

/// Session config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// App credential file name inside the config directory
pub const CREDENTIALS_FILE_NAME: &str = "app_credentials.toml";

/// Main configuration manager
///
/// Owns the locations of the session config and the app credential file.
/// There is no process-wide current config: callers hold a manager and pass
/// it (or a [`ConfigProgressStore`] borrowed from it) to whoever needs it.
pub struct ConfigManager {
    persistence: ConfigPersistence,
    credentials_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager using the default config directory
    ///
    /// The default directory follows XDG base directory specification:
    /// - Linux: `~/.config/scrobblecast/`
    /// - macOS: `~/Library/Application Support/scrobblecast/`
    /// - Windows: `%APPDATA%\scrobblecast\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Self::with_directory(config_dir)
    }

    /// Creates a config manager rooted at a custom directory
    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        Ok(Self::with_paths(
            config_dir.join(CONFIG_FILE_NAME),
            config_dir.join(CREDENTIALS_FILE_NAME),
        ))
    }

    /// Creates a config manager with explicit file locations
    pub fn with_paths(config_path: PathBuf, credentials_path: PathBuf) -> Self {
        Self {
            persistence: ConfigPersistence::new(config_path),
            credentials_path,
        }
    }

    /// Returns the default config directory based on the platform
    pub fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "scrobblecast")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Could not determine user config directory".to_string(),
            })
    }

    /// Returns the full session config file path
    pub fn config_path(&self) -> &Path {
        self.persistence.path()
    }

    /// Returns the app credential file path
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Loads the session configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file is corrupted, returns an error.
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the session configuration and applies environment overrides
    ///
    /// Recognised variables:
    /// - `SCROBBLECAST_LASTFM_USER`
    /// - `SCROBBLECAST_SYNC_MAX_COUNT`
    /// - `SCROBBLECAST_SYNC_VISIBILITY`
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;

        if let Ok(user) = std::env::var("SCROBBLECAST_LASTFM_USER") {
            config.lastfm.user = user;
        }

        if let Ok(count) = std::env::var("SCROBBLECAST_SYNC_MAX_COUNT") {
            match count.parse::<usize>() {
                Ok(v) => config.sync.max_count = v,
                Err(_) => log::warn!("Ignoring invalid SCROBBLECAST_SYNC_MAX_COUNT={}", count),
            }
        }

        if let Ok(visibility) = std::env::var("SCROBBLECAST_SYNC_VISIBILITY") {
            match visibility.parse() {
                Ok(v) => config.sync.visibility = v,
                Err(e) => log::warn!("Ignoring SCROBBLECAST_SYNC_VISIBILITY: {}", e),
            }
        }

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {:?}",
                errors
            );
        }

        Ok(config)
    }

    /// Reads the app credential file
    pub fn load_credentials(&self) -> ConfigResult<AppCredentials> {
        AppCredentials::load(&self.credentials_path)
    }

    /// Validates and saves the session configuration
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Updates the configuration using a closure
    ///
    /// This loads the current config, applies the update function,
    /// and saves the result atomically.
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Generates a default config file if one doesn't exist
    ///
    /// Returns Ok(true) if a new file was created, Ok(false) if one already exists.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.save(&Config::default())?;
        log::info!("Generated default config at {}", self.config_path().display());
        Ok(true)
    }

    /// Stores the user-level token obtained from an interactive login
    pub fn store_access_token(&self, token: &str) -> ConfigResult<()> {
        self.update(|config| {
            config.mastodon.access_token = Some(token.to_string());
        })?;
        log::info!("Stored access token in {}", self.config_path().display());
        Ok(())
    }

    /// Reads the persisted watermark, or `Watermark::INITIAL`
    pub fn watermark(&self) -> ConfigResult<Watermark> {
        Ok(self.load()?.lastfm.last_timestamp)
    }

    /// Persists a new watermark, leaving every other setting untouched
    pub fn persist_watermark(&self, value: Watermark) -> ConfigResult<()> {
        let mut config = self.load()?;
        config.lastfm.last_timestamp = value;
        self.persistence.write(&config)
    }

    /// Returns a progress store backed by this config file
    pub fn progress_store(&self) -> ConfigProgressStore<'_> {
        ConfigProgressStore::new(self)
    }
}
