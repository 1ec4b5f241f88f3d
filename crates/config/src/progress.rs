//! Watermark store backed by the session config file

use crate::ConfigManager;
use scrobblecast_core::{ProgressStore, StoreError, StoreResult, Watermark};

/// Keeps the watermark in `[lastfm] last_timestamp`
///
/// Every `set` rewrites the config file atomically, so the value is on disk
/// before the call returns.
pub struct ConfigProgressStore<'a> {
    manager: &'a ConfigManager,
}

impl<'a> ConfigProgressStore<'a> {
    pub fn new(manager: &'a ConfigManager) -> Self {
        Self { manager }
    }
}

impl ProgressStore for ConfigProgressStore<'_> {
    fn get(&self) -> StoreResult<Watermark> {
        self.manager
            .watermark()
            .map_err(|e| StoreError::Read(e.to_string()))
    }

    fn set(&mut self, value: Watermark) -> StoreResult<()> {
        self.manager
            .persist_watermark(value)
            .map_err(|e| StoreError::Write(e.to_string()))?;
        log::debug!("Persisted watermark {}", value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf()).unwrap();

        let mut store = manager.progress_store();
        assert_eq!(store.get().unwrap(), Watermark::INITIAL);

        store.set(Watermark::new(1_700_000_123)).unwrap();

        let reopened = ConfigManager::with_directory(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(
            reopened.progress_store().get().unwrap().value(),
            1_700_000_123
        );
    }

    #[test]
    fn test_corrupt_file_surfaces_read_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.toml"), "[lastfm\n").unwrap();
        let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf()).unwrap();

        assert!(matches!(
            manager.progress_store().get(),
            Err(StoreError::Read(_))
        ));
    }
}
