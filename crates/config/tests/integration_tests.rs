//! Integration tests for the configuration system

use scrobblecast_config::{Config, ConfigError, ConfigManager, CONFIG_VERSION};
use scrobblecast_core::{ProgressStore, Visibility, Watermark};
use std::fs;
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_full_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    assert!(manager.initialize()?);

    let config = manager.load()?;
    assert_eq!(config.version, CONFIG_VERSION);

    let mut modified = config.clone();
    modified.lastfm.user = "listener".to_string();
    modified.sync.visibility = Visibility::Unlisted;
    manager.save(&modified)?;

    manager.store_access_token("token-1")?;
    manager.progress_store().set(Watermark::new(99))?;

    let reloaded = manager.load()?;
    assert_eq!(reloaded.lastfm.user, "listener");
    assert_eq!(reloaded.sync.visibility, Visibility::Unlisted);
    assert_eq!(reloaded.mastodon.token(), Some("token-1"));
    assert_eq!(reloaded.lastfm.last_timestamp.value(), 99);

    Ok(())
}

#[test]
fn test_hand_written_config() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    fs::write(
        manager.config_path(),
        r#"
version = 1

[lastfm]
user = "listener"
last_timestamp = 1700000000

[sync]
max_count = 2
visibility = "private"
template = "np: {artist} - {title} {url}"

[sweep]
min_age_days = 30
required_tags = ["NowPlaying", "np"]
exempt_if_engaged = false
"#,
    )?;

    let config = manager.load()?;
    assert_eq!(config.lastfm.last_timestamp.value(), 1_700_000_000);
    assert_eq!(config.sync.max_count, 2);
    assert_eq!(config.sync.visibility, Visibility::Private);

    let policy = config.sweep.policy();
    assert_eq!(policy.min_age, chrono::Duration::days(30));
    assert_eq!(policy.required_tags, vec!["nowplaying", "np"]);
    assert!(!policy.exempt_if_engaged);
    assert_eq!(policy.max_candidates, 20);

    Ok(())
}

#[test]
fn test_watermark_write_survives_invalid_unrelated_field() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    fs::write(
        manager.config_path(),
        "[lastfm]\nuser = \"listener\"\n\n[sync]\nmax_count = 0\n",
    )?;

    manager.progress_store().set(Watermark::new(500))?;

    let config = manager.load()?;
    assert_eq!(config.lastfm.last_timestamp.value(), 500);
    assert_eq!(config.sync.max_count, 0);

    Ok(())
}

#[test]
fn test_credentials_via_manager() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    fs::write(
        manager.credentials_path(),
        "[mastodon]\nclient_key = \"k\"\nclient_secret = \"s\"\n\n[lastfm]\napi_key = \"a\"\nshared_secret = \"b\"\n",
    )?;

    match manager.load_credentials() {
        Err(ConfigError::MissingCredential { section, key, .. }) => {
            assert_eq!(section, "mastodon");
            assert_eq!(key, "instance");
        }
        other => panic!("expected missing instance, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_atomic_save_leaves_no_temp_files() -> Result<(), Box<dyn std::error::Error>> {
    let (temp_dir, manager) = setup_test_manager()?;

    for i in 0..5 {
        manager.progress_store().set(Watermark::new(i))?;
    }

    let entries: Vec<_> = fs::read_dir(temp_dir.path())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert!(entries.iter().all(|name| name.starts_with("config.toml")));

    Ok(())
}

#[test]
fn test_default_config_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.save(&Config::default())?;
    assert_eq!(manager.load()?, Config::default());
    Ok(())
}
