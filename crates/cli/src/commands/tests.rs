use super::*;
use scrobblecast_core::{ListeningEvent, SinkError, SinkResult, Visibility, Watermark};
use scrobblecast_sinks::MemorySink;
use scrobblecast_sources::MemorySource;
use std::cell::Cell;
use tempfile::TempDir;

struct FakeAuthorizer {
    calls: Cell<usize>,
    result: SinkResult<String>,
}

impl FakeAuthorizer {
    fn granting(token: &str) -> Self {
        Self {
            calls: Cell::new(0),
            result: Ok(token.to_string()),
        }
    }
}

impl Authorizer for FakeAuthorizer {
    fn acquire_token(&self) -> SinkResult<String> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

fn setup_manager() -> (ConfigManager, TempDir) {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_directory(dir.path().to_path_buf()).unwrap();
    manager
        .update(|config| config.lastfm.user = "listener".to_string())
        .unwrap();
    (manager, dir)
}

fn scrobble(ts: i64) -> ListeningEvent {
    ListeningEvent::new(ts, format!("Track {ts}"), Some("Band".to_string()), "http://x")
}

#[test]
fn test_existing_token_skips_login() {
    let (manager, _dir) = setup_manager();
    manager.store_access_token("stored").unwrap();
    let config = manager.load().unwrap();
    let authorizer = FakeAuthorizer::granting("fresh");

    let token = ensure_access_token(&manager, &config, &authorizer).unwrap();

    assert_eq!(token, "stored");
    assert_eq!(authorizer.calls.get(), 0);
}

#[test]
fn test_missing_token_triggers_login_once() {
    let (manager, _dir) = setup_manager();
    let authorizer = FakeAuthorizer::granting("fresh");

    let config = manager.load().unwrap();
    let token = ensure_access_token(&manager, &config, &authorizer).unwrap();
    assert_eq!(token, "fresh");

    let config = manager.load().unwrap();
    assert_eq!(config.mastodon.token(), Some("fresh"));
    let token = ensure_access_token(&manager, &config, &authorizer).unwrap();
    assert_eq!(token, "fresh");
    assert_eq!(authorizer.calls.get(), 1);
}

#[test]
fn test_failed_login_stores_nothing() {
    let (manager, _dir) = setup_manager();
    let authorizer = FakeAuthorizer {
        calls: Cell::new(0),
        result: Err(SinkError::Unavailable("Login refused".to_string())),
    };

    let config = manager.load().unwrap();
    assert!(ensure_access_token(&manager, &config, &authorizer).is_err());
    assert!(manager.load().unwrap().mastodon.token().is_none());
}

#[test]
fn test_sync_config_override() {
    let config = Config::default();

    assert_eq!(sync_config(&config, None).unwrap().max_count, 1);
    assert_eq!(sync_config(&config, Some(5)).unwrap().max_count, 5);
    assert!(sync_config(&config, Some(0)).is_err());
    assert!(sync_config(&config, Some(MAX_POSTS_PER_RUN + 1)).is_err());
}

#[test]
fn test_sync_config_rejects_bad_template() {
    let mut config = Config::default();
    config.sync.template = "{album}".to_string();
    assert!(sync_config(&config, None).is_err());
}

#[test]
fn test_sync_persists_watermark_to_config_file() {
    let (manager, _dir) = setup_manager();
    let config = manager.load().unwrap();
    let source = MemorySource::with_events(vec![scrobble(100), scrobble(200)]);
    let sink = MemorySink::new();

    let report = sync_with(&manager, &config, None, &source, &sink).unwrap();
    assert_eq!(report.published.len(), 1);
    assert_eq!(manager.watermark().unwrap(), Watermark::new(100));

    sync_with(&manager, &config, Some(10), &source, &sink).unwrap();
    assert_eq!(manager.watermark().unwrap(), Watermark::new(200));
    assert_eq!(sink.published().len(), 2);
    assert_eq!(sink.published()[1].visibility, Visibility::Public);
}

#[test]
fn test_sync_outage_is_an_error_but_keeps_progress() {
    let (manager, _dir) = setup_manager();
    let config = manager.load().unwrap();
    let source = MemorySource::with_events(vec![scrobble(100), scrobble(200)]);
    let sink = MemorySink::new();
    sink.fail_publish_on(1, SinkError::Unavailable("HTTP 503".to_string()));

    let err = sync_with(&manager, &config, Some(2), &source, &sink).unwrap_err();

    assert!(format!("{err:#}").contains("HTTP 503"));
    assert_eq!(manager.watermark().unwrap(), Watermark::new(100));
}

#[test]
fn test_sweep_uses_configured_policy() {
    let (manager, _dir) = setup_manager();
    manager
        .update(|config| config.sweep.required_tags = vec!["np".to_string()])
        .unwrap();
    let config = manager.load().unwrap();

    let sink = MemorySink::new();
    sink.insert_post(scrobblecast_core::TimelinePost {
        id: scrobblecast_core::PostId::new("old"),
        created_at: chrono::Utc::now() - chrono::Duration::days(30),
        visibility: Visibility::Public,
        tags: vec!["np".to_string()],
        engagement: Default::default(),
    });

    let report = sweep_with(&config, &sink).unwrap();
    assert_eq!(report.deleted.len(), 1);
}

#[test]
fn test_status_mentions_progress() {
    let (manager, _dir) = setup_manager();
    manager.persist_watermark(Watermark::new(1_700_000_000)).unwrap();
    let config = manager.load().unwrap();

    let status = render_status(&manager, &config);

    assert!(status.contains("listener"));
    assert!(status.contains("1700000000"));
    assert!(status.contains("2023-11-14"));
    assert!(status.contains("Logged in:    no"));
}
