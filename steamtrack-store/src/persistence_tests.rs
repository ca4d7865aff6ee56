//! Settings persistence tests.
//!
//! File I/O, the settings store's load/save cycle, and compatibility with
//! hand-edited files.

use std::path::PathBuf;
use std::time::Duration;
use steamtrack_core::MetricKind;
use tempfile::TempDir;

use crate::persistence::{ensure_dir, load_json, load_json_or_default, save_json};
use crate::settings_store::{Settings, SettingsStore};
use crate::tracker::{TrackerConfig, parse_yaml_trackers};

fn tracker(id: &str, name: &str) -> TrackerConfig {
    TrackerConfig::sanitize(id, "KEY", Some(name)).unwrap()
}

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("a").join("b").join("settings.json");

    save_json(&nested, &serde_json::json!({"key": "value"}))
        .await
        .unwrap();
    assert!(nested.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let result: Result<Settings, _> = load_json(&PathBuf::from("/nonexistent/settings.json")).await;
    assert!(result.is_err());

    let fallback: Settings = load_json_or_default(&PathBuf::from("/nonexistent/settings.json")).await;
    assert_eq!(fallback, Settings::default());
}

#[tokio::test]
async fn test_ensure_dir_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("conf");

    ensure_dir(&dir).await.unwrap();
    ensure_dir(&dir).await.unwrap();
    assert!(dir.is_dir());
}

#[tokio::test]
async fn test_atomic_write_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    save_json(&file_path, &Settings::default()).await.unwrap();

    assert!(file_path.exists());
    assert!(!file_path.with_extension("json.tmp").exists());
}

// ============================================================================
// Settings Store Tests
// ============================================================================

#[tokio::test]
async fn test_settings_store_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(path.clone()).await.unwrap();
    store
        .update(|s| {
            s.upsert_tracker(tracker("76561198000000001", "Main"));
            s.upsert_tracker(tracker("76561198000000002", "Alt"));
            s.set_metric_enabled(MetricKind::GlobalStats, false);
            s.set_metric_interval(MetricKind::Status, Some(Duration::from_secs(30)));
            s.requests.fanout_concurrency = 4;
        })
        .await;
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(path).await.unwrap().get().await;
    assert_eq!(reloaded, store.get().await);
    assert_eq!(reloaded.trackers.len(), 2);
    assert!(!reloaded.is_metric_enabled(MetricKind::GlobalStats));
    assert_eq!(
        reloaded.metric_interval(MetricKind::Status),
        Some(Duration::from_secs(30))
    );
    assert_eq!(reloaded.fetch_settings().fanout_concurrency, 4);
}

#[tokio::test]
async fn test_readding_account_updates_file_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(path.clone()).await.unwrap();
    store.update(|s| s.upsert_tracker(tracker("1", "First"))).await;
    store.save().await.unwrap();
    store.update(|s| s.upsert_tracker(tracker("1", "Second"))).await;
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(path).await.unwrap().get().await;
    assert_eq!(reloaded.trackers.len(), 1);
    assert_eq!(reloaded.trackers[0].name, "Second");
}

#[tokio::test]
async fn test_yaml_import_persists() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    let yaml = "sensor:\n  - platform: steam_tracker\n    api_key: K\n    steam_id: '9'\n";

    let store = SettingsStore::load(path.clone()).await.unwrap();
    let import = parse_yaml_trackers(yaml).unwrap();
    store
        .update(|s| {
            for t in import.trackers {
                s.upsert_tracker(t);
            }
        })
        .await;
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(path).await.unwrap().get().await;
    assert_eq!(reloaded.tracker(Some("9")).unwrap().api_key, "K");
}

// ============================================================================
// Compatibility
// ============================================================================

#[tokio::test]
async fn test_load_minimal_json_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    tokio::fs::write(&path, "{}").await.unwrap();

    let loaded = SettingsStore::load(path).await.unwrap().get().await;
    assert_eq!(loaded, Settings::default());
}

#[tokio::test]
async fn test_load_json_with_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    let json = r#"{
        "metrics": {"friends": {"enabled": false}},
        "unknown_field": 12345,
        "requests": {"timeout_secs": 20, "nested_unknown": {"k": "v"}}
    }"#;
    tokio::fs::write(&path, json).await.unwrap();

    let loaded: Settings = load_json(&path).await.unwrap();
    assert!(!loaded.is_metric_enabled(MetricKind::Friends));
    assert_eq!(loaded.fetch_settings().timeout, Duration::from_secs(20));
    assert_eq!(loaded.fetch_settings().library_timeout, Duration::from_secs(30));
}

#[tokio::test]
async fn test_corrupt_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let store = SettingsStore::load(path).await.unwrap();
    assert_eq!(store.get().await, Settings::default());
}

#[tokio::test]
async fn test_unicode_tracker_name() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    let mut settings = Settings::default();
    settings.upsert_tracker(tracker("1", "ゲーマー 🎮"));
    save_json(&path, &settings).await.unwrap();

    let loaded: Settings = load_json(&path).await.unwrap();
    assert_eq!(loaded.trackers[0].name, "ゲーマー 🎮");
}
