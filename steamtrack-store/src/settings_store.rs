//! User settings store.
//!
//! Manages trackers, per-metric overrides, and request settings with
//! persistence and change notification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use steamtrack_core::MetricKind;
use steamtrack_fetch::{DEFAULT_API_BASE, DEFAULT_CDN_BASE, FetchSettings, SteamEndpoints};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};
use crate::tracker::TrackerConfig;

/// Overrides the selected tracker's account id.
pub const ENV_ACCOUNT_ID: &str = "STEAM_TRACKER_ACCOUNT_ID";
/// Overrides the selected tracker's API key.
pub const ENV_API_KEY: &str = "STEAM_TRACKER_API_KEY";
/// Overrides the selected tracker's display name.
pub const ENV_NAME: &str = "STEAM_TRACKER_NAME";

// ============================================================================
// Settings Types
// ============================================================================

/// Per-metric settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSettings {
    /// Whether the metric is polled.
    pub enabled: bool,
    /// Poll interval override in seconds.
    pub interval_secs: Option<u64>,
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: None,
        }
    }
}

/// Request timeouts and fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSettings {
    /// Timeout for single-record calls, in seconds.
    pub timeout_secs: u64,
    /// Timeout for list calls, in seconds.
    pub extended_timeout_secs: u64,
    /// Timeout for whole-library scans, in seconds.
    pub library_timeout_secs: u64,
    /// Concurrent per-game calls during the global stats scan.
    pub fanout_concurrency: usize,
}

impl Default for RequestSettings {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            timeout_secs: fetch.timeout.as_secs(),
            extended_timeout_secs: fetch.extended_timeout.as_secs(),
            library_timeout_secs: fetch.library_timeout.as_secs(),
            fanout_concurrency: fetch.fanout_concurrency,
        }
    }
}

/// Base URLs for the Web API and artwork CDN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// Web API base.
    pub api_base: String,
    /// Artwork CDN base.
    pub cdn_base: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            cdn_base: DEFAULT_CDN_BASE.to_string(),
        }
    }
}

/// Persisted user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Configured trackers, unique by account id.
    pub trackers: Vec<TrackerConfig>,

    /// Account id of the tracker used when none is named.
    pub selected_tracker: Option<String>,

    /// Per-metric overrides; metrics absent here use their defaults.
    pub metrics: BTreeMap<MetricKind, MetricSettings>,

    /// Request timeouts and fan-out.
    pub requests: RequestSettings,

    /// Base URLs.
    pub endpoints: EndpointSettings,
}

impl Settings {
    // ========================================================================
    // Trackers
    // ========================================================================

    /// Adds a tracker, or updates the one with the same account id in place.
    ///
    /// Returns `true` when an existing tracker was updated.
    pub fn upsert_tracker(&mut self, tracker: TrackerConfig) -> bool {
        if let Some(existing) = self
            .trackers
            .iter_mut()
            .find(|t| t.account_id == tracker.account_id)
        {
            *existing = tracker;
            return true;
        }
        if self.trackers.is_empty() {
            self.selected_tracker = Some(tracker.account_id.clone());
        }
        self.trackers.push(tracker);
        false
    }

    /// Removes a tracker by account id or name.
    pub fn remove_tracker(&mut self, selector: &str) -> Option<TrackerConfig> {
        let index = self.position(selector)?;
        let removed = self.trackers.remove(index);
        if self.selected_tracker.as_deref() == Some(removed.account_id.as_str()) {
            self.selected_tracker = self.trackers.first().map(|t| t.account_id.clone());
        }
        Some(removed)
    }

    fn position(&self, selector: &str) -> Option<usize> {
        let selector = selector.trim();
        self.trackers
            .iter()
            .position(|t| t.account_id == selector)
            .or_else(|| self.trackers.iter().position(|t| t.name == selector))
    }

    /// Finds a tracker by account id or name, or the selected one.
    pub fn tracker(&self, selector: Option<&str>) -> Option<&TrackerConfig> {
        match selector {
            Some(s) => self.position(s).map(|i| &self.trackers[i]),
            None => self
                .selected_tracker
                .as_deref()
                .and_then(|id| self.position(id))
                .map(|i| &self.trackers[i])
                .or_else(|| self.trackers.first()),
        }
    }

    /// Resolves the tracker to poll, applying environment overrides.
    ///
    /// `env` looks up a variable by name. With no stored tracker, the
    /// environment alone may supply one.
    pub fn resolve_tracker(
        &self,
        selector: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<TrackerConfig, StoreError> {
        let stored = self.tracker(selector).cloned();
        if stored.is_none() {
            if let Some(s) = selector {
                return Err(StoreError::TrackerNotFound(s.to_string()));
            }
        }

        let env_account = env(ENV_ACCOUNT_ID);
        let env_key = env(ENV_API_KEY);
        let env_name = env(ENV_NAME);

        let base = match stored {
            Some(t) => t,
            None if env_account.is_some() || env_key.is_some() => TrackerConfig {
                account_id: String::new(),
                api_key: String::new(),
                name: String::new(),
            },
            None => return Err(StoreError::NoTracker),
        };

        let overridden = env_account.is_some() || env_key.is_some() || env_name.is_some();
        let tracker = TrackerConfig::sanitize(
            env_account.as_deref().unwrap_or(&base.account_id),
            env_key.as_deref().unwrap_or(&base.api_key),
            Some(env_name.as_deref().unwrap_or(&base.name)),
        )?;
        if overridden {
            debug!(account = %tracker.account_id, "Applied environment overrides");
        }
        Ok(tracker)
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    /// Whether a metric is polled.
    pub fn is_metric_enabled(&self, kind: MetricKind) -> bool {
        self.metrics.get(&kind).is_none_or(|m| m.enabled)
    }

    /// Enables or disables a metric.
    pub fn set_metric_enabled(&mut self, kind: MetricKind, enabled: bool) {
        self.metrics.entry(kind).or_default().enabled = enabled;
    }

    /// Poll interval override for a metric.
    pub fn metric_interval(&self, kind: MetricKind) -> Option<Duration> {
        self.metrics
            .get(&kind)
            .and_then(|m| m.interval_secs)
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }

    /// Sets or clears a metric's poll interval override.
    pub fn set_metric_interval(&mut self, kind: MetricKind, interval: Option<Duration>) {
        self.metrics.entry(kind).or_default().interval_secs = interval.map(|d| d.as_secs());
    }

    /// Enabled metrics, in declaration order.
    pub fn enabled_metrics(&self) -> Vec<MetricKind> {
        MetricKind::all()
            .iter()
            .copied()
            .filter(|k| self.is_metric_enabled(*k))
            .collect()
    }

    // ========================================================================
    // Fetch
    // ========================================================================

    /// Gateway settings derived from the request section.
    pub fn fetch_settings(&self) -> FetchSettings {
        let r = &self.requests;
        let defaults = FetchSettings::default();
        let secs = |value: u64, fallback: Duration| {
            if value == 0 {
                fallback
            } else {
                Duration::from_secs(value)
            }
        };
        FetchSettings {
            timeout: secs(r.timeout_secs, defaults.timeout),
            extended_timeout: secs(r.extended_timeout_secs, defaults.extended_timeout),
            library_timeout: secs(r.library_timeout_secs, defaults.library_timeout),
            fanout_concurrency: r.fanout_concurrency.max(1),
        }
    }

    /// Endpoint bases as validated URLs.
    pub fn steam_endpoints(&self) -> Result<SteamEndpoints, StoreError> {
        SteamEndpoints::new(&self.endpoints.api_base, &self.endpoints.cdn_base)
            .map_err(|e| StoreError::InvalidSettings(e.to_string()))
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings at `path`, without reading it.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    fn with_settings(path: PathBuf, settings: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing file yields defaults. A corrupt file also yields defaults
    /// with a warning, so a bad edit never locks the user out of `config`.
    ///
    /// # Errors
    ///
    /// Returns error on IO failures other than a missing file.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            match load_json::<Settings>(&path).await {
                Ok(settings) => settings,
                Err(StoreError::Io(e)) => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Settings::default()
                }
            }
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self::with_settings(path, settings))
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in memory; call [`Self::save`] to persist.
    pub async fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Settings) -> R,
    {
        f(&mut *self.settings.write().await)
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), trackers = settings.trackers.len(), "Settings saved");
        Ok(())
    }

    /// Resolves the active tracker using the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if no tracker matches or the result fails validation.
    pub async fn active_tracker(&self, selector: Option<&str>) -> Result<TrackerConfig, StoreError> {
        self.settings
            .read()
            .await
            .resolve_tracker(selector, |name| std::env::var(name).ok())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn tracker(id: &str, name: &str) -> TrackerConfig {
        TrackerConfig::sanitize(id, "KEY", Some(name)).unwrap()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let mut settings = Settings::default();
        assert!(!settings.upsert_tracker(tracker("1", "One")));
        assert!(!settings.upsert_tracker(tracker("2", "Two")));
        assert!(settings.upsert_tracker(tracker("1", "Renamed")));

        assert_eq!(settings.trackers.len(), 2);
        assert_eq!(settings.trackers[0].name, "Renamed");
        assert_eq!(settings.selected_tracker.as_deref(), Some("1"));
    }

    #[test]
    fn test_tracker_lookup_by_id_or_name() {
        let mut settings = Settings::default();
        settings.upsert_tracker(tracker("1", "One"));
        settings.upsert_tracker(tracker("2", "Two"));

        assert_eq!(settings.tracker(Some("2")).unwrap().name, "Two");
        assert_eq!(settings.tracker(Some("One")).unwrap().account_id, "1");
        assert_eq!(settings.tracker(None).unwrap().account_id, "1");
        assert!(settings.tracker(Some("3")).is_none());
    }

    #[test]
    fn test_remove_reselects() {
        let mut settings = Settings::default();
        settings.upsert_tracker(tracker("1", "One"));
        settings.upsert_tracker(tracker("2", "Two"));

        assert!(settings.remove_tracker("1").is_some());
        assert_eq!(settings.selected_tracker.as_deref(), Some("2"));
        assert!(settings.remove_tracker("1").is_none());
    }

    #[test]
    fn test_resolve_applies_env_overrides() {
        let mut settings = Settings::default();
        settings.upsert_tracker(tracker("1", "One"));

        let env: HashMap<&str, &str> =
            [(ENV_API_KEY, " ENVKEY "), (ENV_NAME, "Env Name")].into_iter().collect();
        let resolved = settings
            .resolve_tracker(None, |k| env.get(k).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(resolved.account_id, "1");
        assert_eq!(resolved.api_key, "ENVKEY");
        assert_eq!(resolved.name, "Env Name");
        assert_eq!(settings.trackers[0].api_key, "KEY");
    }

    #[test]
    fn test_resolve_from_env_only() {
        let settings = Settings::default();
        let env: HashMap<&str, &str> =
            [(ENV_ACCOUNT_ID, "42"), (ENV_API_KEY, "K")].into_iter().collect();
        let resolved = settings
            .resolve_tracker(None, |k| env.get(k).map(|v| (*v).to_string()))
            .unwrap();
        assert_eq!(resolved.account_id, "42");
        assert_eq!(resolved.name, crate::DEFAULT_TRACKER_NAME);
    }

    #[test]
    fn test_resolve_errors() {
        let settings = Settings::default();
        assert!(matches!(
            settings.resolve_tracker(None, no_env),
            Err(StoreError::NoTracker)
        ));
        assert!(matches!(
            settings.resolve_tracker(Some("x"), no_env),
            Err(StoreError::TrackerNotFound(_))
        ));

        let only_id = |k: &str| (k == ENV_ACCOUNT_ID).then(|| "42".to_string());
        assert!(matches!(
            settings.resolve_tracker(None, only_id),
            Err(StoreError::Config(crate::ConfigError::ApiKeyRequired))
        ));
    }

    #[test]
    fn test_metric_overrides() {
        let mut settings = Settings::default();
        assert!(settings.is_metric_enabled(MetricKind::Friends));
        assert_eq!(settings.metric_interval(MetricKind::Friends), None);

        settings.set_metric_enabled(MetricKind::Friends, false);
        settings.set_metric_interval(MetricKind::Status, Some(Duration::from_secs(30)));

        assert!(!settings.enabled_metrics().contains(&MetricKind::Friends));
        assert_eq!(
            settings.metric_interval(MetricKind::Status),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_fetch_settings_floor() {
        let mut settings = Settings::default();
        assert_eq!(settings.fetch_settings(), FetchSettings::default());

        settings.requests.timeout_secs = 0;
        settings.requests.fanout_concurrency = 0;
        let fetch = settings.fetch_settings();
        assert_eq!(fetch.timeout, Duration::from_secs(10));
        assert_eq!(fetch.fanout_concurrency, 1);
    }

    #[test]
    fn test_invalid_endpoint_base() {
        let mut settings = Settings::default();
        assert!(settings.steam_endpoints().is_ok());
        settings.endpoints.api_base = "not a url".to_string();
        assert!(matches!(
            settings.steam_endpoints(),
            Err(StoreError::InvalidSettings(_))
        ));
    }

    #[tokio::test]
    async fn test_update_applies_in_memory() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));

        let updated = store
            .update(|s| s.upsert_tracker(tracker("1", "One")))
            .await;

        assert!(!updated);
        assert!(!store.path().exists());
        assert_eq!(store.get().await.trackers.len(), 1);
    }
}
