//! Tracker configuration and YAML import.
//!
//! A tracker is one Steam account polled with one Web API key. All fields are
//! whitespace-trimmed before use; the display name falls back to
//! [`DEFAULT_TRACKER_NAME`].

use serde::{Deserialize, Serialize};
use steamtrack_core::Identity;
use tracing::{debug, warn};

use crate::error::{ConfigError, StoreError};

/// Name used when a tracker is configured without one.
pub const DEFAULT_TRACKER_NAME: &str = "Steam Tracker";

/// Platform key recognised in YAML sensor blocks.
pub const YAML_PLATFORM: &str = "steam_tracker";

// ============================================================================
// Tracker Config
// ============================================================================

/// A validated tracker.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// 64-bit Steam id of the tracked account.
    pub account_id: String,
    /// Steam Web API key.
    pub api_key: String,
    /// Display name used as the metric name prefix.
    pub name: String,
}

impl TrackerConfig {
    /// Trims and validates raw input.
    ///
    /// A blank account id is reported before a blank key.
    pub fn sanitize(
        account_id: &str,
        api_key: &str,
        name: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let account_id = account_id.trim();
        let api_key = api_key.trim();
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        if account_id.is_empty() {
            return Err(ConfigError::AccountIdRequired);
        }
        if api_key.is_empty() {
            return Err(ConfigError::ApiKeyRequired);
        }

        Ok(Self {
            account_id: account_id.to_string(),
            api_key: api_key.to_string(),
            name: name.unwrap_or(DEFAULT_TRACKER_NAME).to_string(),
        })
    }

    /// Re-validates a tracker, e.g. one loaded from disk or overridden by env.
    pub fn validated(self) -> Result<Self, ConfigError> {
        Self::sanitize(&self.account_id, &self.api_key, Some(&self.name))
    }

    /// Credentials for the gateway.
    pub fn identity(&self) -> Result<Identity, StoreError> {
        Identity::new(&self.account_id, &self.api_key).map_err(|_| {
            if self.account_id.trim().is_empty() {
                ConfigError::AccountIdRequired.into()
            } else {
                ConfigError::ApiKeyRequired.into()
            }
        })
    }

    /// Last four characters of the key, for display.
    pub fn masked_key(&self) -> String {
        let tail: String = self
            .api_key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{tail}")
    }
}

impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("account_id", &self.account_id)
            .field("api_key", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

// ============================================================================
// YAML Import
// ============================================================================

/// One entry of a YAML sensor block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YamlTrackerEntry {
    /// Platform name; entries for other platforms are skipped.
    #[serde(default)]
    pub platform: Option<String>,
    /// Web API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// 64-bit Steam id.
    #[serde(default)]
    pub steam_id: Option<serde_yaml::Value>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl YamlTrackerEntry {
    fn is_for_us(&self) -> bool {
        self.platform.as_deref().is_none_or(|p| p == YAML_PLATFORM)
    }

    fn steam_id_text(&self) -> String {
        match &self.steam_id {
            Some(serde_yaml::Value::String(s)) => s.clone(),
            Some(serde_yaml::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Validates this entry into a tracker.
    pub fn into_tracker(self) -> Result<TrackerConfig, ConfigError> {
        let steam_id = self.steam_id_text();
        TrackerConfig::sanitize(
            &steam_id,
            self.api_key.as_deref().unwrap_or_default(),
            self.name.as_deref(),
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YamlDocument {
    Sensor { sensor: Vec<YamlTrackerEntry> },
    List(Vec<YamlTrackerEntry>),
    Single(YamlTrackerEntry),
}

/// Outcome of parsing a YAML import.
#[derive(Debug, Default)]
pub struct YamlImport {
    /// Entries that validated.
    pub trackers: Vec<TrackerConfig>,
    /// Entries rejected for a missing id or key, by position.
    pub rejected: Vec<(usize, ConfigError)>,
}

/// Parses trackers from YAML.
///
/// Accepts a `sensor:` list, a bare list, or a single mapping. Entries whose
/// `platform` is set to something other than `steam_tracker` are ignored.
pub fn parse_yaml_trackers(yaml: &str) -> Result<YamlImport, StoreError> {
    let entries = match serde_yaml::from_str::<YamlDocument>(yaml)? {
        YamlDocument::Sensor { sensor } => sensor,
        YamlDocument::List(list) => list,
        YamlDocument::Single(entry) => vec![entry],
    };

    let mut import = YamlImport::default();
    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_for_us() {
            debug!(index, platform = ?entry.platform, "Skipping foreign platform entry");
            continue;
        }
        match entry.into_tracker() {
            Ok(tracker) => import.trackers.push(tracker),
            Err(e) => {
                warn!(index, error = %e, "Rejected YAML tracker entry");
                import.rejected.push((index, e));
            }
        }
    }
    Ok(import)
}

// ============================================================================
// Tests
// ============================================================================
