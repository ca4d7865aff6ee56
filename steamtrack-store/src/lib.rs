// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # steamtrack store
//!
//! Configuration and metric state for steamtrack.
//!
//! This crate provides:
//!
//! - **SettingsStore**: trackers, per-metric overrides, and request settings
//!   persisted as JSON, with environment overrides at resolve time
//! - **TrackerConfig**: a sanitized account id, API key, and display name,
//!   plus YAML import of sensor blocks
//! - **MetricStore**: the last result per metric and which metrics are
//!   refreshing
//! - **Persistence**: owner-only JSON file helpers
//!
//! ## Usage
//!
//! ```ignore
//! use steamtrack_core::MetricKind;
//! use steamtrack_store::{MetricStore, SettingsStore};
//!
//! let settings = SettingsStore::load_default().await?;
//! let tracker = settings.active_tracker(None).await?;
//!
//! let metrics = MetricStore::new();
//! if let Some(snapshot) = metrics.get(MetricKind::Status).await {
//!     println!("{}: {:?}", tracker.name, snapshot.result.value);
//! }
//! ```

pub mod error;
pub mod metric_store;
pub mod persistence;
pub mod settings_store;
pub mod tracker;

pub use error::{ConfigError, StoreError};
pub use metric_store::MetricStore;
pub use persistence::{
    default_config_dir, default_settings_path, ensure_dir, load_json, load_json_or_default,
    save_json,
};
pub use settings_store::{
    ENV_ACCOUNT_ID, ENV_API_KEY, ENV_NAME, EndpointSettings, MetricSettings, RequestSettings,
    Settings, SettingsStore,
};
pub use tracker::{
    DEFAULT_TRACKER_NAME, TrackerConfig, YAML_PLATFORM, YamlImport, YamlTrackerEntry,
    parse_yaml_trackers,
};

#[cfg(test)]
mod persistence_tests;
