//! CLI command implementations.

pub mod check;
pub mod config;
pub mod metrics;
pub mod show;
pub mod watch;

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use steamtrack_core::MetricKind;
use steamtrack_fetch::{FetchContext, SteamGateway, SteamWebGateway};
use steamtrack_metrics::ReduceOptions;
use steamtrack_store::{Settings, SettingsStore, TrackerConfig};

/// What every polling command needs.
pub struct Session {
    pub settings: Settings,
    pub tracker: TrackerConfig,
    pub gateway: Arc<dyn SteamGateway>,
    pub options: ReduceOptions,
}

impl Session {
    /// Loads settings, resolves the tracker, and builds the HTTP gateway.
    pub async fn open(tracker: Option<&str>) -> Result<Self> {
        let store = SettingsStore::load_default().await?;
        let settings = store.get().await;
        let tracker = store.active_tracker(tracker).await?;

        let fetch_settings = settings.fetch_settings();
        let ctx = FetchContext::builder()
            .endpoints(settings.steam_endpoints()?)
            .settings(fetch_settings.clone())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            options: ReduceOptions::from(&fetch_settings),
            gateway: Arc::new(SteamWebGateway::new(ctx)),
            settings,
            tracker,
        })
    }
}

/// Parses `--metric` values; empty means every enabled metric.
pub fn select_metrics(requested: &[String], settings: &Settings) -> Result<Vec<MetricKind>> {
    if requested.is_empty() || requested.iter().any(|m| m == "all") {
        return Ok(settings.enabled_metrics());
    }
    let mut kinds = requested
        .iter()
        .map(|id| MetricKind::from_str(id.trim()).map_err(anyhow::Error::from))
        .collect::<Result<Vec<_>>>()?;
    kinds.sort();
    kinds.dedup();
    Ok(kinds)
}
