//! The reducer boundary.
//!
//! [`compute_metric`] runs the reducer for a [`MetricKind`] and always
//! returns a [`MetricResult`]. A failed primary call becomes the cleared
//! result plus a single error record.

use std::time::Instant;

use steamtrack_core::{Identity, MetricKind, MetricResult};
use steamtrack_fetch::{DEFAULT_RECENT_COUNT, FetchSettings, SteamGateway};
use tracing::{error, info, instrument};

use crate::error::ReduceError;
use crate::{friends, game, global_stats, playtime, profile, recent_achievements, recent_games, status};

// ============================================================================
// Reduce Options
// ============================================================================

/// Tunables passed to reducers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOptions {
    /// Concurrent per-game calls in the global stats scan.
    pub fanout_concurrency: usize,
    /// How many recent games to request.
    pub recent_count: u32,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            fanout_concurrency: 1,
            recent_count: DEFAULT_RECENT_COUNT,
        }
    }
}

impl From<&FetchSettings> for ReduceOptions {
    fn from(settings: &FetchSettings) -> Self {
        Self {
            fanout_concurrency: settings.fanout_concurrency.max(1),
            ..Default::default()
        }
    }
}

// ============================================================================
// Boundary
// ============================================================================

async fn dispatch(
    kind: MetricKind,
    gateway: &dyn SteamGateway,
    identity: &Identity,
    options: &ReduceOptions,
) -> Result<MetricResult, ReduceError> {
    match kind {
        MetricKind::Status => status::reduce(gateway, identity).await,
        MetricKind::Game => game::reduce(gateway, identity).await,
        MetricKind::Playtime => playtime::reduce(gateway, identity).await,
        MetricKind::Profile => profile::reduce(gateway, identity).await,
        MetricKind::RecentGames => {
            recent_games::reduce(gateway, identity, options.recent_count).await
        }
        MetricKind::RecentAchievements => {
            recent_achievements::reduce(gateway, identity, options.recent_count).await
        }
        MetricKind::GlobalStats => {
            global_stats::reduce(gateway, identity, options.fanout_concurrency).await
        }
        MetricKind::Friends => friends::reduce(gateway, identity).await,
    }
}

/// Computes one metric. Never fails.
#[instrument(skip(gateway, identity, options), fields(account = %identity.account_id()))]
pub async fn compute_metric(
    kind: MetricKind,
    gateway: &dyn SteamGateway,
    identity: &Identity,
    options: &ReduceOptions,
) -> MetricResult {
    let started = Instant::now();
    match dispatch(kind, gateway, identity, options).await {
        Ok(result) => {
            info!(
                metric = %kind,
                elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Metric refreshed"
            );
            result
        }
        Err(e) => {
            error!(metric = %kind, error = %e, "Metric refresh failed; clearing");
            MetricResult::cleared()
        }
    }
}
