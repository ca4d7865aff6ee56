//! Steam level metric.

use serde::Serialize;
use steamtrack_core::{Identity, MetricKind, MetricResult};
use steamtrack_fetch::{Endpoint, SteamGateway};
use tracing::instrument;

use crate::descriptor::{MetricDescriptor, hours};
use crate::error::ReduceError;

/// Descriptor for the profile metric.
pub fn profile_descriptor() -> MetricDescriptor {
    MetricDescriptor::builder(MetricKind::Profile)
        .description("Steam level and XP progress")
        .interval(hours(3))
        .sources(&[Endpoint::Badges])
        .build()
}

#[derive(Debug, Serialize)]
struct ProfileAttributes {
    player_xp: Option<u64>,
    player_xp_needed_to_level_up: Option<u64>,
    player_xp_needed_current_level: Option<u64>,
}

/// Value is the Steam level, `0` when not reported.
#[instrument(skip_all)]
pub async fn reduce(
    gateway: &dyn SteamGateway,
    identity: &Identity,
) -> Result<MetricResult, ReduceError> {
    let badges = gateway.badges(identity).await?;

    let attrs = ProfileAttributes {
        player_xp: badges.player_xp,
        player_xp_needed_to_level_up: badges.player_xp_needed_to_level_up,
        player_xp_needed_current_level: badges.player_xp_needed_current_level,
    };

    Ok(MetricResult::new(badges.player_level.unwrap_or(0)).with_attributes(&attrs)?)
}
