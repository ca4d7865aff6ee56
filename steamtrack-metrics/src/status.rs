//! Online status metric.

use serde::Serialize;
use steamtrack_core::{Identity, MetricKind, MetricResult};
use steamtrack_fetch::{Endpoint, SteamGateway};
use tracing::instrument;

use crate::descriptor::{MetricDescriptor, minutes};
use crate::error::ReduceError;

/// Descriptor for the status metric.
pub fn status_descriptor() -> MetricDescriptor {
    MetricDescriptor::builder(MetricKind::Status)
        .description("Online status and profile links")
        .interval(minutes(1))
        .sources(&[Endpoint::PlayerSummary])
        .build()
}

#[derive(Debug, Serialize)]
struct StatusAttributes<'a> {
    persona_name: Option<&'a str>,
    profile_url: Option<&'a str>,
    avatar_url: Option<&'a str>,
    last_logoff: Option<i64>,
}

/// Value is the persona-state label.
#[instrument(skip_all)]
pub async fn reduce(
    gateway: &dyn SteamGateway,
    identity: &Identity,
) -> Result<MetricResult, ReduceError> {
    let summary = gateway.player_summary(identity).await?;

    let attrs = StatusAttributes {
        persona_name: summary.persona_name.as_deref(),
        profile_url: summary.profile_url.as_deref(),
        avatar_url: summary.avatar_url.as_deref(),
        last_logoff: summary.last_logoff,
    };

    Ok(MetricResult::new(summary.persona().label()).with_attributes(&attrs)?)
}
