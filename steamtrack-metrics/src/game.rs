//! Current game metric.

use serde::Serialize;
use steamtrack_core::{Identity, MetricKind, MetricResult};
use steamtrack_fetch::{Endpoint, OwnedGamesQuery, SteamGateway};
use tracing::{instrument, warn};

use crate::descriptor::{MetricDescriptor, minutes};
use crate::error::ReduceError;

/// Value reported when nothing is being played.
pub const NO_GAME: &str = "none";

/// Descriptor for the game metric.
pub fn game_descriptor() -> MetricDescriptor {
    MetricDescriptor::builder(MetricKind::Game)
        .description("Game currently being played")
        .interval(minutes(5))
        .sources(&[Endpoint::PlayerSummary, Endpoint::OwnedGames])
        .build()
}

#[derive(Debug, Serialize)]
struct GameAttributes<'a> {
    game_id: Option<&'a str>,
    name: &'a str,
    persona_name: Option<&'a str>,
    logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_playtime_hours: Option<f64>,
}

/// Value is the current game's name, or `"none"`.
///
/// Lifetime playtime for the game comes from a secondary library lookup;
/// when that fails the field is left out.
#[instrument(skip_all)]
pub async fn reduce(
    gateway: &dyn SteamGateway,
    identity: &Identity,
) -> Result<MetricResult, ReduceError> {
    let summary = gateway.player_summary(identity).await?;

    let Some(name) = summary.current_game() else {
        return Ok(MetricResult::new(NO_GAME));
    };

    let app_id = summary.current_app_id();
    let total_playtime_hours = match app_id {
        Some(app_id) => match gateway.owned_games(identity, OwnedGamesQuery::ids_only()).await {
            Ok(games) => games
                .iter()
                .find(|g| g.app_id == app_id)
                .map(steamtrack_core::GameRecord::total_hours),
            Err(e) => {
                warn!(app_id, error = %e, "Playtime lookup for current game failed");
                None
            }
        },
        None => None,
    };

    let attrs = GameAttributes {
        game_id: summary.game_id.as_deref(),
        name,
        persona_name: summary.persona_name.as_deref(),
        logo_url: app_id.map(|id| gateway.logo_url(id)),
        total_playtime_hours,
    };

    Ok(MetricResult::new(name).with_attributes(&attrs)?)
}
