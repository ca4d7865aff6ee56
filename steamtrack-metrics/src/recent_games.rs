//! Recently played games metric.

use serde::Serialize;
use serde_json::json;
use steamtrack_core::{Identity, MetricKind, MetricResult};
use steamtrack_fetch::{Endpoint, SteamGateway};
use tracing::instrument;

use crate::descriptor::{MetricDescriptor, minutes};
use crate::error::ReduceError;

/// Value reported when nothing was played recently.
pub const NO_RECENT_GAME: &str = "none";

/// Value reported when the most recent game has no name.
pub const UNKNOWN_GAME: &str = "unknown";

/// Descriptor for the recent games metric.
pub fn recent_games_descriptor() -> MetricDescriptor {
    MetricDescriptor::builder(MetricKind::RecentGames)
        .description("Games played in the last two weeks")
        .interval(minutes(10))
        .sources(&[Endpoint::RecentlyPlayed])
        .build()
}

#[derive(Debug, Serialize)]
struct RecentGame<'a> {
    app_id: u64,
    name: Option<&'a str>,
    playtime_2weeks_hours: f64,
    playtime_total_hours: f64,
    logo_url: String,
    last_played: Option<i64>,
}

#[derive(Debug, Serialize)]
struct RecentGamesAttributes<'a> {
    recent_games: Vec<RecentGame<'a>>,
    game_count: u32,
}

/// Value is the most recent game's name.
///
/// Games keep the upstream order, most recent first.
#[instrument(skip(gateway, identity))]
pub async fn reduce(
    gateway: &dyn SteamGateway,
    identity: &Identity,
    count: u32,
) -> Result<MetricResult, ReduceError> {
    let recent = gateway.recently_played(identity, count).await?;

    let Some(first) = recent.games.first() else {
        return Ok(MetricResult::new(NO_RECENT_GAME).with_attribute("recent_games", json!([])));
    };
    let value = first.name.as_deref().unwrap_or(UNKNOWN_GAME).to_string();

    let attrs = RecentGamesAttributes {
        recent_games: recent
            .games
            .iter()
            .map(|g| RecentGame {
                app_id: g.app_id,
                name: g.name.as_deref(),
                playtime_2weeks_hours: g.recent_hours(),
                playtime_total_hours: g.total_hours(),
                logo_url: gateway.logo_url(g.app_id),
                last_played: g.last_played,
            })
            .collect(),
        game_count: recent.total_count,
    };

    Ok(MetricResult::new(value).with_attributes(&attrs)?)
}
