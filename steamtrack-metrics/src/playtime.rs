//! Library playtime metric.
//!
//! Reads the whole library with names, then enriches only the five most
//! played games with achievement progress.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;
use steamtrack_core::{
    AchievementProgress, GameRecord, Identity, MetricKind, MetricResult, minutes_to_hours,
};
use steamtrack_fetch::{Endpoint, OwnedGamesQuery, SteamGateway};
use tracing::{debug, instrument, warn};

use crate::descriptor::{MetricDescriptor, hours};
use crate::error::ReduceError;

/// How many games get the detailed treatment.
pub const TOP_GAMES: usize = 5;

/// Games under this many minutes count toward the pile of shame.
pub const PILE_OF_SHAME_MINUTES: u64 = 60;

/// Descriptor for the playtime metric.
pub fn playtime_descriptor() -> MetricDescriptor {
    MetricDescriptor::builder(MetricKind::Playtime)
        .description("Total playtime and most played games")
        .interval(hours(3))
        .unit("h")
        .sources(&[Endpoint::OwnedGames, Endpoint::PlayerAchievements])
        .build()
}

// ============================================================================
// Attributes
// ============================================================================

#[derive(Debug, Serialize)]
struct TopGame {
    app_id: u64,
    name: Option<String>,
    hours: f64,
    logo_url: String,
    achievements_unlocked: Option<u32>,
    achievements_total: Option<u32>,
    achievements_percent: Option<f64>,
}

#[derive(Debug, Serialize)]
struct GameHours<'a> {
    name: Option<&'a str>,
    hours: f64,
}

#[derive(Debug, Serialize)]
struct PlaytimeAttributes<'a> {
    top_5_games: Vec<TopGame>,
    all_games: Vec<GameHours<'a>>,
    game_count: usize,
    total_playtime_hours: f64,
    top_5_playtime_hours: f64,
    playtime_by_app_id: BTreeMap<String, f64>,
    pile_of_shame_count: usize,
}

// ============================================================================
// Reducer
// ============================================================================

/// Value is total playtime in hours.
#[instrument(skip_all)]
pub async fn reduce(
    gateway: &dyn SteamGateway,
    identity: &Identity,
) -> Result<MetricResult, ReduceError> {
    let games = gateway
        .owned_games(identity, OwnedGamesQuery::with_app_info())
        .await?;

    if games.is_empty() {
        return Ok(MetricResult::new(0i64).with_attribute("top_5_games", json!([])));
    }

    let total_minutes: u64 = games.iter().map(|g| g.playtime_minutes_total).sum();
    let total_playtime_hours = minutes_to_hours(total_minutes);

    let top = top_games(&games);
    let top_minutes: u64 = top.iter().map(|g| g.playtime_minutes_total).sum();

    let mut top_5_games = Vec::with_capacity(top.len());
    for game in top {
        let progress = achievement_progress(gateway, identity, game.app_id).await;
        top_5_games.push(TopGame {
            app_id: game.app_id,
            name: game.name.clone(),
            hours: game.total_hours(),
            logo_url: gateway.logo_url(game.app_id),
            achievements_unlocked: progress.unlocked_count,
            achievements_total: progress.total_count,
            achievements_percent: progress.percent,
        });
    }

    let attrs = PlaytimeAttributes {
        top_5_games,
        all_games: all_games_by_name(&games),
        game_count: games.len(),
        total_playtime_hours,
        top_5_playtime_hours: minutes_to_hours(top_minutes),
        playtime_by_app_id: games
            .iter()
            .map(|g| (g.app_id.to_string(), g.total_hours()))
            .collect(),
        pile_of_shame_count: pile_of_shame(&games),
    };

    debug!(games = games.len(), total_playtime_hours, "Playtime reduced");
    Ok(MetricResult::new(total_playtime_hours).with_attributes(&attrs)?)
}

/// The most played games, descending, stable on ties.
fn top_games(games: &[GameRecord]) -> Vec<&GameRecord> {
    let mut ranked: Vec<&GameRecord> = games.iter().collect();
    ranked.sort_by(|a, b| b.playtime_minutes_total.cmp(&a.playtime_minutes_total));
    ranked.truncate(TOP_GAMES);
    ranked
}

/// Every game with its hours, by name ascending.
fn all_games_by_name(games: &[GameRecord]) -> Vec<GameHours<'_>> {
    let mut sorted: Vec<&GameRecord> = games.iter().collect();
    sorted.sort_by(|a, b| a.name_or_empty().cmp(b.name_or_empty()));
    sorted
        .into_iter()
        .map(|g| GameHours {
            name: g.name.as_deref(),
            hours: g.total_hours(),
        })
        .collect()
}

fn pile_of_shame(games: &[GameRecord]) -> usize {
    games
        .iter()
        .filter(|g| g.playtime_minutes_total < PILE_OF_SHAME_MINUTES)
        .count()
}

async fn achievement_progress(
    gateway: &dyn SteamGateway,
    identity: &Identity,
    app_id: u64,
) -> AchievementProgress {
    match gateway.player_achievements(identity, app_id).await {
        Ok(rows) => AchievementProgress::from_player_achievements(app_id, &rows),
        Err(e) => {
            warn!(app_id, error = %e, "Achievements unavailable for top game");
            AchievementProgress::unknown(app_id)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{achievements, identity};
    use steamtrack_core::MetricValue;
    use steamtrack_fetch::testing::{FakeGateway, GatewayCall};

    #[tokio::test]
    async fn test_two_game_scenario() {
        let fake = FakeGateway::new()
            .with_owned_games(vec![GameRecord::new(1, "A", 30), GameRecord::new(2, "B", 90)])
            .with_achievements(1, achievements(1, 4))
            .with_achievements(2, achievements(2, 2));
        let result = reduce(&fake, &identity()).await.unwrap();

        assert_eq!(result.value, Some(MetricValue::Float(2.0)));
        assert_eq!(result.attribute("game_count").unwrap(), 2);
        assert_eq!(result.attribute("pile_of_shame_count").unwrap(), 1);
        assert_eq!(
            result.attribute("all_games").unwrap(),
            &json!([{"name": "A", "hours": 0.5}, {"name": "B", "hours": 1.5}])
        );

        let top = result.attribute("top_5_games").unwrap().as_array().unwrap();
        assert_eq!(top[0]["app_id"], 2);
        assert_eq!(top[0]["achievements_percent"], 100.0);
        assert_eq!(top[1]["app_id"], 1);
        assert_eq!(top[1]["achievements_unlocked"], 1);
        assert_eq!(top[1]["achievements_total"], 4);
        assert_eq!(top[1]["achievements_percent"], 25.0);
        assert_eq!(
            top[1]["logo_url"],
            "https://cdn.cloudflare.steamstatic.com/steam/apps/1/header.jpg"
        );
    }

    #[tokio::test]
    async fn test_empty_library() {
        let fake = FakeGateway::new();
        let result = reduce(&fake, &identity()).await.unwrap();

        assert_eq!(result.value, Some(MetricValue::Integer(0)));
        assert_eq!(result.attributes.len(), 1);
        assert_eq!(result.attribute("top_5_games").unwrap(), &json!([]));
    }

    #[tokio::test]
    async fn test_top_five_descending_and_stable() {
        let games = vec![
            GameRecord::new(1, "a", 10),
            GameRecord::new(2, "b", 500),
            GameRecord::new(3, "c", 200),
            GameRecord::new(4, "d", 200),
            GameRecord::new(5, "e", 0),
            GameRecord::new(6, "f", 300),
            GameRecord::new(7, "g", 200),
        ];
        let fake = FakeGateway::new().with_owned_games(games);
        let result = reduce(&fake, &identity()).await.unwrap();

        let ids: Vec<u64> = result.attribute("top_5_games").unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["app_id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 6, 3, 4, 7]);
        assert_eq!(result.attribute("top_5_playtime_hours").unwrap(), 23.3);

        // Only the top five are enriched.
        assert_eq!(
            fake.count_calls(|c| matches!(c, GatewayCall::PlayerAchievements(_))),
            5
        );
    }

    #[tokio::test]
    async fn test_per_game_failure_keeps_both_games() {
        let fake = FakeGateway::new()
            .with_owned_games(vec![GameRecord::new(1, "A", 30), GameRecord::new(2, "B", 90)])
            .with_achievements(1, achievements(3, 3))
            .with_achievements(2, achievements(1, 2))
            .fail_when(|c| matches!(c, GatewayCall::PlayerAchievements(2)));
        let result = reduce(&fake, &identity()).await.unwrap();

        let top = result.attribute("top_5_games").unwrap().as_array().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0]["name"], "B");
        assert!(top[0]["achievements_unlocked"].is_null());
        assert!(top[0]["achievements_total"].is_null());
        assert!(top[0]["achievements_percent"].is_null());
        assert_eq!(top[1]["name"], "A");
        assert_eq!(top[1]["achievements_percent"], 100.0);
    }

    #[tokio::test]
    async fn test_zero_achievement_game_has_null_percent() {
        let fake = FakeGateway::new()
            .with_owned_games(vec![GameRecord::new(1, "A", 30)])
            .with_achievements(1, Vec::new());
        let result = reduce(&fake, &identity()).await.unwrap();

        let top = &result.attribute("top_5_games").unwrap()[0];
        assert_eq!(top["achievements_total"], 0);
        assert!(top["achievements_percent"].is_null());
    }

    #[tokio::test]
    async fn test_pile_of_shame_boundary() {
        let fake = FakeGateway::new().with_owned_games(vec![
            GameRecord::new(1, "A", 59),
            GameRecord::new(2, "B", 60),
            GameRecord::new(3, "C", 0),
        ]);
        let result = reduce(&fake, &identity()).await.unwrap();
        assert_eq!(result.attribute("pile_of_shame_count").unwrap(), 2);
    }

    #[tokio::test]
    async fn test_nameless_games_sort_first() {
        let mut nameless = GameRecord::new(3, "", 10);
        nameless.name = None;
        let fake = FakeGateway::new().with_owned_games(vec![
            GameRecord::new(1, "b", 10),
            GameRecord::new(2, "B", 10),
            nameless,
        ]);
        let result = reduce(&fake, &identity()).await.unwrap();

        let names: Vec<_> = result.attribute("all_games").unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["name"].clone())
            .collect();
        assert_eq!(names, vec![json!(null), json!("B"), json!("b")]);
    }

    #[tokio::test]
    async fn test_playtime_by_app_id_key_sorted() {
        let fake = FakeGateway::new().with_owned_games(vec![
            GameRecord::new(20, "X", 120),
            GameRecord::new(100, "Y", 60),
        ]);
        let result = reduce(&fake, &identity()).await.unwrap();

        let map = result.attribute("playtime_by_app_id").unwrap().as_object().unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["100", "20"]);
        assert_eq!(map["20"], 2.0);
    }
}
