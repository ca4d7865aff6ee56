//! Achievement progress of recently played games.
//!
//! For each recent game the unlocked count comes from the player's rows
//! and the total from the game schema. Either side may fail on its own.

use serde::Serialize;
use steamtrack_core::{AchievementProgress, Identity, MetricKind, MetricResult, MetricValue};
use steamtrack_fetch::{Endpoint, SteamGateway};
use tracing::{instrument, warn};

use crate::descriptor::{MetricDescriptor, hours};
use crate::error::ReduceError;

/// Descriptor for the recent achievements metric.
pub fn recent_achievements_descriptor() -> MetricDescriptor {
    MetricDescriptor::builder(MetricKind::RecentAchievements)
        .description("Achievement progress of recently played games")
        .interval(hours(3))
        .sources(&[
            Endpoint::RecentlyPlayed,
            Endpoint::PlayerAchievements,
            Endpoint::GameSchema,
        ])
        .build()
}

#[derive(Debug, Serialize)]
struct RecentAchievement {
    app_id: u64,
    name: Option<String>,
    unlocked: Option<u32>,
    total: Option<u32>,
    percent: Option<f64>,
    logo_url: String,
}

#[derive(Debug, Serialize)]
struct RecentAchievementsAttributes {
    recent_achievements: Vec<RecentAchievement>,
}

/// Value is the number of games looked at, whether or not their lookups
/// succeeded.
#[instrument(skip(gateway, identity))]
pub async fn reduce(
    gateway: &dyn SteamGateway,
    identity: &Identity,
    count: u32,
) -> Result<MetricResult, ReduceError> {
    let recent = gateway.recently_played(identity, count).await?;

    let mut entries = Vec::with_capacity(recent.games.len());
    for game in &recent.games {
        let unlocked = match gateway.player_achievements(identity, game.app_id).await {
            Ok(rows) => u32::try_from(rows.iter().filter(|a| a.is_unlocked()).count()).ok(),
            Err(e) => {
                warn!(app_id = game.app_id, error = %e, "Player achievements unavailable");
                None
            }
        };

        let total = match gateway.game_schema(identity, game.app_id).await {
            Ok(rows) => u32::try_from(rows.len()).ok(),
            Err(e) => {
                warn!(app_id = game.app_id, error = %e, "Achievement schema unavailable");
                None
            }
        };

        let progress = AchievementProgress::from_counts(game.app_id, unlocked, total);
        entries.push(RecentAchievement {
            app_id: game.app_id,
            name: game.name.clone(),
            unlocked: progress.unlocked_count,
            total: progress.total_count,
            percent: progress.percent,
            logo_url: gateway.logo_url(game.app_id),
        });
    }

    let value = MetricValue::count(entries.len());
    let attrs = RecentAchievementsAttributes {
        recent_achievements: entries,
    };
    Ok(MetricResult::new(value).with_attributes(&attrs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{achievements, identity, schema};
    use steamtrack_core::{GameRecord, RecentlyPlayed};
    use steamtrack_fetch::DEFAULT_RECENT_COUNT;
    use steamtrack_fetch::testing::{FakeGateway, GatewayCall};

    fn recent(ids: &[u64]) -> RecentlyPlayed {
        RecentlyPlayed {
            total_count: u32::try_from(ids.len()).unwrap(),
            games: ids
                .iter()
                .map(|id| GameRecord::new(*id, format!("Game {id}"), 100))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_recent_achievements() {
        let fake = FakeGateway::new()
            .with_recent(recent(&[10, 20]))
            .with_achievements(10, achievements(3, 4))
            .with_schema(10, schema(4))
            .with_achievements(20, achievements(0, 0))
            .with_schema(20, schema(0));
        let result = reduce(&fake, &identity(), DEFAULT_RECENT_COUNT).await.unwrap();

        assert_eq!(result.value, Some(MetricValue::Integer(2)));
        let list = result.attribute("recent_achievements").unwrap().as_array().unwrap();
        assert_eq!(list[0]["app_id"], 10);
        assert_eq!(list[0]["unlocked"], 3);
        assert_eq!(list[0]["total"], 4);
        assert_eq!(list[0]["percent"], 75.0);
        assert_eq!(list[1]["total"], 0);
        assert!(list[1]["percent"].is_null());
    }

    #[tokio::test]
    async fn test_value_counts_attempted_games() {
        let fake = FakeGateway::new()
            .with_recent(recent(&[1, 2, 3]))
            .fail_when(|c| {
                matches!(
                    c,
                    GatewayCall::PlayerAchievements(_) | GatewayCall::GameSchema(_)
                )
            });
        let result = reduce(&fake, &identity(), DEFAULT_RECENT_COUNT).await.unwrap();

        assert_eq!(result.value, Some(MetricValue::Integer(3)));
        let list = result.attribute("recent_achievements").unwrap().as_array().unwrap();
        for entry in list {
            assert!(entry["unlocked"].is_null());
            assert!(entry["total"].is_null());
            assert!(entry["percent"].is_null());
        }
    }

    #[tokio::test]
    async fn test_independent_sides() {
        let fake = FakeGateway::new()
            .with_recent(recent(&[10]))
            .with_achievements(10, achievements(2, 5))
            .fail_when(|c| matches!(c, GatewayCall::GameSchema(_)));
        let result = reduce(&fake, &identity(), DEFAULT_RECENT_COUNT).await.unwrap();

        let entry = &result.attribute("recent_achievements").unwrap()[0];
        assert_eq!(entry["unlocked"], 2);
        assert!(entry["total"].is_null());
        assert!(entry["percent"].is_null());
    }

    #[tokio::test]
    async fn test_recent_call_failure_propagates() {
        let fake = FakeGateway::new().fail_when(|c| matches!(c, GatewayCall::RecentlyPlayed(_)));
        assert!(reduce(&fake, &identity(), DEFAULT_RECENT_COUNT).await.is_err());
    }

    #[tokio::test]
    async fn test_order_preserved() {
        let fake = FakeGateway::new().with_recent(recent(&[30, 10, 20]));
        let result = reduce(&fake, &identity(), DEFAULT_RECENT_COUNT).await.unwrap();

        let ids: Vec<u64> = result.attribute("recent_achievements").unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["app_id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }
}
