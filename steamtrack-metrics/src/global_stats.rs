//! Library-wide achievement and badge totals.
//!
//! This is the expensive metric: one achievement call per owned game.
//! Calls run in order by default; a fan-out concurrency above one lets
//! that many run at once. Sums do not depend on completion order.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use steamtrack_core::{AchievementProgress, Identity, MetricKind, MetricResult, mean_rounded};
use steamtrack_fetch::{Endpoint, OwnedGamesQuery, SteamGateway};
use tracing::{debug, info, instrument, warn};

use crate::descriptor::{MetricDescriptor, hours};
use crate::error::ReduceError;

/// Descriptor for the global stats metric.
pub fn global_stats_descriptor() -> MetricDescriptor {
    MetricDescriptor::builder(MetricKind::GlobalStats)
        .description("Achievement totals across the whole library, plus badges")
        .interval(hours(5))
        .sources(&[
            Endpoint::OwnedGames,
            Endpoint::PlayerAchievements,
            Endpoint::Badges,
        ])
        .expensive()
        .build()
}

// ============================================================================
// Totals
// ============================================================================

/// Running totals over the games that reported achievements.
#[derive(Debug, Default)]
struct AchievementTotals {
    unlocked: u64,
    possible: u64,
    perfect_games: u32,
    completion_rates: Vec<f64>,
}

impl AchievementTotals {
    /// Games with no achievements contribute nothing.
    fn add(&mut self, progress: &AchievementProgress) {
        let (Some(unlocked), Some(total)) = (progress.unlocked_count, progress.total_count) else {
            return;
        };
        if total == 0 {
            return;
        }
        self.unlocked += u64::from(unlocked);
        self.possible += u64::from(total);
        if progress.is_perfect() {
            self.perfect_games += 1;
        }
        self.completion_rates
            .push(f64::from(unlocked) / f64::from(total) * 100.0);
    }
}

#[derive(Debug, Serialize)]
struct GlobalStatsAttributes {
    achievements_total: u64,
    achievements_possible: u64,
    perfect_games: u32,
    avg_completion_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    badge_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_badge_count: Option<usize>,
}

// ============================================================================
// Reducer
// ============================================================================

/// Value is the number of unlocked achievements across the library.
#[instrument(skip(gateway, identity))]
pub async fn reduce(
    gateway: &dyn SteamGateway,
    identity: &Identity,
    fanout_concurrency: usize,
) -> Result<MetricResult, ReduceError> {
    let started = Instant::now();
    let games = gateway
        .owned_games(identity, OwnedGamesQuery::library_scan())
        .await?;

    let app_ids: Vec<u64> = games.iter().map(|g| g.app_id).filter(|id| *id > 0).collect();
    let scanned = app_ids.len();

    let outcomes: Vec<_> = stream::iter(app_ids)
        .map(|app_id| async move {
            (app_id, gateway.player_achievements(identity, app_id).await)
        })
        .buffered(fanout_concurrency.max(1))
        .collect()
        .await;

    let mut totals = AchievementTotals::default();
    let mut skipped = 0usize;
    for (app_id, outcome) in outcomes {
        match outcome {
            Ok(rows) => totals.add(&AchievementProgress::from_player_achievements(app_id, &rows)),
            Err(e) => {
                skipped += 1;
                debug!(app_id, error = %e, "No achievement data for game");
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, scanned, "Skipped games without achievement data");
    }

    let badges = match gateway.badges(identity).await {
        Ok(badges) => Some(badges),
        Err(e) => {
            warn!(error = %e, "Badges unavailable; omitting badge counts");
            None
        }
    };

    let attrs = GlobalStatsAttributes {
        achievements_total: totals.unlocked,
        achievements_possible: totals.possible,
        perfect_games: totals.perfect_games,
        avg_completion_rate: mean_rounded(&totals.completion_rates),
        badge_count: badges.as_ref().map(|b| b.badges.len()),
        card_badge_count: badges.as_ref().map(steamtrack_core::BadgeSummary::card_badge_count),
    };

    info!(
        games = scanned,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Library scan finished"
    );

    let value = i64::try_from(totals.unlocked).unwrap_or(i64::MAX);
    Ok(MetricResult::new(value).with_attributes(&attrs)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{achievements, identity};
    use steamtrack_core::{Badge, BadgeSummary, GameRecord, MetricValue};
    use steamtrack_fetch::testing::{FakeGateway, GatewayCall};

    fn library() -> FakeGateway {
        FakeGateway::new()
            .with_owned_games(vec![
                GameRecord::new(1, "Perfect", 100),
                GameRecord::new(2, "Half", 100),
                GameRecord::new(3, "No achievements", 100),
                GameRecord::new(4, "No stats", 100),
                GameRecord::new(0, "Bogus id", 100),
            ])
            .with_achievements(1, achievements(4, 4))
            .with_achievements(2, achievements(1, 2))
            .with_achievements(3, Vec::new())
            .with_badges(BadgeSummary {
                badges: vec![
                    Badge::default(),
                    Badge {
                        app_id: Some(440),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            })
    }

    #[tokio::test]
    async fn test_global_stats() {
        let fake = library();
        let result = reduce(&fake, &identity(), 1).await.unwrap();

        assert_eq!(result.value, Some(MetricValue::Integer(5)));
        assert_eq!(result.attribute("achievements_total").unwrap(), 5);
        assert_eq!(result.attribute("achievements_possible").unwrap(), 6);
        assert_eq!(result.attribute("perfect_games").unwrap(), 1);
        assert_eq!(result.attribute("avg_completion_rate").unwrap(), 75.0);
        assert_eq!(result.attribute("badge_count").unwrap(), 2);
        assert_eq!(result.attribute("card_badge_count").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_app_id_never_requested() {
        let fake = library();
        reduce(&fake, &identity(), 1).await.unwrap();

        assert!(!fake.calls().contains(&GatewayCall::PlayerAchievements(0)));
        assert_eq!(
            fake.count_calls(|c| matches!(c, GatewayCall::PlayerAchievements(_))),
            4
        );
    }

    #[tokio::test]
    async fn test_sequential_order_by_default() {
        let fake = library();
        reduce(&fake, &identity(), 1).await.unwrap();

        let order: Vec<u64> = fake
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::PlayerAchievements(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_concurrent_fanout_same_totals() {
        let sequential = reduce(&library(), &identity(), 1).await.unwrap();
        let concurrent = reduce(&library(), &identity(), 4).await.unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn test_empty_library_mean_is_zero() {
        let fake = FakeGateway::new();
        let result = reduce(&fake, &identity(), 1).await.unwrap();

        assert_eq!(result.value, Some(MetricValue::Integer(0)));
        assert_eq!(result.attribute("avg_completion_rate").unwrap(), 0.0);
        assert_eq!(result.attribute("badge_count").unwrap(), 0);
    }

    #[tokio::test]
    async fn test_badge_failure_omits_badge_fields() {
        let fake = library().fail_when(|c| matches!(c, GatewayCall::Badges));
        let result = reduce(&fake, &identity(), 1).await.unwrap();

        assert_eq!(result.value, Some(MetricValue::Integer(5)));
        assert!(result.attribute("badge_count").is_none());
        assert!(result.attribute("card_badge_count").is_none());
    }

    #[tokio::test]
    async fn test_library_failure_propagates() {
        let fake = FakeGateway::new().fail_when(|c| matches!(c, GatewayCall::OwnedGames { .. }));
        assert!(reduce(&fake, &identity(), 1).await.is_err());
    }
}
