//! Integration tests for metric results built the way reducers build them.

use serde::Serialize;
use serde_json::json;
use steamtrack_core::{
    AchievementProgress, GameRecord, MetricKind, MetricResult, MetricSnapshot, MetricValue,
    completion_percent, minutes_to_hours,
};

#[derive(Serialize)]
struct TopGame {
    app_id: u64,
    name: Option<String>,
    hours: f64,
    achievements_percent: Option<f64>,
}

#[test]
fn test_result_from_struct_attributes() {
    let games = [GameRecord::new(1, "A", 30), GameRecord::new(2, "B", 90)];
    let total: u64 = games.iter().map(|g| g.playtime_minutes_total).sum();

    let top: Vec<TopGame> = games
        .iter()
        .map(|g| TopGame {
            app_id: g.app_id,
            name: g.name.clone(),
            hours: g.total_hours(),
            achievements_percent: AchievementProgress::unknown(g.app_id).percent,
        })
        .collect();

    #[derive(Serialize)]
    struct Attrs {
        top_5_games: Vec<TopGame>,
        total_playtime_hours: f64,
    }

    let result = MetricResult::new(minutes_to_hours(total))
        .with_attributes(&Attrs {
            top_5_games: top,
            total_playtime_hours: minutes_to_hours(total),
        })
        .unwrap();

    assert_eq!(result.value, Some(MetricValue::Float(2.0)));
    assert_eq!(
        result.attribute("top_5_games").unwrap()[1],
        json!({"app_id": 2, "name": "B", "hours": 1.5, "achievements_percent": null})
    );
}

#[test]
fn test_percent_bounds() {
    for total in 0..20u32 {
        for unlocked in 0..25u32 {
            match completion_percent(unlocked, total) {
                None => assert_eq!(total, 0),
                Some(p) => assert!((0.0..=100.0).contains(&p)),
            }
        }
    }
}

#[test]
fn test_snapshot_for_every_kind() {
    for kind in MetricKind::all() {
        let snapshot = MetricSnapshot::new(*kind, MetricResult::cleared());
        assert!(snapshot.result.is_cleared());
        assert!(snapshot.updated_at <= chrono::Utc::now());
        assert!(kind.unique_id("42").starts_with("42_"));
    }
}
