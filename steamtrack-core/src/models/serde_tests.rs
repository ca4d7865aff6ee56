//! Serde tests for core types.
//!
//! These tests feed payload fragments shaped like the Steam Web API
//! responses into the models and check the serialized metric shapes.

use serde_json::json;

use crate::{
    BadgeSummary, FriendListEntry, FriendRecord, GameRecord, MetricKind, MetricResult,
    MetricSnapshot, MetricValue, PersonaState, PlayerSummary, RecentlyPlayed, SchemaAchievement,
};

// ============================================================================
// MetricKind Serde Tests
// ============================================================================

#[test]
fn test_metric_kind_serde_roundtrip_all_variants() {
    for kind in MetricKind::all() {
        let json = serde_json::to_string(kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.id()));
        let back: MetricKind = serde_json::from_str(&json).unwrap();
        assert_eq!(*kind, back);
    }
}

#[test]
fn test_metric_kind_invalid_deserialize() {
    let result: Result<MetricKind, _> = serde_json::from_str(r#""achievements""#);
    assert!(result.is_err());
}

// ============================================================================
// Steam Payload Tests
// ============================================================================

#[test]
fn test_game_record_from_owned_games_row() {
    let game: GameRecord = serde_json::from_value(json!({
        "appid": 570,
        "name": "Dota 2",
        "playtime_forever": 125,
        "img_icon_url": "0bbb630d",
        "playtime_windows_forever": 125,
        "rtime_last_played": 1_700_000_000
    }))
    .unwrap();

    assert_eq!(game.app_id, 570);
    assert_eq!(game.name.as_deref(), Some("Dota 2"));
    assert_eq!(game.playtime_minutes_total, 125);
    assert_eq!(game.playtime_minutes_2weeks, 0);
    assert_eq!(game.last_played, Some(1_700_000_000));
    assert!((game.total_hours() - 2.1).abs() < f64::EPSILON);
}

#[test]
fn test_game_record_without_app_info() {
    let game: GameRecord = serde_json::from_value(json!({
        "appid": 10,
        "playtime_forever": 0
    }))
    .unwrap();
    assert_eq!(game.name, None);
    assert_eq!(game.name_or_empty(), "");
}

#[test]
fn test_recently_played_defaults() {
    let recent: RecentlyPlayed = serde_json::from_value(json!({})).unwrap();
    assert_eq!(recent.total_count, 0);
    assert!(recent.games.is_empty());

    let recent: RecentlyPlayed = serde_json::from_value(json!({
        "total_count": 3,
        "games": [{"appid": 1, "name": "A", "playtime_2weeks": 90, "playtime_forever": 600}]
    }))
    .unwrap();
    assert_eq!(recent.total_count, 3);
    assert!((recent.games[0].recent_hours() - 1.5).abs() < f64::EPSILON);
}

#[test]
fn test_schema_achievement_display_name() {
    let row: SchemaAchievement = serde_json::from_value(json!({
        "name": "ACH_WIN_ONE_GAME",
        "defaultvalue": 0,
        "displayName": "Winner",
        "hidden": 0
    }))
    .unwrap();
    assert_eq!(row.display_name.as_deref(), Some("Winner"));
}

#[test]
fn test_player_summary_from_payload() {
    let summary: PlayerSummary = serde_json::from_value(json!({
        "steamid": "76561197960435530",
        "personaname": "Robin",
        "profileurl": "https://steamcommunity.com/id/robinwalker/",
        "avatarfull": "https://avatars.example/full.jpg",
        "personastate": 3,
        "lastlogoff": 1_700_000_000,
        "gameextrainfo": "Team Fortress 2",
        "gameid": "440"
    }))
    .unwrap();

    assert_eq!(summary.persona(), PersonaState::Away);
    assert_eq!(summary.current_game(), Some("Team Fortress 2"));
    assert_eq!(summary.current_app_id(), Some(440));
}

#[test]
fn test_badge_summary_card_badges() {
    let badges: BadgeSummary = serde_json::from_value(json!({
        "badges": [
            {"badgeid": 1, "level": 5, "xp": 250},
            {"badgeid": 1, "appid": 440, "level": 1, "xp": 100},
            {"badgeid": 1, "appid": 570, "level": 2, "xp": 200}
        ],
        "player_xp": 1550,
        "player_level": 12,
        "player_xp_needed_to_level_up": 50,
        "player_xp_needed_current_level": 1500
    }))
    .unwrap();

    assert_eq!(badges.badges.len(), 3);
    assert_eq!(badges.card_badge_count(), 2);
    assert_eq!(badges.player_level, Some(12));
}

#[test]
fn test_friend_list_entry_from_payload() {
    let entry: FriendListEntry = serde_json::from_value(json!({
        "steamid": "76561197960265731",
        "relationship": "friend",
        "friend_since": 0
    }))
    .unwrap();
    assert_eq!(entry.steam_id, "76561197960265731");
}

// ============================================================================
// Metric Output Tests
// ============================================================================

#[test]
fn test_persona_state_serializes_as_label() {
    let friend = FriendRecord::from(&PlayerSummary {
        steam_id: "1".to_string(),
        persona_state: Some(5),
        ..Default::default()
    });
    let value = serde_json::to_value(&friend).unwrap();
    assert_eq!(value["status"], "Looking to trade");
    assert_eq!(value["display_name"], serde_json::Value::Null);
}

#[test]
fn test_metric_value_untagged() {
    assert_eq!(serde_json::to_value(MetricValue::Integer(4)).unwrap(), json!(4));
    assert_eq!(serde_json::to_value(MetricValue::Float(2.0)).unwrap(), json!(2.0));
    assert_eq!(serde_json::to_value(MetricValue::from("none")).unwrap(), json!("none"));
}

#[test]
fn test_metric_snapshot_roundtrip() {
    let result = MetricResult::new(2.0)
        .with_attribute("game_count", 2)
        .with_attribute("top_5_games", json!([]));
    let snapshot = MetricSnapshot::new(MetricKind::Playtime, result.clone());

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: MetricSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind, MetricKind::Playtime);
    assert_eq!(back.result, result);
}

#[test]
fn test_cleared_result_serializes_null_value() {
    let value = serde_json::to_value(MetricResult::cleared()).unwrap();
    assert_eq!(value, json!({"value": null, "attributes": {}}));
}
