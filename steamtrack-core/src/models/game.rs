//! Game records returned by the owned-games and recently-played endpoints.

use serde::{Deserialize, Serialize};

use crate::stats::minutes_to_hours;

/// One game from a player's library or recent activity.
///
/// Field names follow the Steam Web API payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Steam application id.
    #[serde(rename = "appid", default)]
    pub app_id: u64,
    /// Title; absent when the library was fetched without app info.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Lifetime playtime in minutes.
    #[serde(rename = "playtime_forever", default)]
    pub playtime_minutes_total: u64,
    /// Playtime over the last two weeks in minutes.
    #[serde(rename = "playtime_2weeks", default)]
    pub playtime_minutes_2weeks: u64,
    /// Unix timestamp of the last session.
    #[serde(rename = "rtime_last_played", default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<i64>,
}

impl GameRecord {
    /// Creates a record with a name and lifetime playtime.
    pub fn new(app_id: u64, name: impl Into<String>, playtime_minutes_total: u64) -> Self {
        Self {
            app_id,
            name: Some(name.into()),
            playtime_minutes_total,
            ..Default::default()
        }
    }

    /// Lifetime playtime in hours, one decimal.
    pub fn total_hours(&self) -> f64 {
        minutes_to_hours(self.playtime_minutes_total)
    }

    /// Two-week playtime in hours, one decimal.
    pub fn recent_hours(&self) -> f64 {
        minutes_to_hours(self.playtime_minutes_2weeks)
    }

    /// The name, or the empty string when absent.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Response of the recently-played endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentlyPlayed {
    /// Number of games played in the last two weeks, as reported upstream.
    #[serde(default)]
    pub total_count: u32,
    /// The most recent games, most recent first.
    #[serde(default)]
    pub games: Vec<GameRecord>,
}
