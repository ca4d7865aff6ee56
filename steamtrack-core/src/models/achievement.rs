//! Achievement rows and derived progress.

use serde::{Deserialize, Serialize};

use crate::stats::completion_percent;

/// One achievement of one game, as seen by a specific player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAchievement {
    /// Internal achievement name.
    #[serde(rename = "apiname")]
    pub api_name: String,
    /// `1` when unlocked.
    #[serde(default)]
    pub achieved: u8,
    /// Unix timestamp of the unlock, `0` when locked.
    #[serde(rename = "unlocktime", default, skip_serializing_if = "Option::is_none")]
    pub unlock_time: Option<i64>,
}

impl PlayerAchievement {
    /// Creates a row with the given unlock flag.
    pub fn new(api_name: impl Into<String>, unlocked: bool) -> Self {
        Self {
            api_name: api_name.into(),
            achieved: u8::from(unlocked),
            unlock_time: None,
        }
    }

    /// Whether the player has unlocked this achievement.
    pub fn is_unlocked(&self) -> bool {
        self.achieved == 1
    }
}

/// One achievement definition from a game's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaAchievement {
    /// Internal achievement name.
    pub name: String,
    /// Human-readable title.
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl SchemaAchievement {
    /// Creates a schema row.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
        }
    }
}

/// Unlocked/total counts for one game with the derived completion percent.
///
/// `percent` is only present when both counts are known and the total is
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AchievementProgress {
    /// Steam application id.
    pub app_id: u64,
    /// Achievements unlocked, if known.
    pub unlocked_count: Option<u32>,
    /// Achievements available, if known.
    pub total_count: Option<u32>,
    /// Completion percent in `[0, 100]`, one decimal.
    pub percent: Option<f64>,
}

impl AchievementProgress {
    /// Progress with nothing known.
    pub fn unknown(app_id: u64) -> Self {
        Self::from_counts(app_id, None, None)
    }

    /// Builds progress from independently known counts.
    pub fn from_counts(app_id: u64, unlocked_count: Option<u32>, total_count: Option<u32>) -> Self {
        let percent = match (unlocked_count, total_count) {
            (Some(unlocked), Some(total)) => completion_percent(unlocked, total),
            _ => None,
        };
        Self {
            app_id,
            unlocked_count,
            total_count,
            percent,
        }
    }

    /// Builds progress from a player's achievement rows for one game.
    pub fn from_player_achievements(app_id: u64, achievements: &[PlayerAchievement]) -> Self {
        let unlocked = achievements.iter().filter(|a| a.is_unlocked()).count();
        Self::from_counts(
            app_id,
            Some(u32::try_from(unlocked).unwrap_or(u32::MAX)),
            Some(u32::try_from(achievements.len()).unwrap_or(u32::MAX)),
        )
    }

    /// Every achievement unlocked, with at least one available.
    pub fn is_perfect(&self) -> bool {
        matches!(
            (self.unlocked_count, self.total_count),
            (Some(unlocked), Some(total)) if total > 0 && unlocked == total
        )
    }
}
