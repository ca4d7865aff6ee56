//! Badges and level progression.

use serde::{Deserialize, Serialize};

/// One community badge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Badge id within its family.
    #[serde(rename = "badgeid", default)]
    pub badge_id: Option<u64>,
    /// Badge level.
    #[serde(default)]
    pub level: Option<u32>,
    /// XP granted by the badge.
    #[serde(default)]
    pub xp: Option<u64>,
    /// Owning app; present only on trading-card badges.
    #[serde(rename = "appid", default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u64>,
    /// Unix timestamp of completion.
    #[serde(default)]
    pub completion_time: Option<i64>,
}

impl Badge {
    /// Whether this badge was crafted from trading cards.
    pub fn is_card_badge(&self) -> bool {
        self.app_id.is_some()
    }
}

/// Response of the badges endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeSummary {
    /// All badges.
    #[serde(default)]
    pub badges: Vec<Badge>,
    /// Steam level.
    #[serde(default)]
    pub player_level: Option<u32>,
    /// Total XP.
    #[serde(default)]
    pub player_xp: Option<u64>,
    /// XP still needed for the next level.
    #[serde(default)]
    pub player_xp_needed_to_level_up: Option<u64>,
    /// XP at which the current level started.
    #[serde(default)]
    pub player_xp_needed_current_level: Option<u64>,
}

impl BadgeSummary {
    /// Number of trading-card badges.
    pub fn card_badge_count(&self) -> usize {
        self.badges.iter().filter(|b| b.is_card_badge()).count()
    }
}
