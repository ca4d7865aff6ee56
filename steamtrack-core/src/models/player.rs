//! Player-related types.
//!
//! - [`PersonaState`] - Online status decoded from its integer code
//! - [`PlayerSummary`] - Profile fields from `GetPlayerSummaries`
//! - [`FriendListEntry`] - One row of `GetFriendList`
//! - [`FriendRecord`] - A friend resolved to their profile

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Persona State
// ============================================================================

/// A player's online status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonaState {
    /// Code 0.
    Offline,
    /// Code 1.
    Online,
    /// Code 2.
    Busy,
    /// Code 3.
    Away,
    /// Code 4.
    Snooze,
    /// Code 5.
    #[serde(rename = "Looking to trade")]
    LookingToTrade,
    /// Code 6.
    #[serde(rename = "Looking to play")]
    LookingToPlay,
    /// Any other code.
    Unknown,
}

impl PersonaState {
    /// Decodes a Steam `personastate` value.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Offline,
            1 => Self::Online,
            2 => Self::Busy,
            3 => Self::Away,
            4 => Self::Snooze,
            5 => Self::LookingToTrade,
            6 => Self::LookingToPlay,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Offline => "Offline",
            Self::Online => "Online",
            Self::Busy => "Busy",
            Self::Away => "Away",
            Self::Snooze => "Snooze",
            Self::LookingToTrade => "Looking to trade",
            Self::LookingToPlay => "Looking to play",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PersonaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Player Summary
// ============================================================================

/// The profile fields the reducers read from `GetPlayerSummaries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    /// 64-bit Steam id.
    #[serde(rename = "steamid", default)]
    pub steam_id: String,
    /// Display name.
    #[serde(rename = "personaname", default)]
    pub persona_name: Option<String>,
    /// Community profile URL.
    #[serde(rename = "profileurl", default)]
    pub profile_url: Option<String>,
    /// Full-size avatar URL.
    #[serde(rename = "avatarfull", default)]
    pub avatar_url: Option<String>,
    /// Raw persona state code.
    #[serde(rename = "personastate", default)]
    pub persona_state: Option<i64>,
    /// Unix timestamp of the last logoff.
    #[serde(rename = "lastlogoff", default)]
    pub last_logoff: Option<i64>,
    /// Name of the game currently being played.
    #[serde(rename = "gameextrainfo", default)]
    pub game_extra_info: Option<String>,
    /// App id of the game currently being played, as a string.
    #[serde(rename = "gameid", default)]
    pub game_id: Option<String>,
}

impl PlayerSummary {
    /// Decoded persona state; a missing code counts as offline.
    pub fn persona(&self) -> PersonaState {
        PersonaState::from_code(self.persona_state.unwrap_or(0))
    }

    /// The current game name, if any and non-empty.
    pub fn current_game(&self) -> Option<&str> {
        self.game_extra_info.as_deref().filter(|name| !name.is_empty())
    }

    /// The current game's app id, when it parses as a positive integer.
    pub fn current_app_id(&self) -> Option<u64> {
        self.game_id
            .as_deref()
            .and_then(|id| id.trim().parse::<u64>().ok())
            .filter(|id| *id > 0)
    }
}

// ============================================================================
// Friends
// ============================================================================

/// One row of a friend list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendListEntry {
    /// The friend's 64-bit Steam id.
    #[serde(rename = "steamid")]
    pub steam_id: String,
    /// Relationship kind, normally `friend`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    /// Unix timestamp the friendship began.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friend_since: Option<i64>,
}

impl FriendListEntry {
    /// Creates an entry for a Steam id.
    pub fn new(steam_id: impl Into<String>) -> Self {
        Self {
            steam_id: steam_id.into(),
            relationship: Some("friend".to_string()),
            friend_since: None,
        }
    }
}

/// A friend resolved to their profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRecord {
    /// 64-bit Steam id.
    pub steam_id: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Full-size avatar URL.
    pub avatar_url: Option<String>,
    /// Community profile URL.
    pub profile_url: Option<String>,
    /// Online status.
    pub status: PersonaState,
    /// Game currently being played.
    pub current_game: Option<String>,
}

impl From<&PlayerSummary> for FriendRecord {
    fn from(summary: &PlayerSummary) -> Self {
        Self {
            steam_id: summary.steam_id.clone(),
            display_name: summary.persona_name.clone(),
            avatar_url: summary.avatar_url.clone(),
            profile_url: summary.profile_url.clone(),
            status: summary.persona(),
            current_game: summary.current_game().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_table() {
        let expected = [
            "Offline",
            "Online",
            "Busy",
            "Away",
            "Snooze",
            "Looking to trade",
            "Looking to play",
        ];
        for (code, label) in expected.iter().enumerate() {
            assert_eq!(PersonaState::from_code(code as i64).label(), *label);
        }
        assert_eq!(PersonaState::from_code(7), PersonaState::Unknown);
        assert_eq!(PersonaState::from_code(-1).to_string(), "Unknown");
    }

    #[test]
    fn test_missing_persona_state_is_offline() {
        let summary = PlayerSummary::default();
        assert_eq!(summary.persona(), PersonaState::Offline);
    }

    #[test]
    fn test_current_game_ignores_empty() {
        let summary = PlayerSummary {
            game_extra_info: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(summary.current_game(), None);
    }

    #[test]
    fn test_current_app_id_parses_string() {
        let summary = PlayerSummary {
            game_id: Some("570".to_string()),
            ..Default::default()
        };
        assert_eq!(summary.current_app_id(), Some(570));

        let summary = PlayerSummary {
            game_id: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(summary.current_app_id(), None);
    }

    #[test]
    fn test_friend_record_from_summary() {
        let summary = PlayerSummary {
            steam_id: "1".to_string(),
            persona_name: Some("gabe".to_string()),
            persona_state: Some(1),
            game_extra_info: Some("Dota 2".to_string()),
            ..Default::default()
        };
        let friend = FriendRecord::from(&summary);
        assert_eq!(friend.display_name.as_deref(), Some("gabe"));
        assert_eq!(friend.status, PersonaState::Online);
        assert_eq!(friend.current_game.as_deref(), Some("Dota 2"));
    }
}
