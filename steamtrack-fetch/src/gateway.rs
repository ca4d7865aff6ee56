//! The Steam gateway trait.
//!
//! One async method per logical Web API call. Reducers only ever see a
//! `&dyn SteamGateway`, so they run unchanged against the HTTP
//! implementation, the per-cycle cache, or an in-memory fake.

use async_trait::async_trait;
use steamtrack_core::{
    BadgeSummary, FriendListEntry, GameRecord, Identity, PlayerAchievement, PlayerSummary,
    RecentlyPlayed, SchemaAchievement,
};

use crate::error::FetchError;

/// Most ids the friend-summaries endpoint accepts per call.
pub const MAX_SUMMARY_BATCH: usize = 100;

/// Default number of recently played games to request.
pub const DEFAULT_RECENT_COUNT: u32 = 5;

// ============================================================================
// Owned Games Query
// ============================================================================

/// Parameters of an owned-games call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnedGamesQuery {
    /// Include names and icons.
    pub include_app_info: bool,
    /// Use the library-scan timeout.
    pub library_scan: bool,
}

impl OwnedGamesQuery {
    /// Games with names.
    pub fn with_app_info() -> Self {
        Self {
            include_app_info: true,
            library_scan: false,
        }
    }

    /// Ids and playtime only.
    pub fn ids_only() -> Self {
        Self {
            include_app_info: false,
            library_scan: false,
        }
    }

    /// Games with names, allowing the long library-scan timeout.
    pub fn library_scan() -> Self {
        Self {
            include_app_info: true,
            library_scan: true,
        }
    }
}

// ============================================================================
// Gateway Trait
// ============================================================================

/// Typed access to the Steam Web API.
#[async_trait]
pub trait SteamGateway: Send + Sync {
    /// The tracked player's own summary.
    async fn player_summary(&self, identity: &Identity) -> Result<PlayerSummary, FetchError>;

    /// The player's library.
    async fn owned_games(
        &self,
        identity: &Identity,
        query: OwnedGamesQuery,
    ) -> Result<Vec<GameRecord>, FetchError>;

    /// The player's achievement rows for one game.
    async fn player_achievements(
        &self,
        identity: &Identity,
        app_id: u64,
    ) -> Result<Vec<PlayerAchievement>, FetchError>;

    /// A game's achievement definitions.
    async fn game_schema(
        &self,
        identity: &Identity,
        app_id: u64,
    ) -> Result<Vec<SchemaAchievement>, FetchError>;

    /// Up to `count` most recently played games.
    async fn recently_played(
        &self,
        identity: &Identity,
        count: u32,
    ) -> Result<RecentlyPlayed, FetchError>;

    /// Badges and level progression.
    async fn badges(&self, identity: &Identity) -> Result<BadgeSummary, FetchError>;

    /// The player's friends.
    async fn friend_list(&self, identity: &Identity) -> Result<Vec<FriendListEntry>, FetchError>;

    /// Summaries for at most [`MAX_SUMMARY_BATCH`] Steam ids.
    async fn friend_summaries(
        &self,
        identity: &Identity,
        steam_ids: &[String],
    ) -> Result<Vec<PlayerSummary>, FetchError>;

    /// Store header artwork for an app. Pure; makes no call.
    fn logo_url(&self, app_id: u64) -> String;
}

// ============================================================================
// Parameter Checks
// ============================================================================

/// Rejects non-positive app ids.
pub fn check_app_id(app_id: u64) -> Result<(), FetchError> {
    if app_id == 0 {
        return Err(FetchError::InvalidParameter(
            "app id must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Rejects oversize summary batches.
pub fn check_summary_batch(steam_ids: &[String]) -> Result<(), FetchError> {
    if steam_ids.len() > MAX_SUMMARY_BATCH {
        return Err(FetchError::InvalidParameter(format!(
            "at most {MAX_SUMMARY_BATCH} steam ids per summary call, got {}",
            steam_ids.len()
        )));
    }
    Ok(())
}
