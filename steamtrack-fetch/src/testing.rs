//! In-memory gateway for tests.
//!
//! [`FakeGateway`] serves canned data, records every call it receives, and
//! fails or delays calls matching registered predicates.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use steamtrack_core::{
    BadgeSummary, FriendListEntry, GameRecord, Identity, PlayerAchievement, PlayerSummary,
    RecentlyPlayed, SchemaAchievement,
};

use crate::endpoints::{Endpoint, SteamEndpoints};
use crate::error::FetchError;
use crate::gateway::{OwnedGamesQuery, SteamGateway, check_app_id, check_summary_batch};

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `player_summary`
    PlayerSummary,
    /// `owned_games`
    OwnedGames {
        /// Whether names were requested.
        include_app_info: bool,
    },
    /// `player_achievements`
    PlayerAchievements(u64),
    /// `game_schema`
    GameSchema(u64),
    /// `recently_played`
    RecentlyPlayed(u32),
    /// `badges`
    Badges,
    /// `friend_list`
    FriendList,
    /// `friend_summaries`
    FriendSummaries(Vec<String>),
}

impl GatewayCall {
    fn endpoint(&self) -> Endpoint {
        match self {
            Self::PlayerSummary => Endpoint::PlayerSummary,
            Self::OwnedGames { .. } => Endpoint::OwnedGames,
            Self::PlayerAchievements(_) => Endpoint::PlayerAchievements,
            Self::GameSchema(_) => Endpoint::GameSchema,
            Self::RecentlyPlayed(_) => Endpoint::RecentlyPlayed,
            Self::Badges => Endpoint::Badges,
            Self::FriendList => Endpoint::FriendList,
            Self::FriendSummaries(_) => Endpoint::FriendSummaries,
        }
    }
}

type CallPredicate = Box<dyn Fn(&GatewayCall) -> bool + Send + Sync>;

/// A scripted gateway.
///
/// - The player summary is an upstream error unless one is set.
/// - Player achievements for an app with none set fail as upstream 400,
///   like Steam does for games without stats.
/// - Schemas default to empty.
/// - Friend summaries come back in reverse request order and omit unknown ids.
/// - Owned games requested without app info have their names stripped.
#[derive(Default)]
pub struct FakeGateway {
    summary: Option<PlayerSummary>,
    owned_games: Vec<GameRecord>,
    achievements: HashMap<u64, Vec<PlayerAchievement>>,
    schemas: HashMap<u64, Vec<SchemaAchievement>>,
    recent: RecentlyPlayed,
    badges: BadgeSummary,
    friends: Vec<FriendListEntry>,
    friend_summaries: HashMap<String, PlayerSummary>,
    failures: Vec<CallPredicate>,
    delays: Vec<(CallPredicate, Duration)>,
    endpoints: SteamEndpoints,
    calls: Mutex<Vec<GatewayCall>>,
}

impl FakeGateway {
    /// Creates an empty fake.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the player's own summary.
    #[must_use]
    pub fn with_summary(mut self, summary: PlayerSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Sets the library.
    #[must_use]
    pub fn with_owned_games(mut self, games: Vec<GameRecord>) -> Self {
        self.owned_games = games;
        self
    }

    /// Sets the player's achievement rows for a game.
    #[must_use]
    pub fn with_achievements(mut self, app_id: u64, rows: Vec<PlayerAchievement>) -> Self {
        self.achievements.insert(app_id, rows);
        self
    }

    /// Sets a game's schema.
    #[must_use]
    pub fn with_schema(mut self, app_id: u64, rows: Vec<SchemaAchievement>) -> Self {
        self.schemas.insert(app_id, rows);
        self
    }

    /// Sets the recently played response.
    #[must_use]
    pub fn with_recent(mut self, recent: RecentlyPlayed) -> Self {
        self.recent = recent;
        self
    }

    /// Sets the badges response.
    #[must_use]
    pub fn with_badges(mut self, badges: BadgeSummary) -> Self {
        self.badges = badges;
        self
    }

    /// Sets the friend list.
    #[must_use]
    pub fn with_friends(mut self, friends: Vec<FriendListEntry>) -> Self {
        self.friends = friends;
        self
    }

    /// Registers a friend's summary.
    #[must_use]
    pub fn with_friend_summary(mut self, summary: PlayerSummary) -> Self {
        self.friend_summaries
            .insert(summary.steam_id.clone(), summary);
        self
    }

    /// Fails every call matching `predicate` with a transport error.
    #[must_use]
    pub fn fail_when(
        mut self,
        predicate: impl Fn(&GatewayCall) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.failures.push(Box::new(predicate));
        self
    }

    /// Holds every call matching `predicate` for `delay` before answering.
    #[must_use]
    pub fn delay_when(
        mut self,
        delay: Duration,
        predicate: impl Fn(&GatewayCall) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.delays.push((Box::new(predicate), delay));
        self
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    async fn record(&self, call: GatewayCall) -> Result<(), FetchError> {
        let delay = self
            .delays
            .iter()
            .filter(|(p, _)| p(&call))
            .map(|(_, d)| *d)
            .max();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failing = self.failures.iter().any(|p| p(&call));
        let endpoint = call.endpoint();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        if failing {
            return Err(FetchError::transport(endpoint, "scripted failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl SteamGateway for FakeGateway {
    async fn player_summary(&self, _identity: &Identity) -> Result<PlayerSummary, FetchError> {
        self.record(GatewayCall::PlayerSummary).await?;
        self.summary
            .clone()
            .ok_or_else(|| FetchError::malformed(Endpoint::PlayerSummary, "no players in response"))
    }

    async fn owned_games(
        &self,
        _identity: &Identity,
        query: OwnedGamesQuery,
    ) -> Result<Vec<GameRecord>, FetchError> {
        self.record(GatewayCall::OwnedGames {
            include_app_info: query.include_app_info,
        })
        .await?;
        let mut games = self.owned_games.clone();
        if !query.include_app_info {
            for game in &mut games {
                game.name = None;
            }
        }
        Ok(games)
    }

    async fn player_achievements(
        &self,
        _identity: &Identity,
        app_id: u64,
    ) -> Result<Vec<PlayerAchievement>, FetchError> {
        check_app_id(app_id)?;
        self.record(GatewayCall::PlayerAchievements(app_id)).await?;
        self.achievements
            .get(&app_id)
            .cloned()
            .ok_or_else(|| FetchError::status(Endpoint::PlayerAchievements, 400))
    }

    async fn game_schema(
        &self,
        _identity: &Identity,
        app_id: u64,
    ) -> Result<Vec<SchemaAchievement>, FetchError> {
        check_app_id(app_id)?;
        self.record(GatewayCall::GameSchema(app_id)).await?;
        Ok(self.schemas.get(&app_id).cloned().unwrap_or_default())
    }

    async fn recently_played(
        &self,
        _identity: &Identity,
        count: u32,
    ) -> Result<RecentlyPlayed, FetchError> {
        self.record(GatewayCall::RecentlyPlayed(count)).await?;
        let mut recent = self.recent.clone();
        recent
            .games
            .truncate(usize::try_from(count).unwrap_or(usize::MAX));
        Ok(recent)
    }

    async fn badges(&self, _identity: &Identity) -> Result<BadgeSummary, FetchError> {
        self.record(GatewayCall::Badges).await?;
        Ok(self.badges.clone())
    }

    async fn friend_list(&self, _identity: &Identity) -> Result<Vec<FriendListEntry>, FetchError> {
        self.record(GatewayCall::FriendList).await?;
        Ok(self.friends.clone())
    }

    async fn friend_summaries(
        &self,
        _identity: &Identity,
        steam_ids: &[String],
    ) -> Result<Vec<PlayerSummary>, FetchError> {
        check_summary_batch(steam_ids)?;
        self.record(GatewayCall::FriendSummaries(steam_ids.to_vec()))
            .await?;
        Ok(steam_ids
            .iter()
            .rev()
            .filter_map(|id| self.friend_summaries.get(id).cloned())
            .collect())
    }

    fn logo_url(&self, app_id: u64) -> String {
        self.endpoints.logo_url(app_id)
    }
}
