//! Per-refresh-cycle memoization of gateway calls.
//!
//! Metrics due at the same instant often ask for the same data: playtime
//! and global stats both read the library, status and game both read the
//! player summary. A [`CycleCache`] wraps the real gateway for one cycle
//! and serves repeated identical requests from memory. Metrics of a cycle
//! run concurrently, so a request already in flight is awaited rather than
//! issued twice. Only successes are kept, and the cache is dropped with the
//! cycle.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use steamtrack_core::{
    BadgeSummary, FriendListEntry, GameRecord, Identity, PlayerAchievement, PlayerSummary,
    RecentlyPlayed, SchemaAchievement,
};
use tokio::sync::OnceCell;
use tracing::trace;

use crate::error::FetchError;
use crate::gateway::{OwnedGamesQuery, SteamGateway};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    PlayerSummary(String),
    OwnedGames(String, bool),
    PlayerAchievements(String, u64),
    GameSchema(u64),
    RecentlyPlayed(String, u32),
    Badges(String),
    FriendList(String),
    FriendSummaries(Vec<String>),
}

#[derive(Debug, Clone)]
enum Cached {
    PlayerSummary(PlayerSummary),
    OwnedGames(Vec<GameRecord>),
    PlayerAchievements(Vec<PlayerAchievement>),
    GameSchema(Vec<SchemaAchievement>),
    RecentlyPlayed(RecentlyPlayed),
    Badges(BadgeSummary),
    FriendList(Vec<FriendListEntry>),
    FriendSummaries(Vec<PlayerSummary>),
}

/// Hit and miss counts of a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests served from memory or from a request already in flight.
    pub hits: usize,
    /// Requests forwarded to the inner gateway.
    pub misses: usize,
}

/// A gateway that memoizes successful results for the lifetime of one cycle.
pub struct CycleCache {
    inner: Arc<dyn SteamGateway>,
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<Cached>>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl CycleCache {
    /// Wraps a gateway for one cycle.
    pub fn new(inner: Arc<dyn SteamGateway>) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Hit and miss counts so far.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Serves `key` from the cycle, or runs `fetch` once and keeps a success.
    ///
    /// A failed fetch leaves the entry empty; the next caller tries again.
    async fn memo<T, F, Fut>(
        &self,
        key: CacheKey,
        pick: fn(&Cached) -> Option<&T>,
        wrap: fn(T) -> Cached,
        fetch: F,
    ) -> Result<T, FetchError>
    where
        T: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        let mut fetched = false;
        let cached = cell
            .get_or_try_init(|| {
                fetched = true;
                self.misses.fetch_add(1, Ordering::Relaxed);
                let pending = fetch();
                async move { pending.await.map(wrap) }
            })
            .await?;
        if !fetched {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(?key, "cycle cache hit");
        }

        pick(cached).cloned().ok_or_else(|| {
            FetchError::InvalidParameter(format!("cycle cache entry {key:?} holds another type"))
        })
    }
}

impl std::fmt::Debug for CycleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SteamGateway for CycleCache {
    async fn player_summary(&self, identity: &Identity) -> Result<PlayerSummary, FetchError> {
        self.memo(
            CacheKey::PlayerSummary(identity.account_id().to_string()),
            |c| match c {
                Cached::PlayerSummary(v) => Some(v),
                _ => None,
            },
            Cached::PlayerSummary,
            || self.inner.player_summary(identity),
        )
        .await
    }

    async fn owned_games(
        &self,
        identity: &Identity,
        query: OwnedGamesQuery,
    ) -> Result<Vec<GameRecord>, FetchError> {
        self.memo(
            CacheKey::OwnedGames(identity.account_id().to_string(), query.include_app_info),
            |c| match c {
                Cached::OwnedGames(v) => Some(v),
                _ => None,
            },
            Cached::OwnedGames,
            || self.inner.owned_games(identity, query),
        )
        .await
    }

    async fn player_achievements(
        &self,
        identity: &Identity,
        app_id: u64,
    ) -> Result<Vec<PlayerAchievement>, FetchError> {
        self.memo(
            CacheKey::PlayerAchievements(identity.account_id().to_string(), app_id),
            |c| match c {
                Cached::PlayerAchievements(v) => Some(v),
                _ => None,
            },
            Cached::PlayerAchievements,
            || self.inner.player_achievements(identity, app_id),
        )
        .await
    }

    async fn game_schema(
        &self,
        identity: &Identity,
        app_id: u64,
    ) -> Result<Vec<SchemaAchievement>, FetchError> {
        self.memo(
            CacheKey::GameSchema(app_id),
            |c| match c {
                Cached::GameSchema(v) => Some(v),
                _ => None,
            },
            Cached::GameSchema,
            || self.inner.game_schema(identity, app_id),
        )
        .await
    }

    async fn recently_played(
        &self,
        identity: &Identity,
        count: u32,
    ) -> Result<RecentlyPlayed, FetchError> {
        self.memo(
            CacheKey::RecentlyPlayed(identity.account_id().to_string(), count),
            |c| match c {
                Cached::RecentlyPlayed(v) => Some(v),
                _ => None,
            },
            Cached::RecentlyPlayed,
            || self.inner.recently_played(identity, count),
        )
        .await
    }

    async fn badges(&self, identity: &Identity) -> Result<BadgeSummary, FetchError> {
        self.memo(
            CacheKey::Badges(identity.account_id().to_string()),
            |c| match c {
                Cached::Badges(v) => Some(v),
                _ => None,
            },
            Cached::Badges,
            || self.inner.badges(identity),
        )
        .await
    }

    async fn friend_list(&self, identity: &Identity) -> Result<Vec<FriendListEntry>, FetchError> {
        self.memo(
            CacheKey::FriendList(identity.account_id().to_string()),
            |c| match c {
                Cached::FriendList(v) => Some(v),
                _ => None,
            },
            Cached::FriendList,
            || self.inner.friend_list(identity),
        )
        .await
    }

    async fn friend_summaries(
        &self,
        identity: &Identity,
        steam_ids: &[String],
    ) -> Result<Vec<PlayerSummary>, FetchError> {
        self.memo(
            CacheKey::FriendSummaries(steam_ids.to_vec()),
            |c| match c {
                Cached::FriendSummaries(v) => Some(v),
                _ => None,
            },
            Cached::FriendSummaries,
            || self.inner.friend_summaries(identity, steam_ids),
        )
        .await
    }

    fn logo_url(&self, app_id: u64) -> String {
        self.inner.logo_url(app_id)
    }
}

// ============================================================================
// Tests
// ============================================================================
