//! HTTP implementation of [`SteamGateway`].

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use steamtrack_core::{
    BadgeSummary, FriendListEntry, GameRecord, Identity, PlayerAchievement, PlayerSummary,
    RecentlyPlayed, SchemaAchievement,
};
use tracing::{debug, instrument};

use crate::context::{FetchContext, TimeoutClass};
use crate::endpoints::Endpoint;
use crate::error::FetchError;
use crate::gateway::{OwnedGamesQuery, SteamGateway, check_app_id, check_summary_batch};

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlayersPayload {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesPayload {
    #[serde(default)]
    games: Vec<GameRecord>,
}

#[derive(Debug, Deserialize)]
struct PlayerStatsPayload {
    #[serde(default)]
    achievements: Vec<PlayerAchievement>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SchemaPayload {
    #[serde(rename = "availableGameStats", default)]
    available_game_stats: Option<AvailableGameStats>,
}

#[derive(Debug, Default, Deserialize)]
struct AvailableGameStats {
    #[serde(default)]
    achievements: Vec<SchemaAchievement>,
}

#[derive(Debug, Deserialize)]
struct FriendListPayload {
    #[serde(default)]
    friends: Vec<FriendListEntry>,
}

/// Takes the endpoint's envelope out of a response body.
fn extract_envelope(endpoint: Endpoint, body: Value) -> Result<Value, FetchError> {
    let key = endpoint.envelope();
    match body {
        Value::Object(mut map) => map
            .remove(key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| FetchError::malformed(endpoint, format!("missing `{key}` envelope"))),
        _ => Err(FetchError::malformed(endpoint, "body is not a JSON object")),
    }
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value)
        .map_err(|e| FetchError::malformed(endpoint, format!("unexpected shape: {e}")))
}

// ============================================================================
// Steam Web Gateway
// ============================================================================

/// Gateway that talks to the Steam Web API over HTTPS.
#[derive(Debug, Clone)]
pub struct SteamWebGateway {
    ctx: FetchContext,
}

impl SteamWebGateway {
    /// Creates a gateway over a fetch context.
    pub fn new(ctx: FetchContext) -> Self {
        Self { ctx }
    }

    /// The context this gateway uses.
    pub fn context(&self) -> &FetchContext {
        &self.ctx
    }

    /// Issues one call and returns the envelope's contents.
    async fn call(
        &self,
        endpoint: Endpoint,
        identity: &Identity,
        params: &[(&str, String)],
        class: TimeoutClass,
    ) -> Result<Value, FetchError> {
        let mut query = vec![("key", identity.api_key().to_string())];
        query.extend(params.iter().cloned());

        let url = self.ctx.endpoints.url(endpoint, &query)?;
        let timeout = self.ctx.timeout(class);

        let response = self
            .ctx
            .http
            .get(&url, timeout)
            .await
            .map_err(|e| FetchError::from_http(endpoint, e))?;

        if !response.is_success() {
            return Err(FetchError::status(endpoint, response.status));
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::malformed(endpoint, format!("body is not JSON: {e}")))?;

        extract_envelope(endpoint, body)
    }
}

#[async_trait]
impl SteamGateway for SteamWebGateway {
    #[instrument(skip(self, identity), fields(account = %identity.account_id()))]
    async fn player_summary(&self, identity: &Identity) -> Result<PlayerSummary, FetchError> {
        let endpoint = Endpoint::PlayerSummary;
        let value = self
            .call(
                endpoint,
                identity,
                &[("steamids", identity.account_id().to_string())],
                TimeoutClass::Single,
            )
            .await?;

        let payload: PlayersPayload = decode(endpoint, value)?;
        payload
            .players
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::malformed(endpoint, "no players in response"))
    }

    #[instrument(skip(self, identity), fields(account = %identity.account_id()))]
    async fn owned_games(
        &self,
        identity: &Identity,
        query: OwnedGamesQuery,
    ) -> Result<Vec<GameRecord>, FetchError> {
        let endpoint = Endpoint::OwnedGames;
        let class = if query.library_scan {
            TimeoutClass::Library
        } else if query.include_app_info {
            TimeoutClass::Extended
        } else {
            TimeoutClass::Single
        };

        let value = self
            .call(
                endpoint,
                identity,
                &[
                    ("steamid", identity.account_id().to_string()),
                    ("include_appinfo", query.include_app_info.to_string()),
                    ("include_played_free_games", true.to_string()),
                ],
                class,
            )
            .await?;

        let payload: OwnedGamesPayload = decode(endpoint, value)?;
        debug!(count = payload.games.len(), "Owned games received");
        Ok(payload.games)
    }

    #[instrument(skip(self, identity), fields(account = %identity.account_id()))]
    async fn player_achievements(
        &self,
        identity: &Identity,
        app_id: u64,
    ) -> Result<Vec<PlayerAchievement>, FetchError> {
        check_app_id(app_id)?;
        let endpoint = Endpoint::PlayerAchievements;
        let value = self
            .call(
                endpoint,
                identity,
                &[
                    ("steamid", identity.account_id().to_string()),
                    ("appid", app_id.to_string()),
                ],
                TimeoutClass::Single,
            )
            .await?;

        let payload: PlayerStatsPayload = decode(endpoint, value)?;
        if payload.success == Some(false) {
            let message = payload
                .error
                .unwrap_or_else(|| "request unsuccessful".to_string());
            return Err(FetchError::malformed(endpoint, message));
        }
        Ok(payload.achievements)
    }

    #[instrument(skip(self, identity))]
    async fn game_schema(
        &self,
        identity: &Identity,
        app_id: u64,
    ) -> Result<Vec<SchemaAchievement>, FetchError> {
        check_app_id(app_id)?;
        let endpoint = Endpoint::GameSchema;
        let value = self
            .call(
                endpoint,
                identity,
                &[("appid", app_id.to_string())],
                TimeoutClass::Single,
            )
            .await?;

        let payload: SchemaPayload = decode(endpoint, value)?;
        Ok(payload
            .available_game_stats
            .unwrap_or_default()
            .achievements)
    }

    #[instrument(skip(self, identity), fields(account = %identity.account_id()))]
    async fn recently_played(
        &self,
        identity: &Identity,
        count: u32,
    ) -> Result<RecentlyPlayed, FetchError> {
        let endpoint = Endpoint::RecentlyPlayed;
        let value = self
            .call(
                endpoint,
                identity,
                &[
                    ("steamid", identity.account_id().to_string()),
                    ("count", count.to_string()),
                ],
                TimeoutClass::Extended,
            )
            .await?;

        decode(endpoint, value)
    }

    #[instrument(skip(self, identity), fields(account = %identity.account_id()))]
    async fn badges(&self, identity: &Identity) -> Result<BadgeSummary, FetchError> {
        let endpoint = Endpoint::Badges;
        let value = self
            .call(
                endpoint,
                identity,
                &[("steamid", identity.account_id().to_string())],
                TimeoutClass::Single,
            )
            .await?;

        decode(endpoint, value)
    }

    #[instrument(skip(self, identity), fields(account = %identity.account_id()))]
    async fn friend_list(&self, identity: &Identity) -> Result<Vec<FriendListEntry>, FetchError> {
        let endpoint = Endpoint::FriendList;
        let value = self
            .call(
                endpoint,
                identity,
                &[
                    ("steamid", identity.account_id().to_string()),
                    ("relationship", "friend".to_string()),
                ],
                TimeoutClass::Extended,
            )
            .await?;

        let payload: FriendListPayload = decode(endpoint, value)?;
        Ok(payload.friends)
    }

    #[instrument(skip(self, identity, steam_ids), fields(batch = steam_ids.len()))]
    async fn friend_summaries(
        &self,
        identity: &Identity,
        steam_ids: &[String],
    ) -> Result<Vec<PlayerSummary>, FetchError> {
        check_summary_batch(steam_ids)?;
        if steam_ids.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = Endpoint::FriendSummaries;
        let value = self
            .call(
                endpoint,
                identity,
                &[("steamids", steam_ids.join(","))],
                TimeoutClass::Extended,
            )
            .await?;

        let payload: PlayersPayload = decode(endpoint, value)?;
        Ok(payload.players)
    }

    fn logo_url(&self, app_id: u64) -> String {
        self.ctx.endpoints.logo_url(app_id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::SteamEndpoints;
    use serde_json::json;
    use std::time::Duration;

    fn identity() -> Identity {
        Identity::new("76561198000000000", "KEY").unwrap()
    }

    fn unreachable_gateway() -> SteamWebGateway {
        // Port 9 (discard) is closed on test hosts, so connects fail fast.
        let endpoints = SteamEndpoints::new("http://127.0.0.1:9", "http://127.0.0.1:9").unwrap();
        let ctx = FetchContext::builder()
            .endpoints(endpoints)
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        SteamWebGateway::new(ctx)
    }

    #[test]
    fn test_extract_envelope() {
        let body = json!({"response": {"games": []}});
        let inner = extract_envelope(Endpoint::OwnedGames, body).unwrap();
        assert_eq!(inner, json!({"games": []}));
    }

    #[test]
    fn test_missing_envelope_is_upstream() {
        let err = extract_envelope(Endpoint::FriendList, json!({"response": {}})).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("friendslist"));

        let err = extract_envelope(Endpoint::OwnedGames, json!([1, 2])).unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn test_missing_games_array_is_empty() {
        let payload: OwnedGamesPayload = decode(Endpoint::OwnedGames, json!({})).unwrap();
        assert!(payload.games.is_empty());
    }

    #[test]
    fn test_schema_without_stats() {
        let payload: SchemaPayload = decode(Endpoint::GameSchema, json!({})).unwrap();
        assert!(payload.available_game_stats.is_none());

        let payload: SchemaPayload = decode(
            Endpoint::GameSchema,
            json!({"gameName": "X", "availableGameStats": {"achievements": [{"name": "A"}, {"name": "B"}]}}),
        )
        .unwrap();
        assert_eq!(payload.available_game_stats.unwrap().achievements.len(), 2);
    }

    #[test]
    fn test_wrong_shape_is_upstream() {
        let err = decode::<OwnedGamesPayload>(Endpoint::OwnedGames, json!({"games": "nope"}))
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_zero_app_id_rejected_without_io() {
        let gateway = unreachable_gateway();
        let err = gateway.player_achievements(&identity(), 0).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidParameter(_)));

        let err = gateway.game_schema(&identity(), 0).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_oversize_batch_rejected() {
        let gateway = unreachable_gateway();
        let ids: Vec<String> = (0..101).map(|i| i.to_string()).collect();
        let err = gateway.friend_summaries(&identity(), &ids).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport() {
        let gateway = unreachable_gateway();
        let err = gateway.badges(&identity()).await.unwrap_err();
        assert!(err.is_transport(), "expected transport error, got {err:?}");
        assert!(!err.to_string().contains("KEY"));
    }

    #[test]
    fn test_logo_url_uses_cdn_base() {
        let gateway = unreachable_gateway();
        assert_eq!(gateway.logo_url(10), "http://127.0.0.1:9/steam/apps/10/header.jpg");
    }
}
