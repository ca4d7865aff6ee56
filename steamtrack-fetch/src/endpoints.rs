//! Steam Web API endpoint table and base URLs.

use std::fmt;

use url::Url;

use crate::error::FetchError;

/// Default Web API base.
pub const DEFAULT_API_BASE: &str = "https://api.steampowered.com";

/// Default CDN base for store artwork.
pub const DEFAULT_CDN_BASE: &str = "https://cdn.cloudflare.steamstatic.com";

// ============================================================================
// Endpoint
// ============================================================================

/// One logical Steam Web API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `ISteamUser/GetPlayerSummaries/v2/`
    PlayerSummary,
    /// `IPlayerService/GetOwnedGames/v1/`
    OwnedGames,
    /// `ISteamUserStats/GetPlayerAchievements/v1/`
    PlayerAchievements,
    /// `ISteamUserStats/GetSchemaForGame/v2/`
    GameSchema,
    /// `IPlayerService/GetRecentlyPlayedGames/v1/`
    RecentlyPlayed,
    /// `IPlayerService/GetBadges/v1/`
    Badges,
    /// `ISteamUser/GetFriendList/v1/`
    FriendList,
    /// `ISteamUser/GetPlayerSummaries/v0002/`
    FriendSummaries,
}

impl Endpoint {
    /// Path relative to the API base.
    pub fn path(&self) -> &'static str {
        match self {
            Self::PlayerSummary => "ISteamUser/GetPlayerSummaries/v2/",
            Self::OwnedGames => "IPlayerService/GetOwnedGames/v1/",
            Self::PlayerAchievements => "ISteamUserStats/GetPlayerAchievements/v1/",
            Self::GameSchema => "ISteamUserStats/GetSchemaForGame/v2/",
            Self::RecentlyPlayed => "IPlayerService/GetRecentlyPlayedGames/v1/",
            Self::Badges => "IPlayerService/GetBadges/v1/",
            Self::FriendList => "ISteamUser/GetFriendList/v1/",
            Self::FriendSummaries => "ISteamUser/GetPlayerSummaries/v0002/",
        }
    }

    /// Top-level key wrapping the payload.
    pub fn envelope(&self) -> &'static str {
        match self {
            Self::PlayerSummary
            | Self::OwnedGames
            | Self::RecentlyPlayed
            | Self::Badges
            | Self::FriendSummaries => "response",
            Self::PlayerAchievements => "playerstats",
            Self::GameSchema => "game",
            Self::FriendList => "friendslist",
        }
    }

    /// Short human-readable name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayerSummary => "player summary",
            Self::OwnedGames => "owned games",
            Self::PlayerAchievements => "player achievements",
            Self::GameSchema => "game schema",
            Self::RecentlyPlayed => "recently played",
            Self::Badges => "badges",
            Self::FriendList => "friend list",
            Self::FriendSummaries => "friend summaries",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Steam Endpoints
// ============================================================================

/// Injected base URLs for the Web API and the artwork CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamEndpoints {
    api_base: String,
    cdn_base: String,
}

impl SteamEndpoints {
    /// Creates endpoints from explicit bases.
    ///
    /// Both bases must be absolute URLs; trailing slashes are ignored.
    pub fn new(api_base: &str, cdn_base: &str) -> Result<Self, FetchError> {
        Ok(Self {
            api_base: normalize_base(api_base)?,
            cdn_base: normalize_base(cdn_base)?,
        })
    }

    /// The Web API base.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// The CDN base.
    pub fn cdn_base(&self) -> &str {
        &self.cdn_base
    }

    /// Host names requests may go to.
    pub fn hosts(&self) -> Vec<String> {
        [&self.api_base, &self.cdn_base]
            .iter()
            .filter_map(|base| Url::parse(base).ok())
            .filter_map(|url| url.host_str().map(str::to_string))
            .collect()
    }

    /// Builds the full request URL for an endpoint.
    pub fn url(&self, endpoint: Endpoint, params: &[(&str, String)]) -> Result<Url, FetchError> {
        let raw = format!("{}/{}", self.api_base, endpoint.path());
        Url::parse_with_params(&raw, params)
            .map_err(|e| FetchError::InvalidParameter(format!("bad URL for {endpoint}: {e}")))
    }

    /// Store header artwork for an app.
    pub fn logo_url(&self, app_id: u64) -> String {
        format!("{}/steam/apps/{}/header.jpg", self.cdn_base, app_id)
    }
}

impl Default for SteamEndpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            cdn_base: DEFAULT_CDN_BASE.to_string(),
        }
    }
}

fn normalize_base(base: &str) -> Result<String, FetchError> {
    let trimmed = base.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| FetchError::InvalidParameter(format!("invalid base URL {trimmed:?}: {e}")))?;
    if parsed.host_str().is_none() {
        return Err(FetchError::InvalidParameter(format!(
            "base URL has no host: {trimmed}"
        )));
    }
    Ok(trimmed.to_string())
}
