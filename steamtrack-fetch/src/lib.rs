// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Steam Tracker Fetch
//!
//! Typed access to the Steam Web API.
//!
//! ## Gateway
//!
//! - [`gateway::SteamGateway`] - One async method per logical call
//! - [`web::SteamWebGateway`] - The HTTPS implementation
//! - [`cache::CycleCache`] - Memoizes successes for one refresh cycle
//!
//! ## Plumbing
//!
//! - [`http::HttpClient`] - reqwest wrapper with per-call timeouts and a domain allowlist
//! - [`endpoints::SteamEndpoints`] - Injected API and CDN base URLs
//! - [`context::FetchContext`] - Client, endpoints and timeouts bundled together
//!
//! ## Example
//!
//! ```ignore
//! use steamtrack_core::Identity;
//! use steamtrack_fetch::{FetchContext, SteamGateway, SteamWebGateway};
//!
//! let gateway = SteamWebGateway::new(FetchContext::new()?);
//! let identity = Identity::new("76561198000000000", api_key)?;
//! let summary = gateway.player_summary(&identity).await?;
//! ```

pub mod cache;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod web;

// Errors
pub use error::{FetchError, HttpError};

// Plumbing
pub use context::{FetchContext, FetchContextBuilder, FetchSettings, TimeoutClass};
pub use endpoints::{DEFAULT_API_BASE, DEFAULT_CDN_BASE, Endpoint, SteamEndpoints};
pub use http::{HttpClient, HttpResponse};

// Gateway
pub use cache::{CacheStats, CycleCache};
pub use gateway::{DEFAULT_RECENT_COUNT, MAX_SUMMARY_BATCH, OwnedGamesQuery, SteamGateway};
pub use web::SteamWebGateway;
