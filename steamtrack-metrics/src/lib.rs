// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Steam Tracker Metrics
//!
//! The reducers that turn Steam Web API calls into metrics.
//!
//! Each metric module includes:
//!
//! - **Descriptor**: Static configuration (description, cadence, sources)
//! - **Reducer**: An async function over a [`SteamGateway`](steamtrack_fetch::SteamGateway)
//!
//! | Metric | Calls | Cadence |
//! |--------|-------|---------|
//! | status | player summary | 1 min |
//! | game | player summary, owned games | 5 min |
//! | playtime | owned games, achievements for the top 5 | 3 h |
//! | profile | badges | 3 h |
//! | recent_games | recently played | 10 min |
//! | recent_achievements | recently played, achievements and schema per game | 3 h |
//! | global_stats | owned games, achievements per game, badges | 5 h |
//! | friends | friend list, summaries per 100 friends | 5 min |
//!
//! ## Usage
//!
//! ```ignore
//! use steamtrack_core::MetricKind;
//! use steamtrack_metrics::{ReduceOptions, compute_metric};
//!
//! let result = compute_metric(MetricKind::Playtime, &gateway, &identity, &ReduceOptions::default()).await;
//! ```

pub mod compute;
pub mod descriptor;
pub mod error;
pub mod registry;

// Metric modules
pub mod friends;
pub mod game;
pub mod global_stats;
pub mod playtime;
pub mod profile;
pub mod recent_achievements;
pub mod recent_games;
pub mod status;

// Re-export key types
pub use compute::{ReduceOptions, compute_metric};
pub use descriptor::{MetricDescriptor, MetricDescriptorBuilder};
pub use error::ReduceError;
pub use registry::MetricRegistry;

#[cfg(test)]
mod test_support;
