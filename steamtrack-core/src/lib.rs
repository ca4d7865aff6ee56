// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Steam Tracker Core
//!
//! Core types and models shared by every Steam Tracker crate:
//!
//! - Domain models for Steam Web API payloads (games, achievements, friends)
//! - Metric types produced by the reducers
//! - Rounding and percentage helpers
//! - Error types
//!
//! ## Key Types
//!
//! ### Steam Models
//! - [`Identity`] - Account id and API key pair (key redacted in `Debug`)
//! - [`GameRecord`] - One owned or recently played game
//! - [`PlayerAchievement`] / [`SchemaAchievement`] - Raw achievement rows
//! - [`AchievementProgress`] - Unlocked/total counts with derived percent
//! - [`PlayerSummary`] - Profile fields from `GetPlayerSummaries`
//! - [`PersonaState`] - Online status decoded from its integer code
//! - [`FriendRecord`] - One resolved friend
//! - [`BadgeSummary`] - Badges and level progression
//!
//! ### Metrics
//! - [`MetricKind`] - Closed set of metrics a tracker exposes
//! - [`MetricValue`] - Integer, float, or text state
//! - [`MetricResult`] - Value plus attribute map
//! - [`MetricSnapshot`] - A result stamped with its refresh time

pub mod error;
pub mod models;
pub mod stats;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Steam types
    AchievementProgress,
    Badge,
    BadgeSummary,
    FriendListEntry,
    FriendRecord,
    GameRecord,
    Identity,
    PersonaState,
    PlayerAchievement,
    PlayerSummary,
    RecentlyPlayed,
    SchemaAchievement,
    // Metric types
    MetricKind,
    MetricResult,
    MetricSnapshot,
    MetricValue,
};

pub use stats::{completion_percent, mean_rounded, minutes_to_hours, round_tenth};
