//! Domain models for Steam Tracker.
//!
//! ## Submodules
//!
//! - [`identity`] - Tracker credentials
//! - [`game`] - Owned and recently played games
//! - [`achievement`] - Achievement rows and derived progress
//! - [`player`] - Player summaries, persona states, friends
//! - [`badge`] - Badges and level progression
//! - [`metric`] - Metric kinds, values, results, snapshots

mod achievement;
mod badge;
mod game;
mod identity;
mod metric;
mod player;

pub use achievement::{AchievementProgress, PlayerAchievement, SchemaAchievement};
pub use badge::{Badge, BadgeSummary};
pub use game::{GameRecord, RecentlyPlayed};
pub use identity::Identity;
pub use metric::{MetricKind, MetricResult, MetricSnapshot, MetricValue};
pub use player::{FriendListEntry, FriendRecord, PersonaState, PlayerSummary};

#[cfg(test)]
mod serde_tests;
