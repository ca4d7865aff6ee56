//! Metric registry for looking up descriptors.
//!
//! The registry provides static access to every metric's descriptor and
//! is the central point for resolving metric ids.

use std::collections::HashMap;
use std::sync::OnceLock;

use steamtrack_core::MetricKind;

use crate::descriptor::MetricDescriptor;
use crate::friends::friends_descriptor;
use crate::game::game_descriptor;
use crate::global_stats::global_stats_descriptor;
use crate::playtime::playtime_descriptor;
use crate::profile::profile_descriptor;
use crate::recent_achievements::recent_achievements_descriptor;
use crate::recent_games::recent_games_descriptor;
use crate::status::status_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all metric descriptors.
static DESCRIPTORS: OnceLock<Vec<MetricDescriptor>> = OnceLock::new();

/// Static storage for id to kind mapping.
static ID_MAP: OnceLock<HashMap<&'static str, MetricKind>> = OnceLock::new();

/// Initializes all descriptors, cheapest and most frequent first.
fn init_descriptors() -> Vec<MetricDescriptor> {
    vec![
        status_descriptor(),
        game_descriptor(),
        playtime_descriptor(),
        profile_descriptor(),
        recent_games_descriptor(),
        recent_achievements_descriptor(),
        global_stats_descriptor(),
        friends_descriptor(),
    ]
}

// ============================================================================
// Metric Registry
// ============================================================================

/// Global registry of metric descriptors.
pub struct MetricRegistry;

impl MetricRegistry {
    /// Returns all descriptors.
    pub fn all() -> &'static [MetricDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a descriptor by kind.
    pub fn get(kind: MetricKind) -> Option<&'static MetricDescriptor> {
        Self::all().iter().find(|d| d.kind == kind)
    }

    /// Returns the id to kind mapping.
    pub fn id_map() -> &'static HashMap<&'static str, MetricKind> {
        ID_MAP.get_or_init(|| Self::all().iter().map(|d| (d.id(), d.kind)).collect())
    }

    /// Looks up a descriptor by metric id.
    pub fn get_by_id(id: &str) -> Option<&'static MetricDescriptor> {
        let kind = Self::id_map().get(id)?;
        Self::get(*kind)
    }

    /// Returns the number of registered metrics.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns all metric kinds in registry order.
    pub fn kinds() -> Vec<MetricKind> {
        Self::all().iter().map(|d| d.kind).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
