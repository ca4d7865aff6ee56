//! Metric types.
//!
//! Every reducer produces exactly one [`MetricResult`]: an optional
//! [`MetricValue`] plus a JSON attribute map. A result with no value and no
//! attributes is the "cleared" state reported on total failure.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

// ============================================================================
// Metric Kind
// ============================================================================

/// The metrics a tracker exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Online status.
    Status,
    /// Game currently being played.
    Game,
    /// Library playtime.
    Playtime,
    /// Steam level and XP.
    Profile,
    /// Games played in the last two weeks.
    RecentGames,
    /// Achievement progress of recently played games.
    RecentAchievements,
    /// Library-wide achievement and badge totals.
    GlobalStats,
    /// Friends and their status.
    Friends,
}

impl MetricKind {
    /// Stable identifier, used in unique ids and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Game => "game",
            Self::Playtime => "playtime",
            Self::Profile => "profile",
            Self::RecentGames => "recent_games",
            Self::RecentAchievements => "recent_achievements",
            Self::GlobalStats => "global_stats",
            Self::Friends => "friends",
        }
    }

    /// Suffix appended to the tracker name to form the display name.
    pub fn display_suffix(&self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::Game => "Game",
            Self::Playtime => "Playtime",
            Self::Profile => "Profile",
            Self::RecentGames => "Recent",
            Self::RecentAchievements => "Recent Achievements",
            Self::GlobalStats => "Global Stats",
            Self::Friends => "Friends",
        }
    }

    /// Returns all metric kinds.
    pub fn all() -> &'static [MetricKind] {
        &[
            Self::Status,
            Self::Game,
            Self::Playtime,
            Self::Profile,
            Self::RecentGames,
            Self::RecentAchievements,
            Self::GlobalStats,
            Self::Friends,
        ]
    }

    /// Looks up a kind by its [`id`](Self::id).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.id() == id)
    }

    /// `"{tracker name} {suffix}"`.
    pub fn display_name(&self, tracker_name: &str) -> String {
        format!("{} {}", tracker_name, self.display_suffix())
    }

    /// `"{account_id}_{id}"`.
    pub fn unique_id(&self, account_id: &str) -> String {
        format!("{}_{}", account_id, self.id())
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MetricKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s.trim()).ok_or_else(|| CoreError::UnknownMetric(s.to_string()))
    }
}

// ============================================================================
// Metric Value
// ============================================================================

/// The primary state of a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Whole-number state (counts, levels).
    Integer(i64),
    /// Fractional state (hours).
    Float(f64),
    /// Text state (labels, names).
    Text(String),
}

impl MetricValue {
    /// Integer value from a count.
    pub fn count(n: usize) -> Self {
        Self::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }

    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value, if any.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:.1}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<u32> for MetricValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for MetricValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// ============================================================================
// Metric Result
// ============================================================================

/// The output of one reducer invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Primary state; `None` when the metric could not be computed.
    pub value: Option<MetricValue>,
    /// Auxiliary attributes.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl MetricResult {
    /// A result carrying only a value.
    pub fn new(value: impl Into<MetricValue>) -> Self {
        Self {
            value: Some(value.into()),
            attributes: Map::new(),
        }
    }

    /// The total-failure result: no value, no attributes.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Whether this is the cleared result.
    pub fn is_cleared(&self) -> bool {
        self.value.is_none() && self.attributes.is_empty()
    }

    /// Adds one attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Merges the fields of a serializable struct into the attributes.
    ///
    /// Fails when `attrs` does not serialize to a JSON object.
    pub fn with_attributes<T: Serialize>(mut self, attrs: &T) -> Result<Self, CoreError> {
        match serde_json::to_value(attrs)? {
            Value::Object(map) => {
                self.attributes.extend(map);
                Ok(self)
            }
            other => Err(CoreError::InvalidData(format!(
                "attributes must serialize to an object, got {other}"
            ))),
        }
    }

    /// Looks up an attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

// ============================================================================
// Metric Snapshot
// ============================================================================

/// A metric result stamped with the time it was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Which metric.
    pub kind: MetricKind,
    /// The computed result.
    pub result: MetricResult,
    /// When the result was computed.
    pub updated_at: DateTime<Utc>,
}

impl MetricSnapshot {
    /// Stamps a result with the current time.
    pub fn new(kind: MetricKind, result: MetricResult) -> Self {
        Self {
            kind,
            result,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ids_unique() {
        let mut ids: Vec<_> = MetricKind::all().iter().map(MetricKind::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), MetricKind::all().len());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("recent_games".parse::<MetricKind>().unwrap(), MetricKind::RecentGames);
        assert!("bogus".parse::<MetricKind>().is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MetricKind::RecentGames.display_name("Steam Tracker"), "Steam Tracker Recent");
        assert_eq!(MetricKind::GlobalStats.unique_id("7656"), "7656_global_stats");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(MetricValue::from(2.0).to_string(), "2.0");
        assert_eq!(MetricValue::count(3).to_string(), "3");
        assert_eq!(MetricValue::from("Online").to_string(), "Online");
    }

    #[test]
    fn test_cleared() {
        let r = MetricResult::cleared();
        assert!(r.is_cleared());
        assert!(!MetricResult::new(0i64).is_cleared());
    }

    #[test]
    fn test_with_attributes_rejects_non_object() {
        let err = MetricResult::new(1i64).with_attributes(&vec![1, 2]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidData(_)));
    }
}
