//! JSON output formatting.
//!
//! The report shape is what a home-automation host consumes: one entry per
//! metric with its name, unique id, value, and attribute map.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use steamtrack_core::{MetricSnapshot, MetricValue};
use steamtrack_metrics::MetricDescriptor;
use steamtrack_store::TrackerConfig;

// ============================================================================
// Output Types
// ============================================================================

/// One metric's state.
#[derive(Debug, Serialize)]
pub struct MetricOutput {
    pub metric: &'static str,
    pub name: String,
    pub unique_id: String,
    pub value: Option<MetricValue>,
    pub attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(serialize_with = "serialize_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl MetricOutput {
    /// Builds the output entry for a snapshot.
    pub fn from_snapshot(snapshot: &MetricSnapshot, tracker: &TrackerConfig) -> Self {
        Self {
            metric: snapshot.kind.id(),
            name: snapshot.kind.display_name(&tracker.name),
            unique_id: snapshot.kind.unique_id(&tracker.account_id),
            value: snapshot.result.value.clone(),
            attributes: snapshot.result.attributes.clone(),
            updated_at: snapshot.updated_at,
        }
    }
}

/// A full report for one tracker.
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub tracker: String,
    pub account_id: String,
    pub metrics: Vec<MetricOutput>,
}

impl ReportOutput {
    /// Builds a report from snapshots.
    pub fn new(tracker: &TrackerConfig, snapshots: &[MetricSnapshot]) -> Self {
        Self {
            tracker: tracker.name.clone(),
            account_id: tracker.account_id.clone(),
            metrics: snapshots
                .iter()
                .map(|s| MetricOutput::from_snapshot(s, tracker))
                .collect(),
        }
    }
}

/// Metric catalogue entry.
#[derive(Debug, Serialize)]
pub struct MetricInfoOutput {
    pub id: &'static str,
    pub suffix: &'static str,
    pub description: &'static str,
    pub interval_secs: u64,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub expensive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
}

impl MetricInfoOutput {
    /// Builds a catalogue entry, naming it for `tracker` when one is known.
    pub fn new(
        desc: &MetricDescriptor,
        interval_secs: u64,
        enabled: bool,
        tracker: Option<&TrackerConfig>,
    ) -> Self {
        Self {
            id: desc.id(),
            suffix: desc.kind.display_suffix(),
            description: desc.description,
            interval_secs,
            enabled,
            unit: desc.unit,
            expensive: desc.expensive,
            name: tracker.map(|t| desc.display_name(&t.name)),
            unique_id: tracker.map(|t| desc.unique_id(&t.account_id)),
        }
    }
}

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a tracker report.
    pub fn format_report(
        &self,
        tracker: &TrackerConfig,
        snapshots: &[MetricSnapshot],
    ) -> Result<String> {
        self.format(&ReportOutput::new(tracker, snapshots))
    }
}
