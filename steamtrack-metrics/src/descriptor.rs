//! Metric descriptor system.
//!
//! A descriptor holds the static facts about a metric:
//! - Description and unit
//! - Default poll cadence
//! - Which endpoints it reads

use std::time::Duration;

use steamtrack_core::MetricKind;
use steamtrack_fetch::Endpoint;

// ============================================================================
// Metric Descriptor
// ============================================================================

/// Static configuration for one metric.
#[derive(Debug, Clone)]
pub struct MetricDescriptor {
    /// Which metric.
    pub kind: MetricKind,
    /// One-line description.
    pub description: &'static str,
    /// How often the metric is refreshed unless overridden.
    pub default_interval: Duration,
    /// Unit of numeric values.
    pub unit: Option<&'static str>,
    /// Endpoints the reducer calls.
    pub sources: &'static [Endpoint],
    /// Issues one call per owned game.
    pub expensive: bool,
}

impl MetricDescriptor {
    /// Creates a new descriptor builder.
    pub fn builder(kind: MetricKind) -> MetricDescriptorBuilder {
        MetricDescriptorBuilder::new(kind)
    }

    /// Stable identifier.
    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    /// `"{tracker name} {suffix}"`.
    pub fn display_name(&self, tracker_name: &str) -> String {
        self.kind.display_name(tracker_name)
    }

    /// `"{account_id}_{id}"`.
    pub fn unique_id(&self, account_id: &str) -> String {
        self.kind.unique_id(account_id)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `MetricDescriptor`.
#[derive(Debug)]
pub struct MetricDescriptorBuilder {
    kind: MetricKind,
    description: &'static str,
    default_interval: Duration,
    unit: Option<&'static str>,
    sources: &'static [Endpoint],
    expensive: bool,
}

impl MetricDescriptorBuilder {
    /// Creates a new builder for the given metric.
    pub fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            description: "",
            default_interval: Duration::from_secs(5 * 60),
            unit: None,
            sources: &[],
            expensive: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the default cadence.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.default_interval = interval;
        self
    }

    /// Sets the unit.
    #[must_use]
    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the endpoints read.
    #[must_use]
    pub fn sources(mut self, sources: &'static [Endpoint]) -> Self {
        self.sources = sources;
        self
    }

    /// Marks the metric as issuing per-game calls.
    #[must_use]
    pub fn expensive(mut self) -> Self {
        self.expensive = true;
        self
    }

    /// Builds the descriptor.
    pub fn build(self) -> MetricDescriptor {
        MetricDescriptor {
            kind: self.kind,
            description: self.description,
            default_interval: self.default_interval,
            unit: self.unit,
            sources: self.sources,
            expensive: self.expensive,
        }
    }
}

/// Minutes as a `Duration`.
pub(crate) const fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

/// Hours as a `Duration`.
pub(crate) const fn hours(n: u64) -> Duration {
    Duration::from_secs(n * 60 * 60)
}
