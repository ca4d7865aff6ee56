//! Last-known metric results.
//!
//! Holds one [`MetricSnapshot`] per metric. A new result replaces the old one
//! wholesale; nothing older than the last refresh is kept.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use steamtrack_core::{MetricKind, MetricResult, MetricSnapshot};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct MetricStoreInner {
    snapshots: BTreeMap<MetricKind, MetricSnapshot>,
    refreshing: BTreeSet<MetricKind>,
    last_refresh: Option<DateTime<Utc>>,
}

/// In-memory metric state shared by concurrent refreshes.
#[derive(Clone)]
pub struct MetricStore {
    inner: Arc<RwLock<MetricStoreInner>>,
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricStoreInner::default())),
        }
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// The last snapshot for a metric.
    pub async fn get(&self, kind: MetricKind) -> Option<MetricSnapshot> {
        self.inner.read().await.snapshots.get(&kind).cloned()
    }

    /// All snapshots, ordered by metric.
    pub async fn all(&self) -> Vec<MetricSnapshot> {
        self.inner.read().await.snapshots.values().cloned().collect()
    }

    /// Replaces a metric's result and returns the stored snapshot.
    pub async fn set(&self, kind: MetricKind, result: MetricResult) -> MetricSnapshot {
        let snapshot = MetricSnapshot::new(kind, result);
        debug!(metric = %kind, cleared = snapshot.result.is_cleared(), "Metric updated");
        self.inner
            .write()
            .await
            .snapshots
            .insert(kind, snapshot.clone());
        snapshot
    }

    // ========================================================================
    // Refresh Tracking
    // ========================================================================

    /// Marks metrics as refreshing.
    ///
    /// Returns the subset that was not already refreshing.
    pub async fn begin_refresh(&self, kinds: &[MetricKind]) -> Vec<MetricKind> {
        let mut inner = self.inner.write().await;
        kinds
            .iter()
            .copied()
            .filter(|k| inner.refreshing.insert(*k))
            .collect()
    }

    /// Marks metrics as done refreshing.
    pub async fn end_refresh(&self, kinds: &[MetricKind]) {
        let mut inner = self.inner.write().await;
        for kind in kinds {
            inner.refreshing.remove(kind);
        }
        inner.last_refresh = Some(Utc::now());
    }

    /// Whether a metric is currently refreshing.
    pub async fn is_refreshing(&self, kind: MetricKind) -> bool {
        self.inner.read().await.refreshing.contains(&kind)
    }

    /// When the last refresh cycle ended.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_refresh
    }
}

// ============================================================================
// Tests
// ============================================================================
