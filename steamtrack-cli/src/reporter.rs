//! Metric scheduling and refresh cycles.
//!
//! The reporter owns the polling loop. Every due metric runs as its own
//! task, so a slow upstream only delays that metric. Metrics that fall due
//! at the same instant form one refresh cycle and share a [`CycleCache`]:
//! two metrics reading the same endpoint cost one upstream call. The cache
//! is dropped when the last task of the cycle finishes.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use steamtrack_core::{Identity, MetricKind, MetricSnapshot};
use steamtrack_fetch::{CycleCache, SteamGateway};
use steamtrack_metrics::{MetricRegistry, ReduceOptions, compute_metric};
use steamtrack_store::{MetricStore, Settings};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

// ============================================================================
// Schedule
// ============================================================================

/// Poll cadence and next due time for each metric.
#[derive(Debug, Clone)]
pub struct Schedule {
    entries: BTreeMap<MetricKind, (Duration, Instant)>,
}

impl Schedule {
    /// Every metric is due at `start`.
    pub fn new(intervals: impl IntoIterator<Item = (MetricKind, Duration)>, start: Instant) -> Self {
        Self {
            entries: intervals
                .into_iter()
                .map(|(kind, interval)| (kind, (interval, start)))
                .collect(),
        }
    }

    /// Cadences for `kinds`: settings override, else the registry default,
    /// never below `floor`.
    pub fn intervals(
        kinds: &[MetricKind],
        settings: &Settings,
        floor: Duration,
    ) -> Vec<(MetricKind, Duration)> {
        kinds
            .iter()
            .map(|kind| {
                let interval = settings
                    .metric_interval(*kind)
                    .or_else(|| MetricRegistry::get(*kind).map(|d| d.default_interval))
                    .unwrap_or(floor);
                (*kind, interval.max(floor))
            })
            .collect()
    }

    /// Metrics due at `now`.
    pub fn due(&self, now: Instant) -> Vec<MetricKind> {
        self.entries
            .iter()
            .filter(|(_, (_, next))| *next <= now)
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Reschedules `kinds` one interval after `now`.
    pub fn advance(&mut self, kinds: &[MetricKind], now: Instant) {
        for kind in kinds {
            if let Some((interval, next)) = self.entries.get_mut(kind) {
                *next = now + *interval;
            }
        }
    }

    /// Earliest next due time.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.entries.values().map(|(_, next)| *next).min()
    }

    /// Scheduled metrics with their cadence.
    pub fn cadences(&self) -> impl Iterator<Item = (MetricKind, Duration)> + '_ {
        self.entries.iter().map(|(kind, (interval, _))| (*kind, *interval))
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Runs metrics for one tracker and records the results.
#[derive(Clone)]
pub struct Reporter {
    gateway: Arc<dyn SteamGateway>,
    identity: Identity,
    options: ReduceOptions,
    store: MetricStore,
}

impl Reporter {
    /// Creates a reporter writing into `store`.
    pub fn new(
        gateway: Arc<dyn SteamGateway>,
        identity: Identity,
        options: ReduceOptions,
        store: MetricStore,
    ) -> Self {
        Self {
            gateway,
            identity,
            options,
            store,
        }
    }

    /// The store results are written to.
    pub fn store(&self) -> &MetricStore {
        &self.store
    }

    /// Runs one refresh cycle over `kinds` and waits for all of it.
    ///
    /// Metrics still refreshing from an earlier cycle are skipped. Returns
    /// the snapshots written this cycle, in the order of `kinds`.
    pub async fn refresh(&self, kinds: &[MetricKind]) -> Vec<MetricSnapshot> {
        let mut tasks = JoinSet::new();
        self.start_cycle(kinds, &mut tasks).await;

        let mut snapshots = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => warn!(error = %e, "Metric task failed"),
            }
        }
        snapshots.sort_by_key(|s| kinds.iter().position(|k| *k == s.kind));
        snapshots
    }

    /// Polls `schedule` until `shutdown` resolves.
    ///
    /// `on_result` runs for every metric as soon as it finishes, whatever
    /// else is still in flight. Tasks still running at shutdown are aborted.
    pub async fn run<F, S>(&self, mut schedule: Schedule, mut on_result: F, shutdown: S)
    where
        F: FnMut(&MetricSnapshot),
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut tasks = JoinSet::new();

        loop {
            let now = Instant::now();
            let due = schedule.due(now);
            if !due.is_empty() {
                self.start_cycle(&due, &mut tasks).await;
                schedule.advance(&due, now);
            }

            let Some(wakeup) = schedule.next_wakeup() else {
                break;
            };

            tokio::select! {
                () = tokio::time::sleep_until(wakeup) => {}
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => match joined {
                    Ok(snapshot) => on_result(&snapshot),
                    Err(e) => warn!(error = %e, "Metric task failed"),
                },
                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "Reporter stopped");
                    break;
                }
            }
        }

        tasks.abort_all();
    }

    /// Spawns one task per metric in `kinds` that is not already refreshing.
    /// The tasks share a cache for this cycle only.
    async fn start_cycle(&self, kinds: &[MetricKind], tasks: &mut JoinSet<MetricSnapshot>) {
        let started = self.store.begin_refresh(kinds).await;
        if started.len() < kinds.len() {
            debug!(
                skipped = kinds.len() - started.len(),
                "Metrics already refreshing"
            );
        }
        if started.is_empty() {
            return;
        }

        let cycle = Arc::new(CycleCache::new(Arc::clone(&self.gateway)));
        debug!(metrics = started.len(), "Refresh cycle started");
        for kind in started {
            let reporter = self.clone();
            let cycle = Arc::clone(&cycle);
            tasks.spawn(async move { reporter.refresh_one(kind, &cycle).await });
        }
    }

    async fn refresh_one(&self, kind: MetricKind, cycle: &CycleCache) -> MetricSnapshot {
        let result = compute_metric(kind, cycle, &self.identity, &self.options).await;
        let snapshot = self.store.set(kind, result).await;
        self.store.end_refresh(&[kind]).await;

        let stats = cycle.stats();
        debug!(
            metric = %kind,
            cache_hits = stats.hits,
            upstream_calls = stats.misses,
            "Metric refreshed"
        );
        snapshot
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use steamtrack_core::{GameRecord, PlayerSummary};
    use steamtrack_fetch::testing::{FakeGateway, GatewayCall};

    fn identity() -> Identity {
        Identity::new("76561198000000000", "TESTKEY").unwrap()
    }

    fn fake() -> Arc<FakeGateway> {
        Arc::new(
            FakeGateway::new()
                .with_summary(PlayerSummary {
                    persona_state: Some(1),
                    game_extra_info: Some("Portal 2".to_string()),
                    game_id: Some("620".to_string()),
                    ..Default::default()
                })
                .with_owned_games(vec![GameRecord::new(620, "Portal 2", 90)]),
        )
    }

    fn reporter(gateway: Arc<FakeGateway>) -> Reporter {
        Reporter::new(
            gateway,
            identity(),
            ReduceOptions::default(),
            MetricStore::new(),
        )
    }

    #[test]
    fn test_schedule_due_and_advance() {
        let start = Instant::now();
        let mut schedule = Schedule::new(
            [
                (MetricKind::Status, Duration::from_secs(60)),
                (MetricKind::Game, Duration::from_secs(300)),
            ],
            start,
        );

        assert_eq!(schedule.due(start), vec![MetricKind::Status, MetricKind::Game]);

        schedule.advance(&[MetricKind::Status, MetricKind::Game], start);
        assert!(schedule.due(start).is_empty());
        assert_eq!(schedule.next_wakeup(), Some(start + Duration::from_secs(60)));
        assert_eq!(
            schedule.due(start + Duration::from_secs(60)),
            vec![MetricKind::Status]
        );
        assert_eq!(
            schedule.due(start + Duration::from_secs(300)),
            vec![MetricKind::Status, MetricKind::Game]
        );
    }

    #[test]
    fn test_intervals_use_override_default_and_floor() {
        let mut settings = Settings::default();
        settings.set_metric_interval(MetricKind::Game, Some(Duration::from_secs(120)));
        settings.set_metric_interval(MetricKind::Friends, Some(Duration::from_secs(5)));

        let intervals: BTreeMap<_, _> = Schedule::intervals(
            &[MetricKind::Status, MetricKind::Game, MetricKind::Friends],
            &settings,
            Duration::from_secs(30),
        )
        .into_iter()
        .collect();

        assert_eq!(intervals[&MetricKind::Status], Duration::from_secs(60));
        assert_eq!(intervals[&MetricKind::Game], Duration::from_secs(120));
        assert_eq!(intervals[&MetricKind::Friends], Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_cycle_shares_upstream_calls() {
        let gateway = fake();
        let reporter = reporter(gateway.clone());

        let snapshots = reporter
            .refresh(&[MetricKind::Status, MetricKind::Game])
            .await;

        assert_eq!(snapshots.len(), 2);
        assert_eq!(
            gateway.count_calls(|c| matches!(c, GatewayCall::PlayerSummary)),
            1
        );
        let game = reporter.store().get(MetricKind::Game).await.unwrap();
        assert_eq!(game.result.value.unwrap().as_text(), Some("Portal 2"));
    }

    #[tokio::test]
    async fn test_cycles_do_not_share_cache() {
        let gateway = fake();
        let reporter = reporter(gateway.clone());

        reporter.refresh(&[MetricKind::Status]).await;
        reporter.refresh(&[MetricKind::Status]).await;

        assert_eq!(
            gateway.count_calls(|c| matches!(c, GatewayCall::PlayerSummary)),
            2
        );
    }

    #[tokio::test]
    async fn test_failed_metric_is_stored_cleared() {
        let gateway = Arc::new(FakeGateway::new());
        let reporter = reporter(gateway);

        let snapshots = reporter.refresh(&[MetricKind::Status]).await;

        assert_eq!(snapshots.len(), 1);
        assert!(snapshots[0].result.is_cleared());
        assert!(!reporter.store().is_refreshing(MetricKind::Status).await);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let gateway = fake();
        let reporter = reporter(gateway.clone());
        let schedule = Schedule::new(
            [(MetricKind::Status, Duration::from_secs(3600))],
            Instant::now(),
        );

        let mut results = 0;
        reporter
            .run(schedule, |_| results += 1, async {
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
            .await;

        assert_eq!(results, 1);
        assert_eq!(
            gateway.count_calls(|c| matches!(c, GatewayCall::PlayerSummary)),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_metric_does_not_hold_back_others() {
        let gateway = Arc::new(
            FakeGateway::new()
                .with_summary(PlayerSummary {
                    persona_state: Some(1),
                    ..Default::default()
                })
                .with_owned_games(vec![GameRecord::new(620, "Portal 2", 90)])
                .delay_when(Duration::from_secs(600), |c| {
                    matches!(c, GatewayCall::OwnedGames { .. })
                }),
        );
        let reporter = reporter(gateway);
        let start = Instant::now();
        let schedule = Schedule::new(
            [
                (MetricKind::Status, Duration::from_secs(60)),
                (MetricKind::GlobalStats, Duration::from_secs(5 * 3600)),
            ],
            start,
        );

        let mut seen: Vec<MetricKind> = Vec::new();
        reporter
            .run(schedule, |s| seen.push(s.kind), async {
                tokio::time::sleep(Duration::from_secs(300)).await;
            })
            .await;

        let status = seen.iter().filter(|k| **k == MetricKind::Status).count();
        assert!(status >= 5, "status refreshed {status} times");
        assert!(!seen.contains(&MetricKind::GlobalStats));
        assert!(start.elapsed() < Duration::from_secs(600));
        assert!(reporter.store().get(MetricKind::GlobalStats).await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_keeps_requested_order() {
        let reporter = reporter(fake());

        let snapshots = reporter
            .refresh(&[MetricKind::Game, MetricKind::Status])
            .await;

        let kinds: Vec<_> = snapshots.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![MetricKind::Game, MetricKind::Status]);
    }
}
