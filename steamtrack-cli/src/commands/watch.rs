//! Watch command - poll each metric on its own cadence.

use anyhow::Result;
use clap::Args;
use std::collections::BTreeMap;
use std::io::{Write, stdout};
use std::time::Duration;
use steamtrack_core::{MetricKind, MetricSnapshot};
use steamtrack_store::MetricStore;
use tokio::time::Instant;
use tracing::{info, warn};

use super::{Session, select_metrics};
use crate::output::{JsonFormatter, TextFormatter, format_interval};
use crate::reporter::{Reporter, Schedule};
use crate::{Cli, OutputFormat};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Metrics to poll (comma-separated ids, or "all").
    #[arg(long, short, value_delimiter = ',')]
    pub metric: Vec<String>,

    /// Lower bound on any metric's poll interval, in seconds.
    #[arg(long, default_value = "30")]
    pub min_interval: u64,
}

/// Runs the watch command until Ctrl+C.
pub async fn run(args: &WatchArgs, cli: &Cli) -> Result<()> {
    let session = Session::open(cli.tracker.as_deref()).await?;
    let kinds = select_metrics(&args.metric, &session.settings)?;
    if kinds.is_empty() {
        anyhow::bail!("No metrics enabled");
    }

    let floor = Duration::from_secs(args.min_interval.max(1));
    let schedule = Schedule::new(
        Schedule::intervals(&kinds, &session.settings, floor),
        Instant::now(),
    );
    for (kind, interval) in schedule.cadences() {
        info!(metric = %kind, interval = %format_interval(interval), "Scheduled");
    }

    let tracker = session.tracker.clone();
    let reporter = Reporter::new(
        session.gateway,
        session.tracker.identity()?,
        session.options,
        MetricStore::new(),
    );
    let mut latest: BTreeMap<MetricKind, MetricSnapshot> = BTreeMap::new();
    let text = TextFormatter::new(!cli.no_color);
    let json = JsonFormatter::new(cli.pretty);
    let format = cli.format;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    reporter
        .run(
            schedule,
            |snapshot| match format {
                OutputFormat::Text => {
                    // Redraw every metric, not just the one that finished.
                    latest.insert(snapshot.kind, snapshot.clone());
                    let all: Vec<MetricSnapshot> = latest.values().cloned().collect();
                    print!("\x1b[2J\x1b[H");
                    println!("{}", text.format_report(&tracker, &all));
                    println!();
                    println!("{}", text.format_updated(snapshot.updated_at));
                    println!("Press Ctrl+C to exit");
                    let _ = stdout().flush();
                }
                OutputFormat::Json => {
                    match json.format_report(&tracker, std::slice::from_ref(snapshot)) {
                        Ok(line) => println!("{line}"),
                        Err(e) => warn!(error = %e, "Failed to encode report"),
                    }
                }
            },
            shutdown,
        )
        .await;

    Ok(())
}
