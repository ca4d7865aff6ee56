//! Show command - one refresh cycle, printed once.

use anyhow::Result;
use clap::Args;
use steamtrack_store::MetricStore;
use tracing::info;

use super::{Session, select_metrics};
use crate::output::{JsonFormatter, TextFormatter};
use crate::reporter::Reporter;
use crate::{Cli, OutputFormat};

/// Arguments for the show command.
#[derive(Args, Default)]
pub struct ShowArgs {
    /// Metrics to compute (comma-separated ids, or "all").
    #[arg(long, short, value_delimiter = ',')]
    pub metric: Vec<String>,
}

/// Runs the show command.
pub async fn run(args: &ShowArgs, cli: &Cli) -> Result<()> {
    let session = Session::open(cli.tracker.as_deref()).await?;
    let kinds = select_metrics(&args.metric, &session.settings)?;

    info!(tracker = %session.tracker.name, metrics = kinds.len(), "Refreshing");

    let reporter = Reporter::new(
        session.gateway,
        session.tracker.identity()?,
        session.options,
        MetricStore::new(),
    );
    let snapshots = reporter.refresh(&kinds).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_report(&session.tracker, &snapshots));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_report(&session.tracker, &snapshots)?);
        }
    }

    Ok(())
}
