//! Metrics command - list available metrics.

use anyhow::Result;
use steamtrack_metrics::MetricRegistry;
use steamtrack_store::SettingsStore;

use crate::output::{JsonFormatter, MetricInfoOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the metrics command.
///
/// Names and unique ids are shown when a tracker resolves; the catalogue is
/// listed either way.
pub async fn run(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let settings = store.get().await;
    let tracker = store.active_tracker(cli.tracker.as_deref()).await.ok();

    let rows: Vec<_> = MetricRegistry::all()
        .iter()
        .map(|desc| {
            let interval = settings
                .metric_interval(desc.kind)
                .unwrap_or(desc.default_interval);
            (desc, interval, settings.is_metric_enabled(desc.kind))
        })
        .collect();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_metrics_header());
            for (desc, interval, enabled) in rows {
                println!(
                    "{}",
                    formatter.format_metric_line(desc, interval, enabled, tracker.as_ref())
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = rows
                .into_iter()
                .map(|(desc, interval, enabled)| {
                    MetricInfoOutput::new(desc, interval.as_secs(), enabled, tracker.as_ref())
                })
                .collect();
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
