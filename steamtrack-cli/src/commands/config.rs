//! Config command - manage trackers and settings.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use steamtrack_store::{
    SettingsStore, TrackerConfig, default_config_dir, default_settings_path, parse_yaml_trackers,
};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration (API keys masked).
    Show,

    /// Show configuration paths.
    Path,

    /// Add a tracker, or update the one with the same account id.
    Add {
        /// 64-bit Steam id.
        #[arg(long)]
        account_id: String,
        /// Steam Web API key.
        #[arg(long)]
        api_key: String,
        /// Display name (default "Steam Tracker").
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove a tracker by account id or name.
    Remove {
        /// Account id or name.
        tracker: String,
    },

    /// Import trackers from a YAML sensor block.
    Import {
        /// YAML file with `api_key`, `steam_id`, and optional `name`.
        file: PathBuf,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Add {
            account_id,
            api_key,
            name,
        } => add_tracker(account_id, api_key, name.as_deref()).await,
        ConfigAction::Remove { tracker } => remove_tracker(tracker).await,
        ConfigAction::Import { file } => import_yaml(file, cli).await,
    }
}

fn masked(tracker: &TrackerConfig) -> serde_json::Value {
    json!({
        "account_id": tracker.account_id,
        "api_key": tracker.masked_key(),
        "name": tracker.name,
    })
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("Steam Tracker Configuration");
            println!("{}", "─".repeat(40));
            println!();
            if settings.trackers.is_empty() {
                println!("No trackers configured.");
            }
            for tracker in &settings.trackers {
                let marker = if settings.selected_tracker.as_deref() == Some(tracker.account_id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{marker} {:<20} {}  key {}",
                    tracker.name,
                    tracker.account_id,
                    tracker.masked_key()
                );
            }
            println!();
            let disabled: Vec<_> = steamtrack_core::MetricKind::all()
                .iter()
                .filter(|k| !settings.is_metric_enabled(**k))
                .map(|k| k.id())
                .collect();
            if !disabled.is_empty() {
                println!("Disabled metrics: {}", disabled.join(", "));
            }
            let fetch = settings.fetch_settings();
            println!(
                "Timeouts: {}s / {}s / {}s, fan-out {}",
                fetch.timeout.as_secs(),
                fetch.extended_timeout.as_secs(),
                fetch.library_timeout.as_secs(),
                fetch.fanout_concurrency
            );
            println!("API base: {}", settings.endpoints.api_base);
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&settings)?;
            value["trackers"] = settings.trackers.iter().map(masked).collect();
            println!("{}", JsonFormatter::new(cli.pretty).format(&value)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }

    Ok(())
}

async fn add_tracker(account_id: &str, api_key: &str, name: Option<&str>) -> Result<()> {
    let tracker = TrackerConfig::sanitize(account_id, api_key, name)?;

    let store = SettingsStore::load_default().await?;
    let label = format!("{} ({})", tracker.name, tracker.account_id);
    let updated = store.update(|s| s.upsert_tracker(tracker)).await;
    store.save().await?;

    info!(updated, "Tracker saved");
    if updated {
        println!("Updated: {label}");
    } else {
        println!("Added: {label}");
    }
    Ok(())
}

async fn remove_tracker(selector: &str) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let removed = store
        .update(|s| s.remove_tracker(selector))
        .await
        .with_context(|| format!("no tracker matches '{selector}'"))?;
    store.save().await?;

    println!("Removed: {} ({})", removed.name, removed.account_id);
    Ok(())
}

async fn import_yaml(file: &PathBuf, cli: &Cli) -> Result<()> {
    let yaml = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;
    let import = parse_yaml_trackers(&yaml)?;

    let store = SettingsStore::load_default().await?;
    let imported: Vec<_> = import.trackers.iter().map(masked).collect();
    let count = import.trackers.len();
    store
        .update(|s| {
            for tracker in import.trackers {
                s.upsert_tracker(tracker);
            }
        })
        .await;
    if count > 0 {
        store.save().await?;
    }
    info!(imported = count, rejected = import.rejected.len(), "YAML import finished");

    match cli.format {
        OutputFormat::Text => {
            println!("Imported {count} tracker(s)");
            for (index, error) in &import.rejected {
                println!("Skipped entry {index}: {error}");
            }
        }
        OutputFormat::Json => {
            let rejected: Vec<_> = import
                .rejected
                .iter()
                .map(|(index, e)| json!({"index": index, "error": e.to_string()}))
                .collect();
            let output = json!({"imported": imported, "rejected": rejected});
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    if count == 0 && !import.rejected.is_empty() {
        anyhow::bail!("no valid trackers in {}", file.display());
    }
    Ok(())
}
