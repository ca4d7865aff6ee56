// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! steamtrack - Steam account metrics from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Register an account
//! steamtrack config add --account-id 76561198000000000 --api-key XXXX --name Gabe
//!
//! # One refresh of every enabled metric
//! steamtrack
//!
//! # Selected metrics as JSON
//! steamtrack show --metric status,playtime --format json --pretty
//!
//! # Poll each metric on its own cadence
//! steamtrack watch
//!
//! # Validate credentials
//! steamtrack check
//! ```

mod commands;
mod output;
mod reporter;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use steamtrack_store::StoreError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{check, config, metrics, show, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// steamtrack - Steam account metrics.
#[derive(Parser)]
#[command(name = "steamtrack")]
#[command(about = "Steam Web API metrics reporter")]
#[command(long_about = r#"
steamtrack polls the Steam Web API and reports derived metrics for an account.

Metrics:
  status               Online status (every minute)
  game                 Game being played (5 min)
  playtime             Library playtime and top games (3 h)
  profile              Steam level and XP (3 h)
  recent_games         Games played in the last two weeks (10 min)
  recent_achievements  Achievement progress of recent games (3 h)
  global_stats         Library-wide achievement totals (5 h)
  friends              Friends and what they are playing (5 min)

Examples:
  steamtrack                            # All enabled metrics, once
  steamtrack show -m status,game        # Selected metrics
  steamtrack --format json watch        # One JSON report per refresh cycle
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'show' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Tracker to use, by account id or name.
    #[arg(long, short, global = true)]
    pub tracker: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one refresh cycle and print the results (default).
    #[command(visible_alias = "s")]
    Show(show::ShowArgs),

    /// Poll each metric on its cadence until interrupted.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// List metrics with their cadence and unique ids.
    #[command(visible_alias = "m")]
    Metrics,

    /// Manage trackers and settings.
    Config(config::ConfigArgs),

    /// Validate credentials against the player-summary endpoint.
    Check,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// No usable tracker configuration.
    ConfigMissing = 2,
    /// The Steam Web API rejected or failed the credential check.
    CheckFailed = 3,
}

impl ExitCode {
    /// Picks the exit code for a command error.
    fn for_error(error: &anyhow::Error) -> Self {
        if error
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_config)
            || error.downcast_ref::<steamtrack_store::ConfigError>().is_some()
        {
            ExitCode::ConfigMissing
        } else if error.downcast_ref::<check::CheckFailed>().is_some() {
            ExitCode::CheckFailed
        } else {
            ExitCode::Error
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("steamtrack=debug,info")
    } else {
        EnvFilter::new("steamtrack=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Show(args)) => show::run(args, &cli).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli).await,
        Some(Commands::Metrics) => metrics::run(&cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        Some(Commands::Check) => check::run(&cli).await,
        None => show::run(&show::ShowArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
