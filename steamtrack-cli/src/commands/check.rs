//! Check command - validate credentials with a player-summary request.

use anyhow::Result;
use serde_json::json;
use tracing::debug;

use super::Session;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Error returned when the check fails, so `main` can pick the exit code.
#[derive(Debug, thiserror::Error)]
#[error("credential check failed: {0}")]
pub struct CheckFailed(pub String);

/// Runs the check command.
pub async fn run(cli: &Cli) -> Result<()> {
    let session = Session::open(cli.tracker.as_deref()).await?;
    let identity = session.tracker.identity()?;

    let outcome = session.gateway.player_summary(&identity).await;
    debug!(ok = outcome.is_ok(), "Probe finished");

    let (persona, error) = match &outcome {
        Ok(summary) => (summary.persona_name.clone(), None),
        Err(e) => (None, Some(e.to_string())),
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!(
                "{}",
                formatter.format_check(&session.tracker, persona.as_deref(), error.as_deref())
            );
        }
        OutputFormat::Json => {
            let output = json!({
                "tracker": session.tracker.name,
                "account_id": session.tracker.account_id,
                "ok": error.is_none(),
                "persona_name": persona,
                "error": error,
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    match error {
        Some(e) => Err(CheckFailed(e).into()),
        None => Ok(()),
    }
}
