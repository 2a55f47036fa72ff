use super::args::*;

pub mod check;
pub mod comment;
mod dispatch;
pub mod show;
pub mod snapshot;
pub mod trend;
pub mod update;

pub use dispatch::dispatch;

use tally_core::report::console::{format_rejection, format_summary};
use tally_core::{ConfigError, TallyConfig, UpdateOutcome};

/// Loads the config and applies the `--state-dir` override.
pub(crate) fn load_config(args: &StateArgs) -> Result<TallyConfig, ConfigError> {
    let mut config = TallyConfig::load(&args.config)?;
    if let Some(dir) = &args.state_dir {
        config.baseline.state_dir = dir.clone();
    }
    tracing::debug!(
        "config {} (state dir {})",
        args.config.display(),
        config.baseline.state_dir.display()
    );
    Ok(config)
}

pub(crate) fn render_outcome(
    outcome: &UpdateOutcome,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Text => match outcome {
            UpdateOutcome::Skipped(reason) => format!("Skipped: {}", reason),
            UpdateOutcome::Rejected(rejection) => format_rejection(rejection),
            UpdateOutcome::Accepted(summary) => format_summary(summary),
        },
        OutputFormat::Json => {
            let value = match outcome {
                UpdateOutcome::Skipped(reason) => serde_json::json!({
                    "status": "skipped",
                    "reason": reason.to_string(),
                }),
                UpdateOutcome::Rejected(rejection) => serde_json::json!({
                    "status": "rejected",
                    "rejection": rejection,
                }),
                UpdateOutcome::Accepted(summary) => serde_json::json!({
                    "status": "accepted",
                    "summary": summary,
                }),
            };
            serde_json::to_string_pretty(&value)?
        }
    };
    Ok(rendered)
}
