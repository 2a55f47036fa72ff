use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub use common::*;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Keeps a CI metrics baseline: weighted acceptance gate, deltas and trends"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a snapshot and roll the baseline forward when accepted
    Update(UpdateArgs),
    /// Preview the gate, delta and trends for a snapshot without writing state
    Check(CheckArgs),
    /// Trends over the stored history
    Trend(TrendArgs),
    /// Print the stored baseline
    Show(ShowArgs),
    /// Write a synthesized metrics snapshot (no real measurement)
    Snapshot(SnapshotArgs),
    /// Render the last summary or rejection as a Markdown PR comment
    Comment(CommentArgs),
    Version,
}

#[derive(Parser, Clone, Debug)]
pub struct UpdateArgs {
    /// Metrics snapshot produced by an earlier CI step
    #[arg(long, default_value = "metrics.json")]
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub state: StateArgs,

    #[command(flatten)]
    pub context: ContextArgs,

    /// Exit 1 when the snapshot is rejected (default: exit 0)
    #[arg(long)]
    pub fail_on_reject: bool,

    /// Also copy summary.json to this path on acceptance
    #[arg(long)]
    pub summary_out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Clone, Debug)]
pub struct CheckArgs {
    #[arg(long, default_value = "metrics.json")]
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub state: StateArgs,

    #[command(flatten)]
    pub context: ContextArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Clone, Debug)]
pub struct TrendArgs {
    #[command(flatten)]
    pub state: StateArgs,

    /// Trailing entries to analyze (default: `baseline.trend_window`)
    #[arg(long)]
    pub window: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Clone, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub state: StateArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Clone, Debug)]
pub struct SnapshotArgs {
    #[arg(long, default_value = "metrics.json")]
    pub out: PathBuf,

    /// Fixed seed for reproducible values
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, env = "GITHUB_SHA", default_value = "unknown")]
    pub commit: String,

    #[arg(long, env = "GITHUB_REF_NAME", default_value = "unknown")]
    pub branch: String,
}

#[derive(Parser, Clone, Debug)]
pub struct CommentArgs {
    #[command(flatten)]
    pub state: StateArgs,

    /// Write the comment here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_flags_parse() {
        let cli = Cli::try_parse_from([
            "tally",
            "update",
            "--snapshot",
            "m.json",
            "--branch",
            "main",
            "--event",
            "push",
            "--state-dir",
            "/tmp/state",
            "--fail-on-reject",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Update(args) = cli.cmd else {
            panic!("expected update");
        };
        assert_eq!(args.snapshot, PathBuf::from("m.json"));
        assert_eq!(args.context.branch, "main");
        assert_eq!(args.state.state_dir, Some(PathBuf::from("/tmp/state")));
        assert!(args.fail_on_reject);
        assert_eq!(args.format, OutputFormat::Json);
    }
}
