//! Shared argument types used across multiple commands.

use std::path::PathBuf;

use tally_core::ExecutionContext;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where configuration and persisted state live.
#[derive(clap::Args, Clone, Debug)]
pub struct StateArgs {
    /// Config file; a missing file means built-in defaults
    #[arg(long, default_value = "tally.yaml", env = "TALLY_CONFIG")]
    pub config: PathBuf,

    /// Overrides `baseline.state_dir` from the config
    #[arg(long, env = "TALLY_STATE_DIR")]
    pub state_dir: Option<PathBuf>,
}

/// CI context. Each flag falls back to the matching GitHub Actions variable.
#[derive(clap::Args, Clone, Debug)]
pub struct ContextArgs {
    /// Branch the run belongs to (`refs/heads/` prefix accepted)
    #[arg(long, env = "GITHUB_REF_NAME", default_value = "")]
    pub branch: String,

    /// Event kind that triggered the run (push, merge, pull_request, ...)
    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "")]
    pub event: String,

    /// Commit used when the snapshot does not name one
    #[arg(long, env = "GITHUB_SHA")]
    pub commit: Option<String>,

    #[arg(long, env = "GITHUB_ACTOR")]
    pub actor: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: Option<String>,
}

impl From<&ContextArgs> for ExecutionContext {
    fn from(args: &ContextArgs) -> Self {
        ExecutionContext {
            branch: args.branch.clone(),
            event: args.event.clone(),
            commit: args.commit.clone(),
            actor: args.actor.clone(),
            repository: args.repository.clone(),
            run_id: args.run_id.clone(),
        }
    }
}
