use super::super::args::CommentArgs;
use super::load_config;
use crate::exit_codes::{CONFIG_ERROR, STATE_ERROR, SUCCESS};
use tally_core::report::markdown::{format_rejection_comment, format_summary_comment};
use tally_core::{FileStateStore, StateStore};

/// Renders whichever of summary.json / rejection.json is newer.
pub fn run(args: CommentArgs) -> anyhow::Result<i32> {
    let config = match load_config(&args.state) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };

    let store = FileStateStore::new(&config.baseline.state_dir);
    let loaded = store
        .load_summary()
        .and_then(|s| store.load_rejection().map(|r| (s, r)));
    let (summary, rejection) = match loaded {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(STATE_ERROR);
        }
    };

    let body = match (summary, rejection) {
        (Some(s), Some(r)) if r.timestamp > s.timestamp => format_rejection_comment(&r),
        (Some(s), _) => format_summary_comment(&s),
        (None, Some(r)) => format_rejection_comment(&r),
        (None, None) => {
            eprintln!(
                "error: no summary or rejection recorded in {}",
                config.baseline.state_dir.display()
            );
            return Ok(CONFIG_ERROR);
        }
    };

    match &args.out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &body) {
                eprintln!("error: failed to write {}: {e}", path.display());
                return Ok(STATE_ERROR);
            }
            tracing::info!("Wrote PR comment to {}", path.display());
        }
        None => print!("{}", body),
    }
    Ok(SUCCESS)
}
