use super::super::args::CheckArgs;
use super::{load_config, render_outcome};
use crate::exit_codes::{CONFIG_ERROR, GATE_FAILED, SUCCESS};
use tally_core::{
    ExecutionContext, FileSnapshotSource, FileStateStore, SnapshotSource, UpdateError,
    UpdateOutcome, Updater,
};

/// Dry run of the updater without the branch/event guards.
pub fn run(args: CheckArgs) -> anyhow::Result<i32> {
    let config = match load_config(&args.state) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };

    let snapshot = match FileSnapshotSource::new(&args.snapshot).load() {
        Ok(s) => s,
        Err(e) => {
            let e = UpdateError::from(e);
            eprintln!("error: {e}");
            return Ok(e.exit_code());
        }
    };

    let store = FileStateStore::new(&config.baseline.state_dir);
    let ctx = ExecutionContext::from(&args.context);
    let outcome = match Updater::new(&store, &config)
        .dry_run(true)
        .apply(&ctx, snapshot)
    {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(e.exit_code());
        }
    };

    println!("{}", render_outcome(&outcome, args.format)?);

    Ok(match outcome {
        UpdateOutcome::Rejected(_) => GATE_FAILED,
        _ => SUCCESS,
    })
}
