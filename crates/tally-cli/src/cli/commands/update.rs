use super::super::args::UpdateArgs;
use super::{load_config, render_outcome};
use crate::exit_codes::{CONFIG_ERROR, GATE_FAILED, STATE_ERROR, SUCCESS};
use tally_core::report::write_summary;
use tally_core::{ExecutionContext, FileSnapshotSource, FileStateStore, UpdateOutcome, Updater};

pub fn run(args: UpdateArgs) -> anyhow::Result<i32> {
    let config = match load_config(&args.state) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };

    let store = FileStateStore::new(&config.baseline.state_dir);
    let ctx = ExecutionContext::from(&args.context);
    let source = FileSnapshotSource::new(&args.snapshot);

    let outcome = match Updater::new(&store, &config).run(&ctx, &source) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(e.exit_code());
        }
    };

    if let (UpdateOutcome::Accepted(summary), Some(out)) = (&outcome, &args.summary_out) {
        if let Err(e) = write_summary(summary, out) {
            eprintln!("error: failed to write {}: {e:#}", out.display());
            return Ok(STATE_ERROR);
        }
        tracing::info!("Wrote {}", out.display());
    }

    println!("{}", render_outcome(&outcome, args.format)?);

    Ok(match outcome {
        UpdateOutcome::Rejected(_) if args.fail_on_reject => GATE_FAILED,
        _ => SUCCESS,
    })
}
