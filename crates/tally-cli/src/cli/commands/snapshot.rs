use anyhow::Context;

use super::super::args::SnapshotArgs;
use crate::exit_codes::SUCCESS;
use tally_core::{SnapshotSource, SyntheticSnapshotSource};

pub fn run(args: SnapshotArgs) -> anyhow::Result<i32> {
    let mut source = SyntheticSnapshotSource::new(&args.commit, &args.branch);
    if let Some(seed) = args.seed {
        source = source.with_seed(seed);
    }
    let snapshot = source.load()?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&args.out, serde_json::to_string_pretty(&snapshot)?)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    tracing::info!("Wrote synthetic snapshot to {}", args.out.display());
    Ok(SUCCESS)
}
