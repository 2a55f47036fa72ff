use super::super::args::{OutputFormat, ShowArgs};
use super::load_config;
use crate::exit_codes::{CONFIG_ERROR, STATE_ERROR, SUCCESS};
use tally_core::report::console::format_baseline;
use tally_core::{FileStateStore, StateStore};

pub fn run(args: ShowArgs) -> anyhow::Result<i32> {
    let config = match load_config(&args.state) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };

    let store = FileStateStore::new(&config.baseline.state_dir);
    let baseline = match store.load_baseline() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(STATE_ERROR);
        }
    };

    match (args.format, baseline) {
        (OutputFormat::Json, baseline) => {
            println!("{}", serde_json::to_string_pretty(&baseline)?);
        }
        (OutputFormat::Text, Some(baseline)) => println!("{}", format_baseline(&baseline)),
        (OutputFormat::Text, None) => println!(
            "No baseline recorded in {}",
            config.baseline.state_dir.display()
        ),
    }
    Ok(SUCCESS)
}
