use serde::Serialize;

use super::super::args::{OutputFormat, TrendArgs};
use super::load_config;
use crate::exit_codes::{CONFIG_ERROR, STATE_ERROR, SUCCESS};
use tally_core::report::console::format_trends;
use tally_core::trend::analyze_history;
use tally_core::{FileStateStore, StateStore, Trends};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendReport {
    window: usize,
    history_size: usize,
    trends: Trends,
}

pub fn run(args: TrendArgs) -> anyhow::Result<i32> {
    let config = match load_config(&args.state) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };
    let window = args.window.unwrap_or(config.baseline.trend_window);
    if window == 0 {
        eprintln!("error: --window must be at least 1");
        return Ok(CONFIG_ERROR);
    }

    let store = FileStateStore::new(&config.baseline.state_dir);
    let history = match store.load_history() {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(STATE_ERROR);
        }
    };

    let report = TrendReport {
        window,
        history_size: history.len(),
        trends: analyze_history(&history, window, config.baseline.stable_slope),
    };
    match args.format {
        OutputFormat::Text => {
            println!(
                "{} ({} of {} entries)",
                format_trends(&report.trends),
                window.min(report.history_size),
                report.history_size
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(SUCCESS)
}
