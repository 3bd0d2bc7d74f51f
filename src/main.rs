use std::process::ExitCode;

use covgraph::run_main;
use log::{LevelFilter, error};

fn main() -> ExitCode {
    match run_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Failures before the logger is installed still need to be seen
            if log::max_level() == LevelFilter::Off {
                eprintln!("error: {e}");
            } else {
                error!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}
