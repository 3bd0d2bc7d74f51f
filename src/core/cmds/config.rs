use log::info;

use crate::types::config::config;
use crate::types::{AppResult, OutputFormat};

pub fn execute_config(format: &str) -> AppResult<()> {
    let format = OutputFormat::parse(format)?;
    let effective_config = config().to_effective();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&effective_config)?);
        return Ok(());
    }

    info!("Effective Configuration:");
    info!("");
    info!("Log:");
    let log = effective_config.log();
    info!("  level: {}", log.level());
    match log.color() {
        Some(true) => info!("  color: on"),
        Some(false) => info!("  color: off"),
        None => info!("  color: auto"),
    }

    info!("");
    info!("Collect:");
    info!("  log_file: {}", effective_config.collect().log_file());

    info!("");
    info!("Plot:");
    let plot = effective_config.plot();
    info!("  size: {}x{}", plot.width(), plot.height());

    Ok(())
}
