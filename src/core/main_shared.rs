use std::env;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use crate::core::cli::{Args, Commands};
use crate::core::cmds;
use crate::core::logging::init_logging;
use crate::types::AppResult;
use crate::types::config::{CliOverrides, init_with_overrides};

pub fn run_main() -> AppResult<()> {
    let args = Args::parse();

    // Handle global arguments
    if let Some(cwd_arg) = args.cwd.as_ref() {
        let cwd = PathBuf::from(cwd_arg).canonicalize()?;
        env::set_current_dir(&cwd)?;
    }
    let cwd = env::current_dir()?;

    // Build CLI overrides for config precedence
    let cli_overrides = CliOverrides {
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
    };

    // Initialize configuration (file, then CLI overrides)
    init_with_overrides(&cli_overrides);

    // Initialize logging after config so level/color are applied
    init_logging();
    debug!("Current working directory: {}", cwd.display());

    match args.command {
        Commands::Init => cmds::execute_init()?,
        Commands::Run(run_args) => {
            cmds::execute_run(run_args)?;
        }
        Commands::Collect(collect_args) => {
            cmds::execute_collect(collect_args)?;
        }
        Commands::Plot(plot_args) => {
            cmds::execute_plot(plot_args)?;
        }
        Commands::Config(config_args) => cmds::execute_config(&config_args.format)?,
    }

    Ok(())
}
