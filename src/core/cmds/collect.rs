use log::info;

use crate::FsTableStore;
use crate::aggregate::aggregate;
use crate::core::cli::RunArgs;
use crate::core::cmds::resolve_dir;
use crate::core::logging::{check_mark, reserve_stdout};
use crate::types::config::config;
use crate::types::{AggregateSummary, AppResult, OutputFormat, ResultLayout};

pub fn execute_collect(args: RunArgs) -> AppResult<AggregateSummary> {
    let format = OutputFormat::parse(&args.format)?;
    if format == OutputFormat::Json {
        reserve_stdout();
    }
    let data_dir = args.data_dir.as_deref().map(resolve_dir);
    let layout = ResultLayout::for_workdir(&resolve_dir(&args.workdir), data_dir.as_deref());

    let summary = collect(&layout)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => print_summary(&summary),
    }
    Ok(summary)
}

/// Check the input, create the output directories and write every table
pub fn collect(layout: &ResultLayout) -> AppResult<AggregateSummary> {
    layout.check_coverage_dir()?;
    info!(
        "{} Coverage directory found: {}",
        check_mark(),
        layout.coverage_dir.display()
    );

    layout.create_output_dirs()?;
    info!(
        "{} Graph directory: {}",
        check_mark(),
        layout.graph_dir.display()
    );
    info!(
        "{} Data directory: {}",
        check_mark(),
        layout.data_dir.display()
    );

    info!("");
    info!("Collecting branch hit count data...");
    let store = FsTableStore::new(&layout.data_dir);
    let summary = aggregate(&layout.coverage_dir, config().collect().log_file(), &store)?;
    Ok(summary)
}

pub fn print_summary(summary: &AggregateSummary) {
    info!("");
    info!(
        "{} Created {} data files",
        check_mark(),
        summary.tables_written
    );
    if summary.tables_failed > 0 {
        info!("  {} data files could not be written", summary.tables_failed);
    }
    if summary.campaigns.is_empty() {
        return;
    }

    info!("");
    info!("Data Summary:");
    for (target, fuzzers) in &summary.campaigns {
        info!("  {target}:");
        for (fuzzer, count) in fuzzers {
            info!("    - {fuzzer}: {count} campaigns");
        }
    }
}
