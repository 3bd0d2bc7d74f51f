use serde::Serialize;

use crate::core::cli::RunArgs;
use crate::core::cmds::{collect, plot, resolve_dir};
use crate::core::logging::reserve_stdout;
use crate::types::{AggregateSummary, AppResult, OutputFormat, PlotSummary, ResultLayout};

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub collect: AggregateSummary,
    pub plot: PlotSummary,
}

/// Collect every campaign into data files, then render all graphs
pub fn execute_run(args: RunArgs) -> AppResult<RunReport> {
    let format = OutputFormat::parse(&args.format)?;
    if format == OutputFormat::Json {
        reserve_stdout();
    }
    let data_dir = args.data_dir.as_deref().map(resolve_dir);
    let layout = ResultLayout::for_workdir(&resolve_dir(&args.workdir), data_dir.as_deref());

    let collected = collect::collect(&layout)?;
    if format == OutputFormat::Table {
        collect::print_summary(&collected);
    }

    let plotted = plot::plot(&layout)?;
    let report = RunReport {
        collect: collected,
        plot: plotted,
    };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => plot::print_summary(&report.plot),
    }
    Ok(report)
}
