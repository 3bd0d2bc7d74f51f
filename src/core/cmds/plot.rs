use std::fs;

use log::info;

use crate::FsTableStore;
use crate::chart::{PngRenderer, plot_tables};
use crate::core::cli::PlotArgs;
use crate::core::cmds::resolve_dir;
use crate::core::logging::{check_mark, reserve_stdout};
use crate::types::config::config;
use crate::types::{AppResult, OutputFormat, PlotSummary, ResultLayout};

pub fn execute_plot(args: PlotArgs) -> AppResult<PlotSummary> {
    let format = OutputFormat::parse(&args.format)?;
    if format == OutputFormat::Json {
        reserve_stdout();
    }
    let data_dir = args.data_dir.as_deref().map(resolve_dir);
    let layout = ResultLayout::for_plot(&resolve_dir(&args.workdir), data_dir.as_deref());

    layout.check_data_dir()?;
    fs::create_dir_all(&layout.graph_dir)?;
    info!(
        "{} Reading data from: {}",
        check_mark(),
        layout.data_dir.display()
    );
    info!(
        "{} Writing graphs to: {}",
        check_mark(),
        layout.graph_dir.display()
    );

    let summary = plot(&layout)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => print_summary(&summary),
    }
    Ok(summary)
}

/// Render every table in the layout's data directory into its graph directory
pub fn plot(layout: &ResultLayout) -> AppResult<PlotSummary> {
    let store = FsTableStore::new(&layout.data_dir);
    let plot_config = config().plot();
    let renderer = PngRenderer::new(plot_config.width(), plot_config.height());

    info!("");
    let summary = plot_tables(&store, &layout.graph_dir, &renderer)?;
    Ok(summary)
}

pub fn print_summary(summary: &PlotSummary) {
    info!("");
    if summary.failed > 0 {
        info!("  {} graphs could not be generated", summary.failed);
    }
    info!(
        "{} Graph generation complete! ({} progress, {} comparison)",
        check_mark(),
        summary.progress_charts,
        summary.comparison_charts
    );
}
