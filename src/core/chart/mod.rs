pub mod plan;
pub mod png;

use std::path::Path;

use log::{debug, info, warn};

use crate::TableStore;
use crate::core::logging::check_mark;
use crate::types::{PlotSummary, RenderError, StoreResult};

pub use plan::{ChartPlan, comparison_charts, progress_chart};
pub use png::PngRenderer;

/// Turns a chart plan into an image file
pub trait ChartRenderer {
    fn render(&self, plan: &ChartPlan, path: &Path) -> Result<(), RenderError>;
}

/// Render a progress chart for every stored table, then a comparison chart
/// for every target with several fuzzers. Individual failures are logged and
/// counted; only failing to list the store is an error.
pub fn plot_tables(
    store: &dyn TableStore,
    graph_dir: &Path,
    renderer: &dyn ChartRenderer,
) -> StoreResult<PlotSummary> {
    let mut summary = PlotSummary::default();
    let keys = store.keys()?;
    if keys.is_empty() {
        info!("No data files found");
        return Ok(summary);
    }

    info!("Generating {} graphs...", keys.len());
    let mut tables = Vec::with_capacity(keys.len());
    for key in keys {
        let table = match store.read(&key) {
            Ok(table) => table,
            Err(e) => {
                warn!("{e}");
                summary.failed += 1;
                continue;
            }
        };

        match progress_chart(&table) {
            Some(plan) => {
                if draw(renderer, &plan, graph_dir) {
                    summary.progress_charts += 1;
                } else {
                    summary.failed += 1;
                }
            }
            None => {
                debug!("Nothing to draw for {key}");
                summary.skipped += 1;
            }
        }
        tables.push(table);
    }

    info!("");
    info!("Generating comparison graphs...");
    for plan in comparison_charts(&tables) {
        if draw(renderer, &plan, graph_dir) {
            summary.comparison_charts += 1;
        } else {
            summary.failed += 1;
        }
    }
    if summary.comparison_charts > 0 {
        info!(
            "{} Created {} comparison graphs",
            check_mark(),
            summary.comparison_charts
        );
    }

    Ok(summary)
}

fn draw(renderer: &dyn ChartRenderer, plan: &ChartPlan, graph_dir: &Path) -> bool {
    let path = graph_dir.join(&plan.file_name);
    match renderer.render(plan, &path) {
        Ok(()) => {
            info!("{} Created: {}", check_mark(), plan.file_name);
            true
        }
        Err(e) => {
            warn!("{e}");
            false
        }
    }
}
