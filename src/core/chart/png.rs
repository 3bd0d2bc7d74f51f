use std::fmt::Display;
use std::path::Path;

use plotters::prelude::*;

use crate::core::chart::ChartRenderer;
use crate::core::chart::plan::{ChartPlan, Emphasis, SeriesColor};
use crate::types::RenderError;

/// Raster charts through the plotters bitmap backend
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    width: u32,
    height: u32,
}

impl PngRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

fn draw_error<E: Display>(path: &Path) -> impl Fn(E) -> RenderError + '_ {
    move |e| RenderError::Draw {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn line_style(color: SeriesColor, emphasis: Emphasis) -> ShapeStyle {
    let (r, g, b) = color.rgb();
    let rgb = RGBColor(r, g, b);
    match emphasis {
        Emphasis::Low => rgb.mix(0.3).stroke_width(2),
        Emphasis::High => rgb.stroke_width(3),
    }
}

impl ChartRenderer for PngRenderer {
    fn render(&self, plan: &ChartPlan, path: &Path) -> Result<(), RenderError> {
        if plan.series.is_empty() {
            return Err(RenderError::EmptyChart(plan.title.clone()));
        }

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error(path))?;

        let (x_start, x_end) = plan.x_range;
        let (y_start, y_end) = plan.y_range;
        let mut chart = ChartBuilder::on(&root)
            .caption(&plan.title, ("sans-serif", 32))
            .margin(24)
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d(x_start..x_end, y_start..y_end)
            .map_err(draw_error(path))?;

        chart
            .configure_mesh()
            .x_desc("Time (minutes)")
            .y_desc("Branch Hit Count")
            .light_line_style(BLACK.mix(0.05))
            .bold_line_style(BLACK.mix(0.15))
            .axis_desc_style(("sans-serif", 22))
            .label_style(("sans-serif", 16))
            .draw()
            .map_err(draw_error(path))?;

        let mut has_labels = false;
        for series in &plan.series {
            let style = line_style(series.color, series.emphasis);
            let point_size = match series.emphasis {
                Emphasis::Low => 2,
                Emphasis::High => 3,
            };
            let anno = chart
                .draw_series(
                    LineSeries::new(series.points.iter().copied(), style).point_size(point_size),
                )
                .map_err(draw_error(path))?;
            if let Some(label) = &series.label {
                has_labels = true;
                anno.label(label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], style));
            }
        }

        if has_labels {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(("sans-serif", 18))
                .draw()
                .map_err(draw_error(path))?;
        }

        root.present().map_err(draw_error(path))?;
        Ok(())
    }
}
