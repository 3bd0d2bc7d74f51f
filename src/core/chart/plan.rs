//! What to draw, independent of the drawing backend.

use crate::types::{
    AggregatedTable, SAMPLE_INTERVAL_MINUTES, TableKey, comparison_file_name, elapsed_minutes,
};

/// Minimum headroom above and below the data, in branches
const MIN_MARGIN: f64 = 50.0;
/// Share of the data span added above and below
const MARGIN_RATIO: f64 = 0.25;
/// Headroom for a flat series
const FLAT_MIN_MARGIN: f64 = 10.0;
const FLAT_MARGIN_RATIO: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesColor {
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    Brown,
    Pink,
    Gray,
}

impl SeriesColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SeriesColor::Red => (255, 0, 0),
            SeriesColor::Blue => (0, 0, 255),
            SeriesColor::Green => (0, 128, 0),
            SeriesColor::Orange => (255, 165, 0),
            SeriesColor::Purple => (128, 0, 128),
            SeriesColor::Brown => (165, 42, 42),
            SeriesColor::Pink => (255, 192, 203),
            SeriesColor::Gray => (128, 128, 128),
        }
    }
}

/// Fuzzer colors on comparison charts, reused from the start past eight fuzzers
pub const COMPARISON_PALETTE: [SeriesColor; 8] = [
    SeriesColor::Red,
    SeriesColor::Blue,
    SeriesColor::Green,
    SeriesColor::Orange,
    SeriesColor::Purple,
    SeriesColor::Brown,
    SeriesColor::Pink,
    SeriesColor::Gray,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Thin, semi-transparent individual campaign
    Low,
    /// Thick, opaque average
    High,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend entry, if this series introduces one
    pub label: Option<String>,
    pub color: SeriesColor,
    pub emphasis: Emphasis,
    /// (elapsed minutes, branch hit count)
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub file_name: String,
    pub title: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub series: Vec<Series>,
}

/// Y bounds with headroom: `max(25% of span, 50)` on each side, or
/// `max(10, 1% of value)` when every value is the same.
pub fn y_axis_range(values: &[f64]) -> Option<(f64, f64)> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    let margin = if max == min {
        FLAT_MIN_MARGIN.max(min * FLAT_MARGIN_RATIO)
    } else {
        ((max - min) * MARGIN_RATIO).max(MIN_MARGIN)
    };
    Some((min - margin, max + margin))
}

/// X bounds from minute 0 to the last column. A single column still spans
/// one sampling interval.
pub fn x_axis_range(point_count: usize) -> Option<(f64, f64)> {
    let last = elapsed_minutes(point_count.checked_sub(1)?);
    let end = if last == 0 {
        SAMPLE_INTERVAL_MINUTES
    } else {
        last
    };
    Some((0.0, end as f64))
}

fn to_points<I: IntoIterator<Item = f64>>(values: I) -> Vec<(f64, f64)> {
    values
        .into_iter()
        .enumerate()
        .map(|(col, v)| (elapsed_minutes(col) as f64, v))
        .collect()
}

/// Every campaign plus the average of one table.
///
/// The number of points comes from the average row, or from the first
/// campaign when there is none. Campaigns shorter than that are left out of
/// the drawing but still count toward the Y range.
pub fn progress_chart(table: &AggregatedTable) -> Option<ChartPlan> {
    let point_count = match &table.average {
        Some(average) => average.len(),
        None => table.campaigns.first()?.sample.len(),
    };
    let x_range = x_axis_range(point_count)?;

    let mut all_values: Vec<f64> = table
        .campaigns
        .iter()
        .flat_map(|c| c.sample.counts().iter().take(point_count))
        .map(|&v| v as f64)
        .collect();
    if let Some(average) = &table.average {
        all_values.extend(average);
    }
    let y_range = y_axis_range(&all_values)?;

    let mut series: Vec<Series> = table
        .campaigns
        .iter()
        .filter(|c| c.sample.len() >= point_count)
        .map(|c| Series {
            label: None,
            color: SeriesColor::Blue,
            emphasis: Emphasis::Low,
            points: to_points(c.sample.counts()[..point_count].iter().map(|&v| v as f64)),
        })
        .collect();
    if let Some(first) = series.first_mut() {
        first.label = Some("each campaign".to_string());
    }
    if let Some(average) = &table.average {
        series.push(Series {
            label: Some("avg".to_string()),
            color: SeriesColor::Red,
            emphasis: Emphasis::High,
            points: to_points(average.iter().copied()),
        });
    }

    Some(ChartPlan {
        file_name: table.key.graph_file_name(),
        title: format!(
            "{} - {} - Branch Hit Count Progress",
            table.key.target, table.key.fuzzer
        ),
        x_range,
        y_range,
        series,
    })
}

/// Average lines of several fuzzers on one target. Needs at least two
/// fuzzers with an average; they are drawn in name order.
pub fn comparison_chart(target: &str, averages: &[(&str, &[f64])]) -> Option<ChartPlan> {
    let mut averages: Vec<(&str, &[f64])> = averages
        .iter()
        .copied()
        .filter(|(_, average)| !average.is_empty())
        .collect();
    if averages.len() < 2 {
        return None;
    }
    averages.sort_by(|a, b| a.0.cmp(b.0));

    let longest = averages.iter().map(|(_, a)| a.len()).max()?;
    let x_range = x_axis_range(longest)?;
    let all_values: Vec<f64> = averages.iter().flat_map(|(_, a)| a.iter().copied()).collect();
    let y_range = y_axis_range(&all_values)?;

    let series = averages
        .iter()
        .enumerate()
        .map(|(idx, (fuzzer, average))| Series {
            label: Some(fuzzer.to_string()),
            color: COMPARISON_PALETTE[idx % COMPARISON_PALETTE.len()],
            emphasis: Emphasis::High,
            points: to_points(average.iter().copied()),
        })
        .collect();

    Some(ChartPlan {
        file_name: comparison_file_name(target),
        title: format!("{target} - Fuzzer Comparison"),
        x_range,
        y_range,
        series,
    })
}

/// One comparison chart per target that has two or more fuzzers with averages
pub fn comparison_charts(tables: &[AggregatedTable]) -> Vec<ChartPlan> {
    let mut keys: Vec<&TableKey> = tables
        .iter()
        .filter(|t| t.average.is_some())
        .map(|t| &t.key)
        .collect();
    keys.sort();

    let mut targets: Vec<&str> = keys.iter().map(|k| k.target.as_str()).collect();
    targets.dedup();

    targets
        .into_iter()
        .filter_map(|target| {
            let averages: Vec<(&str, &[f64])> = tables
                .iter()
                .filter(|t| t.key.target == target)
                .filter_map(|t| Some((t.key.fuzzer.as_str(), t.average.as_deref()?)))
                .collect();
            comparison_chart(target, &averages)
        })
        .collect()
}
