use std::cmp::Ordering;
use std::fmt::Write;

use serde::Serialize;

use crate::types::{StoreError, StoreResult, TableKey};

/// Minutes between two consecutive samples of a coverage log
pub const SAMPLE_INTERVAL_MINUTES: u32 = 30;

/// Label of the average row in a persisted table
pub const AVERAGE_LABEL: &str = "avg";

/// Elapsed minutes at a given column of a time series
pub fn elapsed_minutes(column: usize) -> u32 {
    column as u32 * SAMPLE_INTERVAL_MINUTES
}

/// Cumulative branch hit counts, one per reporting block of a coverage log
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CoverageSample(Vec<u64>);

impl CoverageSample {
    pub fn new(counts: Vec<u64>) -> Self {
        Self(counts)
    }

    pub fn counts(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u64>> for CoverageSample {
    fn from(counts: Vec<u64>) -> Self {
        Self(counts)
    }
}

/// A fuzzing run, labelled by the name of its numeric directory.
/// The original label text is kept so `007` is written back as `007`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    label: String,
    #[serde(skip)]
    number: i64,
}

impl Campaign {
    /// Returns `None` when the label is not an integer. Signed labels
    /// such as `-1` are accepted and sort before `0`.
    pub fn parse(label: &str) -> Option<Self> {
        let number = label.trim().parse::<i64>().ok()?;
        Some(Self {
            label: label.trim().to_string(),
            number,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Ord for Campaign {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for Campaign {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSeries {
    pub campaign: Campaign,
    pub sample: CoverageSample,
}

/// All campaigns of one target/fuzzer pair, plus their column-wise average
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedTable {
    pub key: TableKey,
    /// Sorted ascending by campaign number
    pub campaigns: Vec<CampaignSeries>,
    pub average: Option<Vec<f64>>,
}

impl AggregatedTable {
    /// Build a table from freshly parsed campaigns. Empty samples are dropped;
    /// returns `None` when no campaign is left.
    pub fn from_samples(key: TableKey, samples: Vec<(Campaign, CoverageSample)>) -> Option<Self> {
        let mut campaigns: Vec<CampaignSeries> = samples
            .into_iter()
            .filter(|(_, sample)| !sample.is_empty())
            .map(|(campaign, sample)| CampaignSeries { campaign, sample })
            .collect();
        if campaigns.is_empty() {
            return None;
        }
        campaigns.sort_by(|a, b| a.campaign.cmp(&b.campaign));

        let samples: Vec<&CoverageSample> = campaigns.iter().map(|c| &c.sample).collect();
        let average = column_average(&samples);
        Some(Self {
            key,
            campaigns,
            average,
        })
    }

    pub fn campaign_count(&self) -> usize {
        self.campaigns.len()
    }

    /// True when there is nothing to chart
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty() && self.average.is_none()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for series in &self.campaigns {
            out.push_str(series.campaign.label());
            for count in series.sample.counts() {
                let _ = write!(out, " {count}");
            }
            out.push('\n');
        }
        if let Some(average) = &self.average {
            out.push_str(AVERAGE_LABEL);
            for value in average {
                let _ = write!(out, " {value:.2}");
            }
            out.push('\n');
        }
        out
    }

    /// Parse the persisted text form. Blank lines are ignored, a repeated
    /// campaign label or average line replaces the earlier one.
    pub fn from_text(key: TableKey, text: &str) -> StoreResult<Self> {
        let mut campaigns: Vec<CampaignSeries> = Vec::new();
        let mut average = None;

        for (idx, line) in text.lines().enumerate() {
            let invalid = |reason: String| StoreError::InvalidLine {
                key: key.clone(),
                line: idx + 1,
                reason,
            };

            let mut tokens = line.split_whitespace();
            let Some(label) = tokens.next() else {
                continue;
            };

            if label == AVERAGE_LABEL {
                let values = tokens
                    .map(|token| {
                        token
                            .parse::<f64>()
                            .ok()
                            .filter(|v| v.is_finite())
                            .ok_or_else(|| invalid(format!("invalid average value '{token}'")))
                    })
                    .collect::<StoreResult<Vec<f64>>>()?;
                // An empty average row carries no columns to draw
                average = if values.is_empty() { None } else { Some(values) };
                continue;
            }

            let campaign = Campaign::parse(label)
                .ok_or_else(|| invalid(format!("campaign label '{label}' is not an integer")))?;
            let counts = tokens
                .map(|token| {
                    parse_count(token)
                        .ok_or_else(|| invalid(format!("invalid branch count '{token}'")))
                })
                .collect::<StoreResult<Vec<u64>>>()?;

            let series = CampaignSeries {
                campaign,
                sample: CoverageSample::new(counts),
            };
            match campaigns
                .iter_mut()
                .find(|c| c.campaign.label() == series.campaign.label())
            {
                Some(existing) => *existing = series,
                None => campaigns.push(series),
            }
        }

        campaigns.sort_by(|a, b| a.campaign.cmp(&b.campaign));
        Ok(Self {
            key,
            campaigns,
            average,
        })
    }
}

/// Counts are integers but may have been written as floats (`120.0`)
fn parse_count(token: &str) -> Option<u64> {
    if let Ok(count) = token.parse::<u64>() {
        return Some(count);
    }
    let value = token.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

/// Column-wise mean over the columns every sample has. Columns past the
/// shortest sample are dropped; `None` if that leaves no column.
pub fn column_average(samples: &[&CoverageSample]) -> Option<Vec<f64>> {
    let columns = samples.iter().map(|s| s.len()).min()?;
    if columns == 0 {
        return None;
    }
    let n = samples.len() as f64;
    let average = (0..columns)
        .map(|col| {
            let total: f64 = samples.iter().map(|s| s.counts()[col] as f64).sum();
            total / n
        })
        .collect();
    Some(average)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn campaign(label: &str) -> Campaign {
        Campaign::parse(label).unwrap()
    }

    #[test]
    fn average_truncates_to_shortest_sample() {
        let a = CoverageSample::new(vec![1, 2, 3, 4, 5]);
        let b = CoverageSample::new(vec![3, 4, 5, 6, 7, 8, 9]);
        let c = CoverageSample::new(vec![5, 6, 7]);
        let average = column_average(&[&a, &b, &c]).unwrap();
        assert_eq!(average, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn average_absent_without_columns() {
        let a = CoverageSample::new(vec![1, 2]);
        let empty = CoverageSample::default();
        assert_eq!(column_average(&[&a, &empty]), None);
        assert_eq!(column_average(&[]), None);
    }

    #[test]
    fn campaigns_sort_numerically() {
        let table = AggregatedTable::from_samples(
            TableKey::new("t", "afl"),
            vec![
                (campaign("10"), vec![1].into()),
                (campaign("2"), vec![2].into()),
                (campaign("1"), vec![3].into()),
            ],
        )
        .unwrap();
        let labels: Vec<&str> = table
            .campaigns
            .iter()
            .map(|c| c.campaign.label())
            .collect();
        assert_eq!(labels, vec!["1", "2", "10"]);
    }

    #[test]
    fn negative_campaign_labels_sort_first() {
        assert_eq!(Campaign::parse("x1"), None);
        let table = AggregatedTable::from_samples(
            TableKey::new("t", "afl"),
            vec![
                (campaign("1"), vec![1].into()),
                (campaign("-1"), vec![2].into()),
                (campaign("0"), vec![3].into()),
            ],
        )
        .unwrap();
        let labels: Vec<&str> = table
            .campaigns
            .iter()
            .map(|c| c.campaign.label())
            .collect();
        assert_eq!(labels, vec!["-1", "0", "1"]);
    }

    #[test]
    fn empty_samples_do_not_qualify() {
        let table = AggregatedTable::from_samples(
            TableKey::new("t", "afl"),
            vec![(campaign("1"), CoverageSample::default())],
        );
        assert_eq!(table, None);
    }

    #[test]
    fn serializes_campaigns_then_average() {
        let table = AggregatedTable::from_samples(
            TableKey::new("target_a", "afl"),
            vec![
                (campaign("2"), vec![12, 22, 32, 42].into()),
                (campaign("1"), vec![10, 20, 30, 40].into()),
            ],
        )
        .unwrap();
        assert_eq!(
            table.to_text(),
            "1 10 20 30 40\n2 12 22 32 42\navg 11.00 21.00 31.00 41.00\n"
        );
    }

    #[test]
    fn round_trips_through_text() {
        let table = AggregatedTable::from_samples(
            TableKey::new("t", "honggfuzz"),
            vec![
                (campaign("3"), vec![100, 150, 175].into()),
                (campaign("1"), vec![90, 140].into()),
                (campaign("2"), vec![95, 141, 160].into()),
            ],
        )
        .unwrap();
        let parsed = AggregatedTable::from_text(table.key.clone(), &table.to_text()).unwrap();

        assert_eq!(parsed.campaigns, table.campaigns);
        let expected: Vec<f64> = table
            .average
            .unwrap()
            .iter()
            .map(|v| (v * 100.0).round() / 100.0)
            .collect();
        assert_eq!(parsed.average.unwrap(), expected);
    }

    #[test]
    fn reads_float_counts_and_blank_lines() {
        let text = "\n2 10.0 20\n\n1 5 6.0\navg 7.50 13.00\n";
        let table = AggregatedTable::from_text(TableKey::new("t", "f"), text).unwrap();
        assert_eq!(table.campaigns[0].campaign.label(), "1");
        assert_eq!(table.campaigns[0].sample.counts(), &[5, 6]);
        assert_eq!(table.campaigns[1].sample.counts(), &[10, 20]);
        assert_eq!(table.average, Some(vec![7.5, 13.0]));
    }

    #[test]
    fn average_only_table_is_valid() {
        let table = AggregatedTable::from_text(TableKey::new("t", "f"), "avg 1.00 2.00\n").unwrap();
        assert_eq!(table.campaign_count(), 0);
        assert!(!table.is_empty());
    }

    #[test]
    fn rejects_malformed_lines() {
        let key = TableKey::new("t", "f");
        let err = AggregatedTable::from_text(key.clone(), "1 10\nx 3 4\n").unwrap_err();
        assert!(matches!(err, StoreError::InvalidLine { line: 2, .. }));
        assert!(AggregatedTable::from_text(key.clone(), "1 10.5\n").is_err());
        assert!(AggregatedTable::from_text(key.clone(), "1 -3\n").is_err());
        assert!(AggregatedTable::from_text(key, "avg 1.0 nope\n").is_err());
    }

    #[test]
    fn keeps_label_text() {
        let table = AggregatedTable::from_samples(
            TableKey::new("t", "f"),
            vec![(campaign("007"), vec![1].into())],
        )
        .unwrap();
        assert!(table.to_text().starts_with("007 1\n"));
    }

    #[test]
    fn time_axis_uses_sampling_interval() {
        assert_eq!(elapsed_minutes(0), 0);
        assert_eq!(elapsed_minutes(3), 90);
    }
}
