use std::collections::BTreeMap;

use serde::Serialize;

/// Outcome of a collect pass
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct AggregateSummary {
    /// Map from target to fuzzer to number of campaigns written
    pub campaigns: BTreeMap<String, BTreeMap<String, usize>>,
    pub tables_written: usize,
    pub tables_failed: usize,
}

impl AggregateSummary {
    pub fn record(&mut self, target: &str, fuzzer: &str, campaigns: usize) {
        self.campaigns
            .entry(target.to_string())
            .or_default()
            .insert(fuzzer.to_string(), campaigns);
        self.tables_written += 1;
    }
}

/// Outcome of a plot pass
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct PlotSummary {
    pub progress_charts: usize,
    pub comparison_charts: usize,
    pub skipped: usize,
    pub failed: usize,
}
