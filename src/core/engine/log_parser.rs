//! Branch counts from coverage summary logs.
//!
//! A log is a sequence of 3-line blocks, one per sampling point:
//!
//! ```text
//! lines......: 41.2% (812 of 1971 lines)
//! functions..: 55.0% (110 of 200 functions)
//! branches...: 30.1% (402 of 1336 branches)
//! ```

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{CoverageSample, LogError};

const BLOCK_LINES: usize = 3;
const BRANCHES_LINE: usize = 2;

static BRANCHES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d+) of \d+ branches\)").expect("branch pattern is valid"));

/// Extract the hit count from the branches line of every block.
///
/// A branches line that does not match contributes nothing, so later values
/// shift one column left instead of leaving a gap.
pub fn parse_branch_counts(text: &str) -> CoverageSample {
    let counts = text
        .lines()
        .skip(BRANCHES_LINE)
        .step_by(BLOCK_LINES)
        .filter_map(|line| BRANCHES_RE.captures(line))
        .filter_map(|caps| caps[1].parse::<u64>().ok())
        .collect();
    CoverageSample::new(counts)
}

pub fn read_branch_counts(path: &Path) -> Result<CoverageSample, LogError> {
    let text = fs::read_to_string(path).map_err(|source| LogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_branch_counts(&text))
}
