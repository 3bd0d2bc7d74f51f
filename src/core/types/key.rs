use std::fmt;

use serde::Serialize;

/// Suffix shared by every persisted table file
pub const TABLE_FILE_SUFFIX: &str = "_branch_count.txt";

/// Identity of an aggregated table: one target as exercised by one fuzzer.
///
/// The on-disk name is `<target>_<fuzzer>_branch_count.txt`. Decoding splits on
/// the last underscore, so a fuzzer whose name contains an underscore cannot be
/// recovered from its filename; the prefix ends up in the target instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableKey {
    pub target: String,
    pub fuzzer: String,
}

impl TableKey {
    pub fn new(target: impl Into<String>, fuzzer: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            fuzzer: fuzzer.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_{}{}", self.target, self.fuzzer, TABLE_FILE_SUFFIX)
    }

    /// Decode a table filename. Returns `None` unless the stem splits into a
    /// non-empty target and a non-empty fuzzer.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(TABLE_FILE_SUFFIX)?;
        let (target, fuzzer) = stem.rsplit_once('_')?;
        if target.is_empty() || fuzzer.is_empty() {
            return None;
        }
        Some(Self::new(target, fuzzer))
    }

    pub fn graph_file_name(&self) -> String {
        format!("{}_{}_branch_graph.png", self.target, self.fuzzer)
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.target, self.fuzzer)
    }
}

pub fn comparison_file_name(target: &str) -> String {
    format!("{target}_comparison.png")
}
