//! Walk `coverage/<fuzzer>/<target>/<campaign>/` and build one table per
//! target/fuzzer pair.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::TableStore;
use crate::core::engine::log_parser::read_branch_counts;
use crate::core::logging::check_mark;
use crate::types::{AggregateSummary, AggregatedTable, Campaign, CoverageSample, TableKey};

/// Parse every campaign under `coverage_dir` into tables.
///
/// Only a failure to list `coverage_dir` itself is an error; anything below it
/// that cannot be read is logged and skipped.
pub fn collect_tables(coverage_dir: &Path, log_file: &str) -> io::Result<Vec<AggregatedTable>> {
    let mut tables = Vec::new();

    for (fuzzer, fuzzer_path) in subdirectories(coverage_dir)? {
        let targets = match subdirectories(&fuzzer_path) {
            Ok(targets) => targets,
            Err(e) => {
                warn!("Skipping fuzzer {fuzzer}: {e}");
                continue;
            }
        };

        for (target, target_path) in targets {
            let key = TableKey::new(target, fuzzer.clone());
            let samples = collect_campaigns(&key, &target_path, log_file);
            match AggregatedTable::from_samples(key, samples) {
                Some(table) => tables.push(table),
                None => debug!("No usable campaigns under {}", target_path.display()),
            }
        }
    }

    Ok(tables)
}

fn collect_campaigns(
    key: &TableKey,
    target_path: &Path,
    log_file: &str,
) -> Vec<(Campaign, CoverageSample)> {
    let campaigns = match subdirectories(target_path) {
        Ok(campaigns) => campaigns,
        Err(e) => {
            warn!("Skipping {key}: {e}");
            return vec![];
        }
    };

    let mut samples = Vec::new();
    for (label, campaign_path) in campaigns {
        let Some(campaign) = Campaign::parse(&label) else {
            warn!(
                "Skipping campaign directory {}: name is not a number",
                campaign_path.display()
            );
            continue;
        };

        let log_path = campaign_path.join(log_file);
        if !log_path.is_file() {
            debug!("No {log_file} in {}", campaign_path.display());
            continue;
        }

        match read_branch_counts(&log_path) {
            Ok(sample) if sample.is_empty() => {
                debug!("No branch counts in {}", log_path.display());
            }
            Ok(sample) => samples.push((campaign, sample)),
            Err(e) => warn!("{e}"),
        }
    }
    samples
}

/// Collect all tables and write them through `store`.
/// A table that fails to write is counted and the batch continues.
pub fn aggregate(
    coverage_dir: &Path,
    log_file: &str,
    store: &dyn TableStore,
) -> io::Result<AggregateSummary> {
    let mut summary = AggregateSummary::default();

    for table in collect_tables(coverage_dir, log_file)? {
        match store.write(&table) {
            Ok(()) => {
                info!(
                    "{} Created: {} ({} campaigns)",
                    check_mark(),
                    table.key.file_name(),
                    table.campaign_count()
                );
                summary.record(&table.key.target, &table.key.fuzzer, table.campaign_count());
            }
            Err(e) => {
                warn!("Failed to write {}: {e}", table.key.file_name());
                summary.tables_failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Child directories sorted by name; files and non-UTF-8 names are ignored
fn subdirectories(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            dirs.push((name.to_string(), path.clone()));
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTableStore;
    use pretty_assertions::assert_eq;

    fn write_log(root: &Path, fuzzer: &str, target: &str, campaign: &str, counts: &[u64]) {
        let dir = root.join(fuzzer).join(target).join(campaign);
        fs::create_dir_all(&dir).unwrap();
        let text: String = counts
            .iter()
            .map(|n| {
                format!(
                    "lines......: 1.0% (1 of 100 lines)\n\
                     functions..: 1.0% (1 of 100 functions)\n\
                     branches...: 1.0% ({n} of 5000 branches)\n"
                )
            })
            .collect();
        fs::write(dir.join("coverage.log"), text).unwrap();
    }

    #[test]
    fn builds_one_table_per_pair() {
        let tmp = tempfile::tempdir().unwrap();
        write_log(tmp.path(), "afl", "png", "1", &[1, 2]);
        write_log(tmp.path(), "afl", "xml", "1", &[3, 4]);
        write_log(tmp.path(), "libfuzzer", "png", "1", &[5, 6]);

        let tables = collect_tables(tmp.path(), "coverage.log").unwrap();
        let keys: Vec<TableKey> = tables.into_iter().map(|t| t.key).collect();
        assert_eq!(
            keys,
            vec![
                TableKey::new("png", "afl"),
                TableKey::new("xml", "afl"),
                TableKey::new("png", "libfuzzer"),
            ]
        );
    }

    #[test]
    fn skips_campaigns_without_data() {
        let tmp = tempfile::tempdir().unwrap();
        write_log(tmp.path(), "afl", "png", "1", &[10, 20]);
        write_log(tmp.path(), "afl", "png", "2", &[]);
        fs::create_dir_all(tmp.path().join("afl/png/3")).unwrap();
        write_log(tmp.path(), "afl", "png", "latest", &[99]);
        fs::write(tmp.path().join("afl/png/notes.txt"), "ignored").unwrap();
        fs::write(tmp.path().join("README"), "ignored").unwrap();

        let tables = collect_tables(tmp.path(), "coverage.log").unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].campaign_count(), 1);
        assert_eq!(tables[0].campaigns[0].campaign.label(), "1");
    }

    #[test]
    fn pair_without_campaigns_emits_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        write_log(tmp.path(), "afl", "png", "1", &[]);
        fs::create_dir_all(tmp.path().join("afl/empty_target")).unwrap();

        let store = MemoryTableStore::new();
        let summary = aggregate(tmp.path(), "coverage.log", &store).unwrap();
        assert!(store.is_empty());
        assert_eq!(summary, AggregateSummary::default());
    }

    #[test]
    fn honors_custom_log_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_log(tmp.path(), "afl", "png", "1", &[7]);
        fs::rename(
            tmp.path().join("afl/png/1/coverage.log"),
            tmp.path().join("afl/png/1/summary.txt"),
        )
        .unwrap();

        assert!(collect_tables(tmp.path(), "coverage.log").unwrap().is_empty());
        assert_eq!(collect_tables(tmp.path(), "summary.txt").unwrap().len(), 1);
    }

    #[test]
    fn summary_counts_campaigns() {
        let tmp = tempfile::tempdir().unwrap();
        write_log(tmp.path(), "afl", "png", "1", &[1]);
        write_log(tmp.path(), "afl", "png", "2", &[2]);
        write_log(tmp.path(), "honggfuzz", "png", "1", &[3]);

        let store = MemoryTableStore::new();
        let summary = aggregate(tmp.path(), "coverage.log", &store).unwrap();
        assert_eq!(summary.tables_written, 2);
        assert_eq!(summary.campaigns["png"]["afl"], 2);
        assert_eq!(summary.campaigns["png"]["honggfuzz"], 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(collect_tables(&tmp.path().join("nope"), "coverage.log").is_err());
    }
}
