//! Runs the covgraph binary and checks what lands on stdout.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

fn covgraph(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_covgraph"));
    cmd.current_dir(cwd);
    cmd
}

fn workdir_with_campaigns() -> TempDir {
    let workdir = TempDir::new().expect("Failed to create temp directory");
    for (fuzzer, campaign, counts) in [
        ("afl", "1", [100, 150, 200]),
        ("afl", "2", [110, 160, 210]),
        ("honggfuzz", "1", [90, 170, 220]),
    ] {
        let dir = workdir
            .path()
            .join("coverage")
            .join(fuzzer)
            .join("libpng")
            .join(campaign);
        fs::create_dir_all(&dir).expect("Failed to create campaign directory");
        let mut log = String::new();
        for count in counts {
            log.push_str("lines......: 12.5% (250 of 2000 lines)\n");
            log.push_str("functions..: 20.0% (40 of 200 functions)\n");
            log.push_str(&format!("branches...: 3.0% ({count} of 1000 branches)\n"));
        }
        fs::write(dir.join("coverage.log"), log).expect("Failed to write coverage.log");
    }
    workdir
}

fn stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{stdout}"))
}

#[test]
fn test_collect_json_keeps_stdout_clean() {
    let workdir = workdir_with_campaigns();
    let output = covgraph(workdir.path())
        .args(["collect", ".", "--format", "json"])
        .output()
        .expect("Failed to run covgraph");

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["tables_written"], 2);
    assert_eq!(report["campaigns"]["libpng"]["afl"], 2);

    // Progress lines still reach the terminal, on stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Created: libpng_afl_branch_count.txt"));
}

#[test]
fn test_run_json_is_a_single_document() {
    let workdir = workdir_with_campaigns();
    let output = covgraph(workdir.path())
        .args(["run", ".", "--format", "json"])
        .output()
        .expect("Failed to run covgraph");

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["collect"]["tables_written"], 2);
    let plot = &report["plot"];
    assert_eq!(
        plot["progress_charts"].as_u64().unwrap() + plot["failed"].as_u64().unwrap(),
        2
    );
}

#[test]
fn test_table_format_logs_progress_to_stdout() {
    let workdir = workdir_with_campaigns();
    let output = covgraph(workdir.path())
        .args(["collect", "."])
        .output()
        .expect("Failed to run covgraph");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Data Summary:"));
    assert!(serde_json::from_str::<Value>(&stdout).is_err());
}
