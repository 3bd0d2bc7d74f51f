use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::TableKey;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Coverage directory not found: {0}")]
    CoverageDirMissing(PathBuf),
    #[error("Coverage directory is empty: {0}")]
    CoverageDirEmpty(PathBuf),
    #[error("Data directory not found: {0}")]
    DataDirMissing(PathBuf),
    #[error("Unknown output format '{0}' (expected 'table' or 'json')")]
    InvalidFormat(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Failure to read a single coverage log
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("No table stored for {0}")]
    NotFound(TableKey),
    #[error("Malformed table {key}, line {line}: {reason}")]
    InvalidLine {
        key: TableKey,
        line: usize,
        reason: String,
    },
    #[error("Invalid table pattern: {0}")]
    Pattern(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to draw {path}: {reason}")]
    Draw { path: PathBuf, reason: String },
    #[error("Chart '{0}' has no points to draw")]
    EmptyChart(String),
}
