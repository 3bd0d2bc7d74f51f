use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{AppError, AppResult};

/// Directories used by one run, all derived from the result directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLayout {
    pub coverage_dir: PathBuf,
    pub graph_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl ResultLayout {
    /// `<workdir>/coverage`, `<workdir>/graph`, `<workdir>/graph/data`.
    /// An explicit data directory moves the graph directory to its parent.
    pub fn for_workdir(workdir: &Path, data_dir: Option<&Path>) -> Self {
        let coverage_dir = workdir.join("coverage");
        match data_dir {
            Some(data_dir) => Self {
                coverage_dir,
                graph_dir: parent_or_self(data_dir),
                data_dir: data_dir.to_path_buf(),
            },
            None => Self {
                coverage_dir,
                graph_dir: workdir.join("graph"),
                data_dir: workdir.join("graph").join("data"),
            },
        }
    }

    /// Like `for_workdir`, but also accepts the `graph/data` directory itself
    /// as the working directory.
    pub fn for_plot(workdir: &Path, data_dir: Option<&Path>) -> Self {
        if data_dir.is_none() && is_graph_data_dir(workdir) {
            return Self {
                coverage_dir: parent_or_self(&parent_or_self(workdir)).join("coverage"),
                graph_dir: parent_or_self(workdir),
                data_dir: workdir.to_path_buf(),
            };
        }
        Self::for_workdir(workdir, data_dir)
    }

    /// Fails unless the coverage directory exists and has at least one entry
    pub fn check_coverage_dir(&self) -> AppResult<()> {
        if !self.coverage_dir.is_dir() {
            return Err(AppError::CoverageDirMissing(self.coverage_dir.clone()));
        }
        if fs::read_dir(&self.coverage_dir)?.next().is_none() {
            return Err(AppError::CoverageDirEmpty(self.coverage_dir.clone()));
        }
        Ok(())
    }

    pub fn check_data_dir(&self) -> AppResult<()> {
        if !self.data_dir.is_dir() {
            return Err(AppError::DataDirMissing(self.data_dir.clone()));
        }
        Ok(())
    }

    pub fn create_output_dirs(&self) -> AppResult<()> {
        fs::create_dir_all(&self.graph_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

fn is_graph_data_dir(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == "data")
        && path
            .parent()
            .and_then(|parent| parent.file_name())
            .is_some_and(|name| name == "graph")
}

fn parent_or_self(path: &Path) -> PathBuf {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(path)
        .to_path_buf()
}
