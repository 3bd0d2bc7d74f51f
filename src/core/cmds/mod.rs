pub mod collect;
pub mod config;
pub mod init;
pub mod plot;
pub mod run;

pub use collect::execute_collect;
pub use config::execute_config;
pub use init::execute_init;
pub use plot::execute_plot;
pub use run::execute_run;

use std::path::{Path, PathBuf};

/// Absolute form of a user-supplied directory when it exists, unchanged otherwise
fn resolve_dir(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
