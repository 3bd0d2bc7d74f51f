use std::fs;
use std::io::Write;
use std::path::PathBuf;

use log::{info, warn};

use crate::types::AppResult;
use crate::types::config::CONFIG_FILENAME;

const EXAMPLE_CONFIG: &str = include_str!("../../example.toml");

pub fn execute_init() -> AppResult<()> {
    let cfg_path = PathBuf::from(CONFIG_FILENAME);
    if cfg_path.exists() {
        warn!("{} already exists; leaving it unchanged", CONFIG_FILENAME);
    } else {
        let mut f = fs::File::create(&cfg_path)?;
        f.write_all(EXAMPLE_CONFIG.as_bytes())?;
        info!("Created {}", cfg_path.display());
    }

    Ok(())
}
