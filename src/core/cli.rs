use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// All relative paths will be interpreted relative to this directory.
    #[arg(long, global = true)]
    pub cwd: Option<String>,

    /// Logging level (overrides env/config). One of: trace, debug, info, warn, error
    #[arg(long = "log.level", global = true)]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color", global = true)]
    pub log_color: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example covgraph.toml into the current directory
    Init,

    /// Collect branch counts and render all graphs
    Run(RunArgs),

    /// Collect branch counts into data files without rendering
    Collect(RunArgs),

    /// Render graphs from previously collected data files
    Plot(PlotArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the run and collect commands
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Result directory containing coverage/<fuzzer>/<target>/<campaign>/
    #[arg(value_name = "WORKDIR")]
    pub workdir: PathBuf,

    /// Where to write data files (defaults to WORKDIR/graph/data).
    /// Graphs are written to its parent directory.
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Summary format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the plot command
#[derive(Parser, Debug)]
pub struct PlotArgs {
    /// Result directory, or the graph/data directory itself
    #[arg(value_name = "WORKDIR")]
    pub workdir: PathBuf,

    /// Data directory to read (defaults to WORKDIR/graph/data).
    /// Graphs are written to its parent directory.
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Summary format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}
