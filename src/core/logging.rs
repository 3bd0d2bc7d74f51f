use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use console::style;
use log::{Level, LevelFilter};

use crate::types::config::{colors_enabled, config};

static STDOUT_RESERVED: AtomicBool = AtomicBool::new(false);

/// Send every later log line to stderr so stdout only carries
/// machine-readable output
pub fn reserve_stdout() {
    STDOUT_RESERVED.store(true, Ordering::Relaxed);
}

fn routes_to_stdout(level: Level, stdout_reserved: bool) -> bool {
    level > Level::Warn && !stdout_reserved
}

/// Install the global logger from the effective configuration.
/// Info and below go to stdout as-is, unless stdout is reserved;
/// warnings and errors go to stderr with a prefix. Calling this twice
/// keeps the first logger.
pub fn init_logging() {
    let level = config()
        .log()
        .level()
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);
    let colors = colors_enabled();

    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            let prefix = match record.level() {
                Level::Error => Some(style("error:").red().bold()),
                Level::Warn => Some(style("warning:").yellow().bold()),
                Level::Debug => Some(style("debug:").dim()),
                Level::Trace => Some(style("trace:").dim()),
                Level::Info => None,
            };
            match prefix {
                Some(prefix) => out.finish(format_args!(
                    "{} {}",
                    prefix.force_styling(colors),
                    message
                )),
                None => out.finish(format_args!("{message}")),
            }
        })
        .level(level)
        .chain(
            fern::Dispatch::new()
                .filter(|metadata| {
                    routes_to_stdout(metadata.level(), STDOUT_RESERVED.load(Ordering::Relaxed))
                })
                .chain(io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .filter(|metadata| {
                    !routes_to_stdout(metadata.level(), STDOUT_RESERVED.load(Ordering::Relaxed))
                })
                .chain(io::stderr()),
        )
        .apply();

    if result.is_err() {
        log::debug!("Logger already installed");
    }
}

/// Green check mark used in progress lines
pub fn check_mark() -> String {
    style("✓").green().force_styling(colors_enabled()).to_string()
}
