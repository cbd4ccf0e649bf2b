//! Tracing setup for the CLI and tests.
//!
//! Diagnostics go to stderr in compact form so stdout stays clean for text
//! and JSON output. `RUST_LOG` always wins over the verbosity flags.

use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Verbosity maps to `warn` (default), `info` (`-v`), `debug` (`-vv`) and
/// `trace` (`-vvv`); `quiet` drops to `error`. When `log_file` is given, a
/// JSON layer is appended to that file as well.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened. Installing a second
/// global subscriber is ignored.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .compact();

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().json().with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}

/// Install a subscriber that writes through the test harness capture.
///
/// Safe to call from many tests; only the first call installs.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer().compact())
        .try_init();
}

fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
