//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The library only emits `tracing` events; the binary decides where they go.
//!
//! - `error`: load failures
//! - `warn`: degenerate statistics, dropped rows without identifier
//! - `info`: per-stage counts
//! - `debug`: per-column decisions, cache hits

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map `-v` occurrences to a level; `quiet` wins over verbosity.
pub fn level_from_verbosity(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: Level) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}
