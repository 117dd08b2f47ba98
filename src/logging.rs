//! Diagnostic logging via `tracing`.
//!
//! Everything goes to stderr; stdout carries the converted CSV. The level is
//! taken from `RUST_LOG` and defaults to `warn`, e.g.
//! `RUST_LOG=everlance2mileiq=debug everlance2mileiq trips.csv`.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging() {
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
