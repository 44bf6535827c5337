use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use fakeflow_core::{Error, Result};

/// Install a global fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`.
pub fn init_logging(default_filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|err| Error::Logging(err.to_string()))
}

/// Route events to the test harness output. Safe to call from every test.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let layer = tracing_subscriber::fmt::layer().with_test_writer();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
