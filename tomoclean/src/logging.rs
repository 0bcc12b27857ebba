//! Tracing subscriber setup

use anyhow::{Context, Result};
use tracing::dispatcher::DefaultGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global subscriber, filtering with directives such as
/// `info` or `tomoclean_filter=debug,info`.
pub fn init(log: impl AsRef<str>) -> Result<()> {
    let log_subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(log)?)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(log_subscriber)
        .context("Failed to set logging subscriber")?;

    Ok(())
}

/// Subscriber for the current thread that writes through the test
/// harness, so output only shows for failing tests.
pub fn init_test() -> DefaultGuard {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new("trace"))
        .with_target(false)
        .with_test_writer()
        .finish();

    tracing::subscriber::set_default(subscriber)
}

fn log_filter(log: impl AsRef<str>) -> Result<EnvFilter> {
    let log = log.as_ref();
    EnvFilter::builder()
        .parse(log)
        .with_context(|| format!("Failed to parse log value: {}", log))
}
