use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Logs go to stderr so they don't mix with REPL output on stdout. `RUST_LOG`
/// takes precedence over `default_filter`.
pub fn init(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}
