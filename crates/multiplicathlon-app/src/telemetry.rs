//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs the JSON tracing subscriber, filtered by `RUST_LOG` (default
/// `info`). Calling it again once a subscriber is installed does nothing.
pub fn init() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
