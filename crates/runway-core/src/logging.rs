//! Tracing subscriber setup for processes embedding Runway.

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `general.log_level` is used.
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(general: &GeneralConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
