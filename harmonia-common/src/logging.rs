//! Tracing initialisation for binaries embedding the engine
//!
//! The library crates only emit `tracing` events; installing a subscriber is
//! the embedding application's choice. This helper gives every embedder the
//! same setup: `RUST_LOG` wins, otherwise `default_filter` applies.

use crate::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter used when neither `RUST_LOG` nor a caller filter is set
pub const DEFAULT_FILTER: &str = "harmonia_core=info,harmonia_common=info";

/// Install a global fmt subscriber with an env-driven filter
///
/// Fails with [`Error::Config`] when a global subscriber is already set.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::Config(format!("tracing subscriber already installed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_second_init_reports_config_error() {
        // The first call may or may not win depending on other tests in the
        // binary; the second one must always fail cleanly.
        let _ = init_tracing(DEFAULT_FILTER);
        let err = init_tracing(DEFAULT_FILTER).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
