//! Tracing setup

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Honors `RUST_LOG`; events go to stderr so command output stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("budgetbook=info".parse().unwrap());

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
