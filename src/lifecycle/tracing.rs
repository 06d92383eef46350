//! # Logging
//!
//! Structured logging via `tracing`, printed in the compact format without
//! module targets. `RUST_LOG` wins when set; otherwise `--verbose` selects
//! `debug` (every derived command and wait event) and the default is `info`.
//!
//! ```bash
//! RUST_LOG=trace mlaunch --single /tmp/x   # include every connect attempt
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
