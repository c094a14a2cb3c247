//! # Tracing Setup
//!
//! Installs the global `tracing` subscriber used by the host process.
//!
//! - **Environment-based filtering**: `RUST_LOG` wins when set
//! - **Fallback level**: `default_directive` otherwise (e.g. `"info"`)
//! - **Compact format**: spans inline, no module paths
//!
//! ```bash
//! RUST_LOG=debug cargo run                      # everything
//! RUST_LOG=startup_framework=debug cargo run    # orchestrator only
//! ```
//!
//! A startup pass then reads like:
//!
//! ```text
//! INFO startup: Initializing modules modules=11 last=executor
//! INFO startup:module: Initialized elapsed_ms=0 name="authz"
//! ...
//! INFO startup: Startup complete modules=12 elapsed_ms=3
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
