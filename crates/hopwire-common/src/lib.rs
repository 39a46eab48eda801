//! hopwire-common - shared error type, configuration loading, and logging
//! setup used by both the server and client binaries.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;

pub use config::{Config, PortHoppingConfig, DEFAULT_CONFIG_PATH};
pub use error::{Error, Result};

/// Install a `tracing` subscriber reading its filter from `RUST_LOG`,
/// defaulting to `info` when unset.
pub fn init_tracing() {
    init_tracing_with_default("info")
}

/// Same as [`init_tracing`] but with a caller-chosen default filter level.
pub fn init_tracing_with_default(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
