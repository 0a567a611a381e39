pub mod app;
pub mod config;
pub mod email_provider;
mod error;
pub mod form;
pub mod function;
pub mod payment_client;
pub mod web;

// re-exports
pub use app::{App, AppState};
pub use error::{Error, Result};
pub use payment_client::PaymentClient;
pub use web::serve;

use tracing_subscriber::EnvFilter;

/// Human readable logging for development. `RUST_LOG` overrides the default `debug` filter.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .init();
}

/// Logging for deployments. `RUST_LOG` overrides the default `info` filter.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
