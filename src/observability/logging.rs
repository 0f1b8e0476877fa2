//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for hosts and tests
//! - Log level configurable via environment, with a caller default
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Idempotent: repeated initialization is ignored, so tests can call it
//!   freely

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies
/// (e.g. `"request_gate=debug"`).
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
