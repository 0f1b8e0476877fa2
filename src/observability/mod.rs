//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate decisions produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters via the metrics facade)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic increments behind the facade)
//! - The library never binds an exporter; that is the host's job

pub mod logging;
pub mod metrics;
