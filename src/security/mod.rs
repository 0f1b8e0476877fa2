//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (fixed window per client identifier)
//!     → headers.rs (security response headers on passthrough)
//! ```
//!
//! # Design Decisions
//! - The rate-limit store is advisory and process-local, never durable
//! - Fail open on missing client identifier (fallback bucket), fail closed
//!   on exceeded limits
//! - No trust in client input

pub mod headers;
pub mod rate_limit;
