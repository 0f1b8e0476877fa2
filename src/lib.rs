//! Request gate library: rate limiting and authorization middleware.
//!
//! # Architecture Overview
//!
//! ```text
//! Incoming request:
//!     → gate::paths (bypass check: static assets skip everything)
//!     → security::rate_limit (fixed window per client identifier)
//!     → identity (credential extraction + injected resolver)
//!     → gate (role check for admin-only paths)
//!     → Continue with security response headers, or Deny
//! ```
//!
//! The gate is a library-level function meant to be embedded in a host
//! application's request pipeline. It performs no I/O of its own: credentials
//! are read from headers already attached to the request, and the rate-limit
//! registry is process-local and advisory. Loss of the registry (restart)
//! simply forgives all callers.

pub mod config;
pub mod gate;
pub mod identity;
pub mod middleware;
pub mod observability;
pub mod security;

pub use config::schema::GateConfig;
pub use gate::decision::{Decision, Denial, DenyReason, Passthrough};
pub use gate::Gate;
pub use identity::{IdentityContext, IdentityResolver, Role};
pub use middleware::{gate_middleware, protect};
