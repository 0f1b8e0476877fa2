//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → consumed by Gate at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require rebuilding the gate
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::GateConfig;
pub use schema::IdentityConfig;
pub use schema::PathConfig;
pub use schema::RateLimitConfig;
pub use schema::RedirectConfig;
pub use schema::SecurityHeadersConfig;
