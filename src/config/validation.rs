//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0)
//! - Check path prefixes and redirect targets are absolute
//! - Detect contradictory path classes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::GateConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("rate_limit.max_requests must be greater than zero")]
    ZeroMaxRequests,

    #[error("rate_limit.window_ms must be greater than zero")]
    ZeroWindow,

    #[error("path prefix '{0}' must start with '/'")]
    RelativePrefix(String),

    #[error("redirect target '{0}' must start with '/'")]
    RelativeRedirect(String),

    #[error("prefix '{0}' appears in both protected and auth-only sets")]
    ContradictoryClass(String),

    #[error("identity.cookie_name must not be empty")]
    EmptyCookieName,
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::ZeroMaxRequests);
    }
    if config.rate_limit.window_ms == 0 {
        errors.push(ValidationError::ZeroWindow);
    }

    let prefix_sets = [
        &config.paths.bypass_prefixes,
        &config.paths.rate_limited_prefixes,
        &config.paths.protected_prefixes,
        &config.paths.auth_only_prefixes,
        &config.paths.admin_only_prefixes,
        &config.paths.json_error_prefixes,
    ];
    for set in prefix_sets {
        for prefix in set {
            if !prefix.starts_with('/') {
                errors.push(ValidationError::RelativePrefix(prefix.clone()));
            }
        }
    }

    for target in [
        &config.redirects.login_path,
        &config.redirects.landing_path,
        &config.redirects.unauthorized_path,
    ] {
        if !target.starts_with('/') {
            errors.push(ValidationError::RelativeRedirect(target.clone()));
        }
    }

    // A path cannot simultaneously require and forbid authentication.
    for prefix in &config.paths.protected_prefixes {
        if config.paths.auth_only_prefixes.contains(prefix) {
            errors.push(ValidationError::ContradictoryClass(prefix.clone()));
        }
    }

    if config.identity.cookie_name.is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
