//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the request gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Rate limiting parameters.
    pub rate_limit: RateLimitConfig,

    /// Path class definitions (bypass, protected, admin-only, ...).
    pub paths: PathConfig,

    /// Credential extraction settings.
    pub identity: IdentityConfig,

    /// Redirect targets for denied page requests.
    pub redirects: RedirectConfig,

    /// Security response headers.
    pub security_headers: SecurityHeadersConfig,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum requests per window per client identifier.
    pub max_requests: u32,

    /// Window length in milliseconds.
    pub window_ms: u64,

    /// Header carrying the client's forwarded address.
    pub client_header: String,

    /// Identifier substituted when the client header is missing or unreadable.
    /// All headerless callers share this bucket.
    pub fallback_identifier: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_ms: 60_000,
            client_header: "x-forwarded-for".to_string(),
            fallback_identifier: "unknown".to_string(),
        }
    }
}

/// Path class configuration.
///
/// Every class is a set of path prefixes, matched case-sensitively.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathConfig {
    /// Paths that skip the gate entirely (static assets, framework internals).
    pub bypass_prefixes: Vec<String>,

    /// Paths subject to rate limiting.
    pub rate_limited_prefixes: Vec<String>,

    /// Paths requiring an authenticated caller.
    pub protected_prefixes: Vec<String>,

    /// Paths only reachable while unauthenticated (login, register).
    pub auth_only_prefixes: Vec<String>,

    /// Paths requiring the admin role.
    pub admin_only_prefixes: Vec<String>,

    /// Paths whose denials render as JSON (401/403) instead of redirects.
    pub json_error_prefixes: Vec<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            bypass_prefixes: vec![
                "/static".to_string(),
                "/assets".to_string(),
                "/favicon.ico".to_string(),
            ],
            rate_limited_prefixes: vec!["/api".to_string()],
            protected_prefixes: vec!["/dashboard".to_string(), "/account".to_string()],
            auth_only_prefixes: vec!["/login".to_string(), "/register".to_string()],
            admin_only_prefixes: vec!["/admin".to_string()],
            json_error_prefixes: vec!["/api".to_string()],
        }
    }
}

/// Redirect targets for denied page requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Login page; unauthenticated callers on protected paths land here.
    pub login_path: String,

    /// Default landing page for authenticated callers bounced off auth pages.
    pub landing_path: String,

    /// Page shown on role mismatch.
    pub unauthorized_path: String,

    /// Query parameter carrying the original path on login redirects.
    pub return_to_param: String,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
            return_to_param: "next".to_string(),
        }
    }
}

/// Credential extraction configuration.
///
/// Bearer tokens in the Authorization header are always honored; the cookie
/// is the fallback for browser callers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Name of the session cookie.
    pub cookie_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
        }
    }
}

/// Security response header configuration.
///
/// `X-Content-Type-Options: nosniff` is always sent when enabled; the
/// remaining values are configurable.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityHeadersConfig {
    /// Enable security headers on passthrough responses.
    pub enabled: bool,

    /// Content-Security-Policy value.
    pub content_security_policy: String,

    /// X-Frame-Options value.
    pub frame_options: String,

    /// Referrer-Policy value.
    pub referrer_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            content_security_policy: "default-src 'self'".to_string(),
            frame_options: "DENY".to_string(),
            referrer_policy: "strict-origin-when-cross-origin".to_string(),
        }
    }
}
