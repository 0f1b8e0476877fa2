//! Security response headers.
//!
//! # Responsibilities
//! - Build the header set attached to every passthrough response
//! - Own the X-RateLimit-* header names
//!
//! # Design Decisions
//! - Headers are built once at gate construction, not per request
//! - Invalid configured values are skipped with a warning, never fatal

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, CONTENT_SECURITY_POLICY, REFERRER_POLICY,
    X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};

use crate::config::schema::SecurityHeadersConfig;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Build the security response header set from configuration.
pub fn security_headers(config: &SecurityHeadersConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if !config.enabled {
        return headers;
    }

    insert(&mut headers, CONTENT_SECURITY_POLICY, &config.content_security_policy);
    insert(&mut headers, X_FRAME_OPTIONS, &config.frame_options);
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    insert(&mut headers, REFERRER_POLICY, &config.referrer_policy);

    headers
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => {
            tracing::warn!(header = %name, "invalid security header value, skipping");
        }
    }
}
