//! Gate decision types.

use std::time::Duration;

use axum::http::header::{HeaderMap, HeaderValue, LOCATION, RETRY_AFTER};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::identity::IdentityContext;
use crate::security::headers::{X_RATELIMIT_LIMIT, X_RATELIMIT_REMAINING};
use crate::security::rate_limit::ceil_secs;

/// The outcome of evaluating the gate for one request.
#[derive(Debug)]
pub enum Decision {
    /// The request proceeds, optionally decorated with response headers.
    Continue(Passthrough),
    /// The request is terminated with a fully-formed response.
    Deny(Denial),
}

/// Decoration carried by an admitted request.
#[derive(Debug, Default)]
pub struct Passthrough {
    /// Headers to attach to the eventual response.
    pub response_headers: HeaderMap,
    /// Identity resolved for this request, if any.
    pub identity: Option<IdentityContext>,
}

impl Passthrough {
    /// An empty passthrough (bypass paths).
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Why a request was denied. Used as a logging field and metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    RateLimited,
    Unauthenticated,
    AlreadyAuthenticated,
    Forbidden,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::RateLimited => "rate_limited",
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::AlreadyAuthenticated => "already_authenticated",
            DenyReason::Forbidden => "forbidden",
        }
    }
}

/// A terminal response produced by the gate.
#[derive(Debug)]
pub struct Denial {
    pub reason: DenyReason,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: DenyBody,
}

/// Body shape of a denial.
#[derive(Debug)]
pub enum DenyBody {
    Empty,
    Json(serde_json::Value),
}

impl Denial {
    /// 429 with machine-readable retry timing and `X-RateLimit-*` headers.
    pub fn rate_limited(limit: u32, retry_after: Duration) -> Self {
        let secs = ceil_secs(retry_after);
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from(secs));
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limit));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u32));

        Self {
            reason: DenyReason::RateLimited,
            status: StatusCode::TOO_MANY_REQUESTS,
            headers,
            body: DenyBody::Json(serde_json::json!({
                "error": "rate limit exceeded",
                "retry_after_seconds": secs,
            })),
        }
    }

    /// 302 redirect to the given location.
    pub fn redirect(reason: DenyReason, location: &str) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(location) {
            headers.insert(LOCATION, value);
        }

        Self {
            reason,
            status: StatusCode::FOUND,
            headers,
            body: DenyBody::Empty,
        }
    }

    /// 401 JSON for API-style callers.
    pub fn unauthenticated_json() -> Self {
        Self {
            reason: DenyReason::Unauthenticated,
            status: StatusCode::UNAUTHORIZED,
            headers: HeaderMap::new(),
            body: DenyBody::Json(serde_json::json!({
                "error": "authentication required",
            })),
        }
    }

    /// 403 JSON for API-style callers.
    pub fn forbidden_json() -> Self {
        Self {
            reason: DenyReason::Forbidden,
            status: StatusCode::FORBIDDEN,
            headers: HeaderMap::new(),
            body: DenyBody::Json(serde_json::json!({
                "error": "insufficient role",
            })),
        }
    }
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        match self.body {
            DenyBody::Empty => (self.status, self.headers).into_response(),
            DenyBody::Json(value) => (self.status, self.headers, axum::Json(value)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_denial() {
        let denial = Denial::redirect(DenyReason::Unauthenticated, "/login?next=%2Fdashboard");

        assert_eq!(denial.status, StatusCode::FOUND);
        assert_eq!(
            denial.headers.get(LOCATION).unwrap(),
            "/login?next=%2Fdashboard"
        );
    }

    #[test]
    fn test_rate_limited_denial() {
        let denial = Denial::rate_limited(100, Duration::from_millis(48_200));

        assert_eq!(denial.status, StatusCode::TOO_MANY_REQUESTS);
        // 48.2s rounds up to 49
        assert_eq!(denial.headers.get(RETRY_AFTER).unwrap(), "49");
        assert_eq!(denial.headers.get(X_RATELIMIT_REMAINING).unwrap(), "0");

        match denial.body {
            DenyBody::Json(value) => {
                assert_eq!(value["retry_after_seconds"], 49);
                assert_eq!(value["error"], "rate limit exceeded");
            }
            DenyBody::Empty => panic!("expected JSON body"),
        }
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(DenyReason::RateLimited.as_str(), "rate_limited");
        assert_eq!(DenyReason::Forbidden.as_str(), "forbidden");
    }
}
