//! The request gate.
//!
//! # Data Flow
//! ```text
//! evaluate(request):
//!     1. bypass check      → Continue immediately (static assets)
//!     2. rate limit check  → Deny 429 or record X-RateLimit-Remaining
//!     3. authentication    → Deny redirect/401, or bounce off auth pages
//!     4. role check        → Deny redirect/403 for non-admins
//!     5. Continue with security response headers
//! ```
//!
//! # Design Decisions
//! - First terminal result wins; each step only reads the request and the
//!   identifier's rate-limit entry
//! - All decisions resolve locally; nothing is thrown to the host
//! - Capabilities (identity resolver, rate-limit store) are injected at
//!   construction

pub mod decision;
pub mod paths;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::header::{HeaderMap, HeaderValue};
use axum::http::Request;
use url::form_urlencoded;

use crate::config::schema::GateConfig;
use crate::gate::decision::{Decision, Denial, DenyReason, Passthrough};
use crate::gate::paths::PathClasses;
use crate::identity::{extract_credential, IdentityResolver, Role};
use crate::observability::metrics;
use crate::security::headers::{security_headers, X_RATELIMIT_LIMIT, X_RATELIMIT_REMAINING};
use crate::security::rate_limit::{FixedWindowLimiter, MemoryStore, RateLimitStore, Verdict};

/// Evaluates every inbound request against the configured decision chain.
///
/// `Send + Sync`; share it via `Arc`. The rate-limit registry is the only
/// shared mutable state and lives behind the injected store.
pub struct Gate {
    config: GateConfig,
    classes: PathClasses,
    limiter: FixedWindowLimiter,
    resolver: Arc<dyn IdentityResolver>,
    security_headers: HeaderMap,
}

impl Gate {
    /// Create a gate with a process-local in-memory rate-limit store.
    pub fn new(config: GateConfig, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self::with_store(config, resolver, Arc::new(MemoryStore::default()))
    }

    /// Create a gate over an explicit rate-limit store.
    pub fn with_store(
        config: GateConfig,
        resolver: Arc<dyn IdentityResolver>,
        store: Arc<dyn RateLimitStore>,
    ) -> Self {
        let classes = PathClasses::from_config(&config.paths);
        let limiter = FixedWindowLimiter::new(
            store,
            config.rate_limit.max_requests,
            Duration::from_millis(config.rate_limit.window_ms),
        );
        let security_headers = security_headers(&config.security_headers);

        Self {
            config,
            classes,
            limiter,
            resolver,
            security_headers,
        }
    }

    /// Evaluate a request against the decision chain.
    pub fn evaluate(&self, request: &Request<Body>) -> Decision {
        self.evaluate_at(request, Instant::now())
    }

    /// Evaluate at an explicit instant. Exposed for tests so window behavior
    /// can be exercised without sleeping.
    pub fn evaluate_at(&self, request: &Request<Body>, now: Instant) -> Decision {
        let path = request.uri().path();

        // 1. Bypass: assets carry no authorization sensitivity and should not
        // consume rate-limit budget.
        if self.classes.bypass.matches(path) {
            metrics::record_decision("bypass");
            return Decision::Continue(Passthrough::empty());
        }

        let mut response_headers = HeaderMap::new();

        // 2. Rate limit, only for the configured path class.
        if self.config.rate_limit.enabled && self.classes.rate_limited.matches(path) {
            let client = self.client_identifier(request.headers());
            match self.limiter.check_at(&client, now) {
                Verdict::Allowed { remaining } => {
                    response_headers.insert(
                        X_RATELIMIT_LIMIT,
                        HeaderValue::from(self.config.rate_limit.max_requests),
                    );
                    response_headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
                }
                Verdict::Denied { retry_after } => {
                    tracing::warn!(client = %client, path = %path, "rate limit exceeded");
                    metrics::record_rate_limited();
                    metrics::record_decision(DenyReason::RateLimited.as_str());
                    return Decision::Deny(Denial::rate_limited(
                        self.config.rate_limit.max_requests,
                        retry_after,
                    ));
                }
            }
        }

        // 3. Authentication: identity is derived fresh per request.
        let identity = extract_credential(request.headers(), &self.config.identity.cookie_name)
            .and_then(|credential| self.resolver.resolve(&credential));

        if self.classes.protected.matches(path) && identity.is_none() {
            tracing::warn!(path = %path, "unauthenticated request on protected path");
            metrics::record_decision(DenyReason::Unauthenticated.as_str());
            let denial = if self.classes.json_error.matches(path) {
                Denial::unauthenticated_json()
            } else {
                Denial::redirect(DenyReason::Unauthenticated, &self.login_location(path))
            };
            return Decision::Deny(denial);
        }

        if self.classes.auth_only.matches(path) && identity.is_some() {
            tracing::debug!(path = %path, "authenticated caller bounced off auth page");
            metrics::record_decision(DenyReason::AlreadyAuthenticated.as_str());
            return Decision::Deny(Denial::redirect(
                DenyReason::AlreadyAuthenticated,
                &self.config.redirects.landing_path,
            ));
        }

        // 4. Role: absent identity counts as a role mismatch here; paths
        // normally also sit in the protected class and were caught above.
        if self.classes.admin_only.matches(path) {
            let is_admin = identity
                .as_ref()
                .map(|identity| identity.role == Role::Admin)
                .unwrap_or(false);
            if !is_admin {
                tracing::warn!(
                    path = %path,
                    subject = identity.as_ref().map(|i| i.subject_id.as_str()).unwrap_or("-"),
                    "role check failed on admin-only path"
                );
                metrics::record_decision(DenyReason::Forbidden.as_str());
                let denial = if self.classes.json_error.matches(path) {
                    Denial::forbidden_json()
                } else {
                    Denial::redirect(
                        DenyReason::Forbidden,
                        &self.config.redirects.unauthorized_path,
                    )
                };
                return Decision::Deny(denial);
            }
        }

        // 5. Admit, with security headers attached unconditionally.
        for (name, value) in self.security_headers.iter() {
            response_headers.insert(name.clone(), value.clone());
        }
        metrics::record_decision("continue");
        Decision::Continue(Passthrough {
            response_headers,
            identity,
        })
    }

    /// Derive the client identifier from the forwarded-address header.
    ///
    /// Takes the first comma-separated element, trimmed. A missing or
    /// unreadable header is never an error: the fixed fallback identifier is
    /// substituted, which means all headerless callers share one bucket.
    fn client_identifier(&self, headers: &HeaderMap) -> String {
        headers
            .get(self.config.rate_limit.client_header.as_str())
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.config.rate_limit.fallback_identifier.clone())
    }

    fn login_location(&self, path: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
        format!(
            "{}?{}={}",
            self.config.redirects.login_path, self.config.redirects.return_to_param, encoded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{IdentityContext, SessionStore};
    use axum::http::header::{AUTHORIZATION, LOCATION, RETRY_AFTER};
    use axum::http::StatusCode;

    const FAR_FUTURE: u64 = 9_999_999_999;

    fn sessions() -> Arc<SessionStore> {
        let store = SessionStore::new();
        store.insert(
            "member-token",
            IdentityContext {
                subject_id: "user-1".to_string(),
                role: Role::Member,
            },
            FAR_FUTURE,
        );
        store.insert(
            "admin-token",
            IdentityContext {
                subject_id: "root-1".to_string(),
                role: Role::Admin,
            },
            FAR_FUTURE,
        );
        Arc::new(store)
    }

    fn gate() -> Gate {
        gate_with(GateConfig::default())
    }

    fn gate_with(config: GateConfig) -> Gate {
        Gate::new(config, sessions())
    }

    fn request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    fn request_as(path: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    fn deny(decision: Decision) -> Denial {
        match decision {
            Decision::Deny(denial) => denial,
            Decision::Continue(_) => panic!("expected denial"),
        }
    }

    fn pass(decision: Decision) -> Passthrough {
        match decision {
            Decision::Continue(pass) => pass,
            Decision::Deny(denial) => panic!("expected continue, got {:?}", denial.reason),
        }
    }

    #[test]
    fn test_bypass_skips_everything() {
        let mut config = GateConfig::default();
        config.rate_limit.max_requests = 1;
        config.paths.rate_limited_prefixes = vec!["/".to_string()];
        let gate = gate_with(config);

        // Far more requests than the limit allows; bypass never consumes it
        for _ in 0..10 {
            let pass = pass(gate.evaluate(&request("/static/app.css")));
            assert!(pass.response_headers.is_empty());
            assert!(pass.identity.is_none());
        }
    }

    #[test]
    fn test_rate_limit_denies_after_budget() {
        let mut config = GateConfig::default();
        config.rate_limit.max_requests = 2;
        let gate = gate_with(config);
        let now = Instant::now();

        let req = request("/api/data");
        let first = pass(gate.evaluate_at(&req, now));
        assert_eq!(
            first.response_headers.get(X_RATELIMIT_REMAINING).unwrap(),
            "1"
        );
        let second = pass(gate.evaluate_at(&req, now));
        assert_eq!(
            second.response_headers.get(X_RATELIMIT_REMAINING).unwrap(),
            "0"
        );

        let denial = deny(gate.evaluate_at(&req, now));
        assert_eq!(denial.status, StatusCode::TOO_MANY_REQUESTS);
        assert!(denial.headers.get(RETRY_AFTER).is_some());
    }

    #[test]
    fn test_rate_limit_window_reset() {
        let mut config = GateConfig::default();
        config.rate_limit.max_requests = 1;
        let gate = gate_with(config);
        let start = Instant::now();

        let req = request("/api/data");
        pass(gate.evaluate_at(&req, start));
        deny(gate.evaluate_at(&req, start + Duration::from_secs(10)));

        // 61 seconds after the window opened, the next request is admitted
        // with a fresh count
        let later = pass(gate.evaluate_at(&req, start + Duration::from_secs(61)));
        assert_eq!(
            later.response_headers.get(X_RATELIMIT_REMAINING).unwrap(),
            "0"
        );
    }

    #[test]
    fn test_forwarded_header_buckets() {
        let mut config = GateConfig::default();
        config.rate_limit.max_requests = 1;
        let gate = gate_with(config);
        let now = Instant::now();

        let from = |addr: &str| {
            Request::builder()
                .uri("/api/data")
                .header("x-forwarded-for", addr)
                .body(Body::empty())
                .unwrap()
        };

        pass(gate.evaluate_at(&from("1.2.3.4"), now));
        // Proxy chains only count the first hop
        deny(gate.evaluate_at(&from("1.2.3.4, 10.0.0.1"), now));
        pass(gate.evaluate_at(&from("5.6.7.8"), now));
    }

    #[test]
    fn test_headerless_callers_share_fallback_bucket() {
        let mut config = GateConfig::default();
        config.rate_limit.max_requests = 1;
        let gate = gate_with(config);
        let now = Instant::now();

        pass(gate.evaluate_at(&request("/api/data"), now));
        deny(gate.evaluate_at(&request("/api/data"), now));
    }

    #[test]
    fn test_protected_redirects_anonymous() {
        let denial = deny(gate().evaluate(&request("/dashboard")));

        assert_eq!(denial.status, StatusCode::FOUND);
        assert_eq!(denial.reason, DenyReason::Unauthenticated);
        assert_eq!(
            denial.headers.get(LOCATION).unwrap(),
            "/login?next=%2Fdashboard"
        );
    }

    #[test]
    fn test_protected_admits_authenticated() {
        let pass = pass(gate().evaluate(&request_as("/dashboard", "member-token")));
        let identity = pass.identity.unwrap();
        assert_eq!(identity.subject_id, "user-1");
    }

    #[test]
    fn test_protected_api_gets_json_401() {
        let mut config = GateConfig::default();
        config.paths.protected_prefixes.push("/api".to_string());
        let denial = deny(gate_with(config).evaluate(&request("/api/data")));

        assert_eq!(denial.status, StatusCode::UNAUTHORIZED);
        assert!(denial.headers.get(LOCATION).is_none());
    }

    #[test]
    fn test_auth_page_bounces_authenticated() {
        let denial = deny(gate().evaluate(&request_as("/login", "member-token")));

        assert_eq!(denial.status, StatusCode::FOUND);
        assert_eq!(denial.reason, DenyReason::AlreadyAuthenticated);
        assert_eq!(denial.headers.get(LOCATION).unwrap(), "/dashboard");
    }

    #[test]
    fn test_auth_page_open_to_anonymous() {
        pass(gate().evaluate(&request("/login")));
    }

    #[test]
    fn test_admin_only_requires_admin_role() {
        let gate = gate();

        let denial = deny(gate.evaluate(&request_as("/admin/users", "member-token")));
        assert_eq!(denial.reason, DenyReason::Forbidden);
        assert_eq!(denial.headers.get(LOCATION).unwrap(), "/unauthorized");

        pass(gate.evaluate(&request_as("/admin/users", "admin-token")));
    }

    #[test]
    fn test_admin_only_denies_anonymous() {
        let denial = deny(gate().evaluate(&request("/admin/users")));
        assert_eq!(denial.reason, DenyReason::Forbidden);
    }

    #[test]
    fn test_continue_carries_security_headers() {
        let pass = pass(gate().evaluate(&request("/")));

        assert_eq!(
            pass.response_headers.get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(pass.response_headers.get("x-frame-options").unwrap(), "DENY");
        assert!(pass
            .response_headers
            .get("content-security-policy")
            .is_some());
    }

    #[test]
    fn test_expired_session_is_anonymous() {
        let store = SessionStore::new();
        store.insert(
            "stale-token",
            IdentityContext {
                subject_id: "user-9".to_string(),
                role: Role::Member,
            },
            0,
        );
        let gate = Gate::new(GateConfig::default(), Arc::new(store));

        let denial = deny(gate.evaluate(&request_as("/dashboard", "stale-token")));
        assert_eq!(denial.reason, DenyReason::Unauthenticated);
    }
}
