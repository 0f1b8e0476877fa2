//! Identity resolution.
//!
//! # Data Flow
//! ```text
//! Incoming request headers:
//!     → extract_credential (bearer token, else session cookie)
//!     → IdentityResolver (injected at gate construction)
//!     → IdentityContext attached to request extensions
//! ```
//!
//! The context is derived fresh per request and never persisted by the gate;
//! durability is the identity provider's responsibility. Resolution is
//! synchronous: the credential is already attached to the request, so the
//! hot path has no suspension point.

pub mod session;

use axum::http::header::{HeaderMap, AUTHORIZATION, COOKIE};
use serde::{Deserialize, Serialize};

pub use session::{SessionInfo, SessionStore};

/// The closed set of caller roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Member,
    Admin,
}

/// Context attached to authenticated requests.
#[derive(Debug, Clone)]
pub struct IdentityContext {
    /// Opaque subject identifier.
    pub subject_id: String,
    pub role: Role,
}

/// Capability for turning a raw credential into an identity.
///
/// Injected at gate construction instead of resolved by name at call time,
/// so a missing provider is a compile error rather than a runtime failure.
pub trait IdentityResolver: Send + Sync {
    /// Resolve a credential to an identity, or `None` if it is unknown,
    /// expired, or otherwise invalid.
    fn resolve(&self, credential: &str) -> Option<IdentityContext>;
}

/// Extract the caller's credential from request headers.
///
/// `Authorization: Bearer <token>` takes precedence; the named cookie is the
/// fallback for browser callers. Returns `None` when neither carries a
/// non-empty value.
pub fn extract_credential(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == cookie_name && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}
