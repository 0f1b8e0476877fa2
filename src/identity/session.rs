//! In-memory session registry.
//!
//! A stand-in identity provider for tests and simple hosts: a thread-safe
//! token → session map with expiry-checked resolution. Deliberately not
//! persisted; the gate treats identity storage as an external collaborator's
//! concern.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;

use crate::identity::{IdentityContext, IdentityResolver};
use crate::observability::metrics;

/// A session held for one credential.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub identity: IdentityContext,
    /// Expiry timestamp (seconds since epoch).
    pub expiry: u64,
}

impl SessionInfo {
    /// Check if the session has not expired.
    pub fn is_active(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.expiry > now
    }
}

/// A thread-safe registry of active sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, SessionInfo>>,
}

impl SessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for a credential.
    pub fn insert(&self, credential: impl Into<String>, identity: IdentityContext, expiry: u64) {
        self.inner
            .insert(credential.into(), SessionInfo { identity, expiry });
        metrics::record_session_event("insert");
    }

    /// Drop a session, if present.
    pub fn revoke(&self, credential: &str) {
        if self.inner.remove(credential).is_some() {
            metrics::record_session_event("revoke");
        }
    }

    /// Number of sessions held, active or not.
    pub fn count(&self) -> usize {
        self.inner.len()
    }

    /// Remove expired sessions, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, session| session.is_active());
        before - self.inner.len()
    }
}

impl IdentityResolver for SessionStore {
    fn resolve(&self, credential: &str) -> Option<IdentityContext> {
        self.inner
            .get(credential)
            .filter(|session| session.is_active())
            .map(|session| session.identity.clone())
    }
}
