//! Path class matching.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefix semantics (`starts_with`), no regex, O(n) matching
//! - Empty set = matches nothing

use crate::config::schema::PathConfig;

/// A set of path prefixes, matched with OR semantics.
#[derive(Debug, Clone, Default)]
pub struct PathPrefixSet {
    prefixes: Vec<String>,
}

impl PathPrefixSet {
    /// Create a new prefix set.
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// Returns true if the path starts with any prefix in the set.
    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p))
    }
}

/// The path classes the gate evaluates, one prefix set per class.
#[derive(Debug, Clone)]
pub struct PathClasses {
    pub bypass: PathPrefixSet,
    pub rate_limited: PathPrefixSet,
    pub protected: PathPrefixSet,
    pub auth_only: PathPrefixSet,
    pub admin_only: PathPrefixSet,
    pub json_error: PathPrefixSet,
}

impl PathClasses {
    /// Build the class sets from configuration.
    pub fn from_config(paths: &PathConfig) -> Self {
        Self {
            bypass: PathPrefixSet::new(paths.bypass_prefixes.clone()),
            rate_limited: PathPrefixSet::new(paths.rate_limited_prefixes.clone()),
            protected: PathPrefixSet::new(paths.protected_prefixes.clone()),
            auth_only: PathPrefixSet::new(paths.auth_only_prefixes.clone()),
            admin_only: PathPrefixSet::new(paths.admin_only_prefixes.clone()),
            json_error: PathPrefixSet::new(paths.json_error_prefixes.clone()),
        }
    }
}
