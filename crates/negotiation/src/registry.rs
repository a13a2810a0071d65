//! The endpoint → method → version rule table.
//!
//! The registry is built fluently during client construction and never
//! mutated afterwards, which is what makes unlimited concurrent reads safe.
//! Rule lists are registered in any order; each list is sorted ascending by
//! minimum server version on first resolution and the sorted form is cached.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::version::SemanticVersion;

// ---------------------------------------------------------------------------
// API revision tag
// ---------------------------------------------------------------------------

/// An opaque tag identifying which shape of request/response headers the
/// server expects for an endpoint and method (for example `"v1"`).
///
/// The transport layer turns this into a vendor `Accept` header; this crate
/// never interprets the tag beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiRevision(String);

impl ApiRevision {
    /// Creates a revision tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// One breakpoint: from (strictly above) `min_server_version`, requests use
/// `revision`; see the resolution algorithm for the exact boundary handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRule {
    min_server_version: SemanticVersion,
    revision: ApiRevision,
}

impl VersionRule {
    /// Creates a rule binding an API revision to a minimum server version.
    pub fn new(min_server_version: SemanticVersion, revision: ApiRevision) -> Self {
        Self {
            min_server_version,
            revision,
        }
    }

    /// The breakpoint version this rule applies at.
    pub fn min_server_version(&self) -> SemanticVersion {
        self.min_server_version
    }

    /// The revision tag this rule selects.
    pub fn revision(&self) -> &ApiRevision {
        &self.revision
    }
}

// ---------------------------------------------------------------------------

/// An ordered rule list for one (endpoint, method) pair.
///
/// Kept in registration order; the sorted form is computed once on first
/// resolution and reused for every later lookup.
#[derive(Debug)]
pub(crate) struct RuleSet {
    registered: Vec<VersionRule>,
    sorted: OnceLock<Vec<VersionRule>>,
}

impl RuleSet {
    fn new(rules: Vec<VersionRule>) -> Self {
        Self {
            registered: rules,
            sorted: OnceLock::new(),
        }
    }

    /// Rules sorted ascending by minimum server version.
    ///
    /// The sort is stable, so rules registered with equal breakpoints keep
    /// their registration order.
    pub(crate) fn sorted(&self) -> &[VersionRule] {
        self.sorted.get_or_init(|| {
            let mut rules = self.registered.clone();
            rules.sort_by_key(VersionRule::min_server_version);
            rules
        })
    }
}

// ---------------------------------------------------------------------------

/// Rule lists for the HTTP methods of one endpoint.
#[derive(Debug, Default)]
pub struct MethodRules {
    methods: HashMap<String, RuleSet>,
}

impl MethodRules {
    /// Creates an empty method table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rule list for one HTTP method, replacing any earlier
    /// registration for the same method.
    pub fn with_method(mut self, method: impl Into<String>, rules: Vec<VersionRule>) -> Self {
        self.methods.insert(method.into(), RuleSet::new(rules));
        self
    }

    pub(crate) fn get(&self, method: &str) -> Option<&RuleSet> {
        self.methods.get(method)
    }
}

// ---------------------------------------------------------------------------

/// The full endpoint → method → rule table.
///
/// Endpoint paths are matched exactly — no patterns. Endpoints addressed by
/// name (for example `/api/admin/security/roles/:name`) register under the
/// template string, and the transport layer passes that same template as the
/// lookup key while substituting the real name into the URL.
#[derive(Debug, Default)]
pub struct VersionRegistry {
    endpoints: HashMap<String, MethodRules>,
}

impl VersionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with the one rule every client needs:
    /// `GET /api/version` at revision `v1` from server `1.0.0`.
    ///
    /// CRUD modules layer their own endpoints on top via [`with_endpoint`].
    ///
    /// [`with_endpoint`]: VersionRegistry::with_endpoint
    pub fn with_defaults() -> Self {
        Self::new().with_endpoint(
            "/api/version",
            MethodRules::new().with_method(
                "GET",
                vec![VersionRule::new(
                    SemanticVersion::new(1, 0, 0),
                    ApiRevision::new("v1"),
                )],
            ),
        )
    }

    /// Registers or replaces the rule set for an endpoint.
    ///
    /// Last registration for a given endpoint wins outright (overwrite, not
    /// merge).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>, methods: MethodRules) -> Self {
        self.endpoints.insert(endpoint.into(), methods);
        self
    }

    pub(crate) fn rules_for(&self, endpoint: &str, method: &str) -> Option<&RuleSet> {
        self.endpoints.get(endpoint)?.get(method)
    }
}
