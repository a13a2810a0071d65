//! API revision resolution.
//!
//! Given a registry, an (endpoint, method) pair, and the server's semantic
//! version, selects the revision tag the transport layer must advertise.
//!
//! The walk uses a look-back-one policy: a rule's minimum server version is
//! an *exclusive* lower bound for its own revision. A server sitting exactly
//! on a breakpoint still speaks the previous bracket's revision; only a
//! server strictly above it moves to the new one. Servers below the lowest
//! breakpoint get the lowest registered revision, and servers at or above
//! the newest breakpoint get the highest. This boundary rule governs header
//! selection across server upgrades and must hold exactly.

use crate::errors::NegotiationError;
use crate::registry::{ApiRevision, VersionRegistry};
use crate::version::SemanticVersion;

impl VersionRegistry {
    /// Resolves the API revision for `endpoint` and `method` against the
    /// server release `server_version`.
    ///
    /// Pure lookup over immutable state; never blocks.
    ///
    /// # Errors
    ///
    /// - [`NegotiationError::UnsupportedEndpoint`] when no rule list is
    ///   registered for the pair;
    /// - [`NegotiationError::MalformedRegistry`] when a registered rule list
    ///   is empty (construction bug).
    pub fn resolve(
        &self,
        endpoint: &str,
        method: &str,
        server_version: SemanticVersion,
    ) -> Result<ApiRevision, NegotiationError> {
        let rules = self
            .rules_for(endpoint, method)
            .ok_or_else(|| NegotiationError::UnsupportedEndpoint {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
            })?
            .sorted();

        let mut candidate = rules
            .first()
            .ok_or_else(|| NegotiationError::MalformedRegistry {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
            })?;

        for rule in rules {
            if rule.min_server_version() >= server_version {
                return Ok(candidate.revision().clone());
            }
            candidate = rule;
        }

        // Server is strictly above every breakpoint: newest revision applies.
        Ok(candidate.revision().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MethodRules, VersionRule};

    fn v(s: &str) -> SemanticVersion {
        SemanticVersion::parse(s).unwrap()
    }

    fn rule(version: &str, tag: &str) -> VersionRule {
        VersionRule::new(v(version), ApiRevision::new(tag))
    }

    fn two_breakpoints() -> VersionRegistry {
        VersionRegistry::new().with_endpoint(
            "/api/things",
            MethodRules::new()
                .with_method("GET", vec![rule("1.0.0", "v1"), rule("2.0.0", "v2")]),
        )
    }

    #[test]
    fn below_the_lowest_breakpoint_yields_the_lowest_revision() {
        let registry = VersionRegistry::new().with_endpoint(
            "/api/things",
            MethodRules::new().with_method("GET", vec![rule("1.0.0", "v1")]),
        );

        let revision = registry.resolve("/api/things", "GET", v("0.9.0")).unwrap();
        assert_eq!(revision.as_str(), "v1");
    }

    #[test]
    fn exactly_on_a_breakpoint_yields_the_previous_revision() {
        let registry = two_breakpoints();

        let revision = registry.resolve("/api/things", "GET", v("2.0.0")).unwrap();
        assert_eq!(revision.as_str(), "v1");
    }

    #[test]
    fn strictly_above_a_breakpoint_yields_the_new_revision() {
        let registry = two_breakpoints();

        let revision = registry.resolve("/api/things", "GET", v("2.0.1")).unwrap();
        assert_eq!(revision.as_str(), "v2");
    }

    #[test]
    fn far_above_the_newest_breakpoint_yields_the_highest_revision() {
        let registry = two_breakpoints();

        let revision = registry.resolve("/api/things", "GET", v("99.0.0")).unwrap();
        assert_eq!(revision.as_str(), "v2");
    }

    #[test]
    fn between_breakpoints_yields_the_bracket_below() {
        let registry = VersionRegistry::new().with_endpoint(
            "/api/things",
            MethodRules::new().with_method(
                "GET",
                vec![
                    rule("1.0.0", "v1"),
                    rule("2.0.0", "v2"),
                    rule("3.0.0", "v3"),
                ],
            ),
        );

        let revision = registry.resolve("/api/things", "GET", v("2.5.0")).unwrap();
        assert_eq!(revision.as_str(), "v2");
    }

    #[test]
    fn resolution_ignores_registration_order() {
        let registry = VersionRegistry::new().with_endpoint(
            "/api/things",
            MethodRules::new()
                .with_method("GET", vec![rule("2.0.0", "v2"), rule("1.0.0", "v1")]),
        );

        let revision = registry.resolve("/api/things", "GET", v("1.5.0")).unwrap();
        assert_eq!(revision.as_str(), "v1");
    }

    #[test]
    fn unknown_endpoint_names_the_pair_in_the_message() {
        let err = VersionRegistry::with_defaults()
            .resolve("/api/foobar", "GET", v("1.0.0"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "could not find API version tag for 'GET /api/foobar'"
        );
    }

    #[test]
    fn unknown_method_fails_the_same_way_as_an_unknown_endpoint() {
        let err = VersionRegistry::with_defaults()
            .resolve("/api/version", "DELETE", v("1.0.0"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "could not find API version tag for 'DELETE /api/version'"
        );
    }

    #[test]
    fn empty_rule_list_is_a_malformed_registry() {
        let registry = VersionRegistry::new()
            .with_endpoint("/api/things", MethodRules::new().with_method("GET", vec![]));

        let err = registry
            .resolve("/api/things", "GET", v("1.0.0"))
            .unwrap_err();
        assert!(matches!(err, NegotiationError::MalformedRegistry { .. }));
    }
}
