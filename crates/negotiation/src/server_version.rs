//! The server version descriptor.
//!
//! One round trip to `GET /api/version` yields a payload describing the
//! server build. The descriptor pairs that raw payload with its parsed
//! [`SemanticVersion`], so a descriptor that exists is always comparable.

use serde::{Deserialize, Serialize};

use crate::errors::NegotiationError;
use crate::registry::{ApiRevision, VersionRegistry};
use crate::version::SemanticVersion;

/// Wire payload of the server's version endpoint, exactly as serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVersionPayload {
    /// Dotted release string, e.g. `"18.7.0"`.
    pub version: String,
    /// Server build number, e.g. `"7121"`.
    pub build_number: String,
    /// Commit the server was built from.
    pub git_sha: String,
    /// Combined human-readable version, e.g. `"18.7.0 (7121-75d1247f)"`.
    pub full_version: String,
    /// Link to the build commit in the server's source repository.
    pub commit_url: String,
}

/// A fetched-and-parsed server version.
///
/// Construction parses the raw release string up front; there is no partially
/// valid state where the descriptor exists but cannot be compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerVersion {
    payload: ServerVersionPayload,
    parts: SemanticVersion,
}

impl ServerVersion {
    /// Builds a descriptor from the wire payload.
    ///
    /// Fails with a parse error when the release string is not a dotted
    /// numeric version; the payload is discarded in that case.
    pub fn from_payload(payload: ServerVersionPayload) -> Result<Self, NegotiationError> {
        let parts = SemanticVersion::parse(&payload.version)?;
        Ok(Self { payload, parts })
    }

    /// The raw dotted release string as the server reported it.
    pub fn version(&self) -> &str {
        &self.payload.version
    }

    /// The parsed (major, minor, patch) triple.
    pub fn parts(&self) -> SemanticVersion {
        self.parts
    }

    /// The server build number.
    pub fn build_number(&self) -> &str {
        &self.payload.build_number
    }

    /// The commit the server was built from.
    pub fn git_sha(&self) -> &str {
        &self.payload.git_sha
    }

    /// The combined human-readable version string.
    pub fn full_version(&self) -> &str {
        &self.payload.full_version
    }

    /// Link to the build commit.
    pub fn commit_url(&self) -> &str {
        &self.payload.commit_url
    }

    /// The wire payload this descriptor was built from.
    pub fn payload(&self) -> &ServerVersionPayload {
        &self.payload
    }

    /// `true` when this server release predates `other`.
    pub fn less_than(&self, other: &ServerVersion) -> bool {
        self.parts < other.parts
    }

    /// Resolves the API revision for `endpoint` and `method` on this server.
    pub fn api_revision(
        &self,
        registry: &VersionRegistry,
        endpoint: &str,
        method: &str,
    ) -> Result<ApiRevision, NegotiationError> {
        registry.resolve(endpoint, method, self.parts)
    }
}

impl std::fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.payload.version)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn payload(version: &str) -> ServerVersionPayload {
        ServerVersionPayload {
            version: version.to_string(),
            build_number: "7121".to_string(),
            git_sha: "75d1247f58ab8bcde3c5b43392a87347979f82c5".to_string(),
            full_version: format!("{version} (7121-75d1247f)"),
            commit_url: "https://example.com/commits/75d1247f".to_string(),
        }
    }

    #[test]
    fn from_payload_parses_the_release_string() {
        let version = ServerVersion::from_payload(payload("18.7.0")).unwrap();
        assert_eq!(version.parts(), SemanticVersion::new(18, 7, 0));
        assert_eq!(version.version(), "18.7.0");
        assert_eq!(version.build_number(), "7121");
    }

    #[test]
    fn from_payload_rejects_a_malformed_release_string() {
        let err = ServerVersion::from_payload(payload("18.x.0")).unwrap_err();
        assert!(matches!(err, NegotiationError::VersionParse { .. }));
    }

    #[test]
    fn less_than_compares_parsed_parts() {
        let older = ServerVersion::from_payload(payload("2.0.0")).unwrap();
        let newer = ServerVersion::from_payload(payload("2.0.1")).unwrap();

        assert!(older.less_than(&newer));
        assert!(!newer.less_than(&older));
        assert!(!older.less_than(&older));
    }

    #[test]
    fn api_revision_consults_the_registry() {
        let version = ServerVersion::from_payload(payload("1.0.0")).unwrap();
        let registry = VersionRegistry::with_defaults();

        let revision = version
            .api_revision(&registry, "/api/version", "GET")
            .unwrap();
        assert_eq!(revision.as_str(), "v1");
    }

    #[test]
    fn payload_round_trips_through_json() {
        let original = payload("18.7.0");
        let json = serde_json::to_string(&original).unwrap();
        let decoded: ServerVersionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }
}
