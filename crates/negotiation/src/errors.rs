//! Error types for version parsing and API revision resolution.
//!
//! Every error here is returned to the immediate caller; nothing is logged or
//! swallowed inside the crate. Transport failures raised while fetching the
//! server version pass through [`NegotiationError::Fetch`] unchanged — retry
//! policy belongs to the transport layer, not to this crate.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Version string components
// ---------------------------------------------------------------------------

/// Names the dotted component of a server version string that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionComponent {
    /// First component (`major` in `major.minor.patch`).
    Major,
    /// Second component.
    Minor,
    /// Third component.
    Patch,
}

impl std::fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VersionComponent::Major => "major",
            VersionComponent::Minor => "minor",
            VersionComponent::Patch => "patch",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Negotiation errors
// ---------------------------------------------------------------------------

/// Errors produced by the content negotiation core.
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// A numeric component of a server version string was not an integer.
    ///
    /// Fatal to the operation that requested the parse: nothing can be
    /// compared against an uncomparable version. Never retried automatically.
    #[error("invalid {component} component in server version {input:?}")]
    VersionParse {
        /// The full version string as received from the server.
        input: String,
        /// Which of the three numeric components failed.
        component: VersionComponent,
        /// The underlying integer-parse failure.
        #[source]
        source: std::num::ParseIntError,
    },

    /// A server version string had fewer than three dotted components.
    ///
    /// Absent parts are an error, never a default of zero.
    #[error("server version {input:?} does not have major, minor, and patch components")]
    VersionIncomplete {
        /// The full version string as received from the server.
        input: String,
    },

    /// No version rule exists for the requested (endpoint, method) pair.
    ///
    /// The registry is static within a process, so this is never retried.
    #[error("could not find API version tag for '{method} {endpoint}'")]
    UnsupportedEndpoint {
        /// The endpoint path that was looked up.
        endpoint: String,
        /// The HTTP method that was looked up.
        method: String,
    },

    /// An empty rule list reached resolution.
    ///
    /// Indicates a registry construction bug, not a runtime condition;
    /// unreachable when registration always supplies at least one rule.
    #[error("empty version rule list registered for '{method} {endpoint}'")]
    MalformedRegistry {
        /// The endpoint path whose rule list was empty.
        endpoint: String,
        /// The HTTP method whose rule list was empty.
        method: String,
    },

    /// The transport layer failed to fetch the server version descriptor.
    ///
    /// Carries the transport error unchanged; the cache stores nothing.
    #[error(transparent)]
    Fetch(Box<dyn std::error::Error + Send + Sync>),
}

impl NegotiationError {
    /// Wraps a transport failure for propagation through the cache.
    pub fn fetch(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        NegotiationError::Fetch(Box::new(source))
    }
}
