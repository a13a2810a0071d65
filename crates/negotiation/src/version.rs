//! Semantic server version parsing and ordering.
//!
//! The server reports its release as an opaque dotted string (for example
//! `"18.7.0"` or `"19.1.0-7703"`). Negotiation only ever compares the three
//! numeric components, so that triple is the whole value type here.

use serde::{Deserialize, Serialize};

use crate::errors::{NegotiationError, VersionComponent};

/// An ordered (major, minor, patch) server release identifier.
///
/// Comparison is lexicographic over the three components; the first unequal
/// field decides. The derived [`Ord`] relies on field declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SemanticVersion {
    /// Major release component.
    pub major: u64,
    /// Minor release component.
    pub minor: u64,
    /// Patch release component.
    pub patch: u64,
}

impl SemanticVersion {
    /// Creates a version from its three numeric components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses a dotted version string of the form `"<int>.<int>.<int>[-suffix]"`.
    ///
    /// Rules:
    ///
    /// - fewer than three dotted components fails with
    ///   [`NegotiationError::VersionIncomplete`] — missing parts are never
    ///   defaulted to zero;
    /// - a non-numeric component fails with
    ///   [`NegotiationError::VersionParse`] naming the component and the
    ///   integer-parse cause;
    /// - a `-suffix` on the patch component (pre-release or build tag) is
    ///   stripped before parsing and ignored for comparison;
    /// - components beyond the third are ignored.
    pub fn parse(input: &str) -> Result<Self, NegotiationError> {
        let mut parts = input.split('.');

        let major = parse_component(input, parts.next(), VersionComponent::Major)?;
        let minor = parse_component(input, parts.next(), VersionComponent::Minor)?;
        let patch = parse_component(
            input,
            // Pre-release tags attach to the patch component only.
            parts.next().map(|p| p.split('-').next().unwrap_or(p)),
            VersionComponent::Patch,
        )?;

        Ok(Self::new(major, minor, patch))
    }
}

fn parse_component(
    input: &str,
    part: Option<&str>,
    component: VersionComponent,
) -> Result<u64, NegotiationError> {
    let part = part.ok_or_else(|| NegotiationError::VersionIncomplete {
        input: input.to_string(),
    })?;
    part.parse()
        .map_err(|source| NegotiationError::VersionParse {
            input: input.to_string(),
            component,
            source,
        })
}

impl std::str::FromStr for SemanticVersion {
    type Err = NegotiationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_numeric_components() {
        for input in ["1.0.0", "18.7.0", "2.4.1", "0.9.0", "10.20.30"] {
            let version = SemanticVersion::parse(input).expect(input);
            assert_eq!(version.to_string(), input);
        }
    }

    #[test]
    fn parse_ignores_pre_release_suffix_on_patch() {
        let version = SemanticVersion::parse("19.1.0-7703").unwrap();
        assert_eq!(version, SemanticVersion::new(19, 1, 0));
    }

    #[test]
    fn parse_ignores_components_beyond_the_third() {
        let version = SemanticVersion::parse("1.2.3.4").unwrap();
        assert_eq!(version, SemanticVersion::new(1, 2, 3));
    }

    #[test]
    fn parse_rejects_missing_components() {
        for input in ["1", "1.2"] {
            let err = SemanticVersion::parse(input).unwrap_err();
            assert!(
                matches!(err, NegotiationError::VersionIncomplete { .. }),
                "{input:?} gave {err}"
            );
        }
    }

    #[test]
    fn parse_names_the_offending_component() {
        for (input, component) in [
            ("a.0.0", VersionComponent::Major),
            ("2.b.0", VersionComponent::Minor),
            ("2.3.c", VersionComponent::Patch),
        ] {
            match SemanticVersion::parse(input).unwrap_err() {
                NegotiationError::VersionParse {
                    component: got, ..
                } => assert_eq!(got, component, "{input}"),
                other => panic!("{input:?} gave {other}"),
            }
        }
    }

    #[test]
    fn parse_does_not_misparse_a_bare_suffix_as_patch() {
        let err = SemanticVersion::parse("1.2.-rc1").unwrap_err();
        assert!(matches!(
            err,
            NegotiationError::VersionParse {
                component: VersionComponent::Patch,
                ..
            }
        ));
    }

    #[test]
    fn ordering_is_lexicographic_over_components() {
        let v = |s: &str| SemanticVersion::parse(s).unwrap();

        assert!(v("1.0.0") < v("2.0.0"));
        assert!(v("2.0.0") < v("2.0.1"));
        assert!(v("2.0.1") < v("2.1.0"));
        assert!(v("2.1.0") < v("10.0.0"));
        assert_eq!(v("2.0.0"), v("2.0.0"));
    }

    #[test]
    fn ordering_is_transitive() {
        let a = SemanticVersion::new(1, 9, 9);
        let b = SemanticVersion::new(2, 0, 0);
        let c = SemanticVersion::new(2, 0, 1);

        assert!(a < b && b < c && a < c);
        assert!(c > b && b > a && c > a);
    }
}
