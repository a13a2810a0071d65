//! Version-aware API content negotiation for the Conveyor client.
//!
//! The Conveyor server changes its required `Accept` headers and URL
//! semantics across releases. This crate picks the correct API revision for
//! any (endpoint, HTTP method) pair from the server's own reported version,
//! so callers never specify one.
//!
//! ## Architectural Layer
//!
//! **Domain.** This crate has no I/O dependencies. It defines *which*
//! revision a request needs; the `api` crate defines *how* to talk to the
//! server and implements the [`ServerVersionSource`] port defined here.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`version`] | [`SemanticVersion`] parsing and ordering |
//! | [`registry`] | [`VersionRegistry`] rule table and fluent builder |
//! | [`resolver`] | Revision resolution with the look-back-one breakpoint policy |
//! | [`server_version`] | [`ServerVersion`] descriptor and its wire payload |
//! | [`cache`] | [`ServerVersionCache`] single-slot, single-flight cache |
//! | [`errors`] | [`NegotiationError`] |

pub mod cache;
pub mod errors;
pub mod registry;
pub mod resolver;
pub mod server_version;
pub mod version;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use cache::{ServerVersionCache, ServerVersionSource};
pub use errors::{NegotiationError, VersionComponent};
pub use registry::{ApiRevision, MethodRules, VersionRegistry, VersionRule};
pub use server_version::{ServerVersion, ServerVersionPayload};
pub use version::SemanticVersion;
