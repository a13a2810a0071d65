//! Conveyor HTTP adapter.
//!
//! Implements the [`negotiation::ServerVersionSource`] port over HTTP via
//! reqwest and routes every API call through the negotiation core: the
//! server version is fetched once, the registry resolves the API revision
//! for the (endpoint, method) pair, and the resulting vendor `Accept` header
//! is attached to the request.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport, header construction, configuration
//! profiles, and the CRUD services live here. The [`negotiation`] crate sees
//! only its port trait.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`client`] | [`Client`], request dispatch, Accept-header construction |
//! | [`config`] | [`ClientConfig`] and profile file loading |
//! | [`roles`] | Security role CRUD service |
//! | [`errors`] | [`ApiError`] |

pub mod client;
pub mod config;
pub mod errors;
pub mod roles;

pub use client::{accept_header, Client, RequestId, VERSION_ENDPOINT};
pub use config::ClientConfig;
pub use errors::ApiError;
pub use roles::{Role, RoleAttributes, RoleService};
