//! Error types for the HTTP adapter.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use negotiation::NegotiationError;

/// Errors produced while talking to the Conveyor server or loading client
/// configuration.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Content negotiation failed (unparseable server version, unsupported
    /// endpoint, or a propagated fetch failure).
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    /// The underlying HTTP client could not be constructed.
    #[error("failed to construct HTTP client")]
    ClientBuild {
        /// The reqwest builder failure.
        #[source]
        source: reqwest::Error,
    },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("request to {path} failed")]
    Request {
        /// Request path relative to the server base URL.
        path: String,
        /// The transport failure.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server returned {status} for {path}")]
    UnexpectedStatus {
        /// HTTP status received.
        status: StatusCode,
        /// Request path relative to the server base URL.
        path: String,
    },

    /// The response body could not be decoded as the expected JSON shape.
    #[error("could not decode response from {path}")]
    Decode {
        /// Request path relative to the server base URL.
        path: String,
        /// The deserialisation failure.
        #[source]
        source: reqwest::Error,
    },

    /// The configuration file exists but could not be read.
    #[error("could not read config file {path}")]
    ConfigRead {
        /// Path of the configuration file.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML of the expected shape.
    #[error("could not parse config file {path}")]
    ConfigParse {
        /// Path of the configuration file.
        path: PathBuf,
        /// The TOML deserialisation failure.
        #[source]
        source: toml::de::Error,
    },

    /// The requested profile is not declared in the configuration file.
    #[error("no profile named {name:?} in {path}")]
    UnknownProfile {
        /// Profile name that was requested.
        name: String,
        /// Path of the configuration file that was searched.
        path: PathBuf,
    },

    /// No server URL from any source (flag, environment, or profile).
    #[error("no server URL configured; pass --server or add one to the config file")]
    MissingServer,
}
