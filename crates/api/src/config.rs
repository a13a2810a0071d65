//! Client configuration and profile loading.
//!
//! Connection settings live in `~/.conveyor/config.toml` under named
//! profiles:
//!
//! ```toml
//! [profiles.default]
//! server = "https://conveyor.example.com"
//! username = "admin"
//! password = "badger"
//!
//! [profiles.staging]
//! server = "https://staging.example.com"
//! skip_tls_verify = true
//! ```
//!
//! Callers (the CLI) overlay flag and environment values on top of the
//! selected profile before constructing a [`crate::Client`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Resolved connection settings for one Conveyor server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the server, e.g. `https://conveyor.example.com`.
    pub server: Option<String>,
    /// Basic-auth username.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Skip TLS certificate verification (self-signed test servers).
    #[serde(default)]
    pub skip_tls_verify: bool,
}

impl ClientConfig {
    /// Loads the named profile from the default configuration file.
    ///
    /// A missing file yields an empty configuration (every field must then
    /// come from flags or the environment); a missing *profile* in an
    /// existing file is an error.
    pub fn load_profile(name: &str) -> Result<Self, ApiError> {
        match default_config_path() {
            Some(path) => Self::load_profile_from(name, &path),
            None => Ok(Self::default()),
        }
    }

    /// Loads the named profile from a specific file path.
    pub fn load_profile_from(name: &str, path: &Path) -> Result<Self, ApiError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ApiError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let file: ConfigFile = toml::from_str(&raw).map_err(|source| ApiError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        file.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::UnknownProfile {
                name: name.to_string(),
                path: path.to_path_buf(),
            })
    }

    /// Returns the configured server URL or fails with
    /// [`ApiError::MissingServer`].
    pub fn server(&self) -> Result<&str, ApiError> {
        self.server.as_deref().ok_or(ApiError::MissingServer)
    }
}

/// On-disk shape of the configuration file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    profiles: HashMap<String, ClientConfig>,
}

/// `~/.conveyor/config.toml`, or `None` when no home directory is known.
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".conveyor").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_profiles() {
        let raw = r#"
            [profiles.default]
            server = "https://conveyor.example.com"
            username = "admin"
            password = "badger"

            [profiles.staging]
            server = "https://staging.example.com"
            skip_tls_verify = true
        "#;

        let file: ConfigFile = toml::from_str(raw).unwrap();

        let default = &file.profiles["default"];
        assert_eq!(
            default.server.as_deref(),
            Some("https://conveyor.example.com")
        );
        assert_eq!(default.username.as_deref(), Some("admin"));
        assert!(!default.skip_tls_verify);

        let staging = &file.profiles["staging"];
        assert!(staging.username.is_none());
        assert!(staging.skip_tls_verify);
    }

    #[test]
    fn missing_file_yields_an_empty_config() {
        let config =
            ClientConfig::load_profile_from("default", Path::new("/nonexistent/config.toml"))
                .unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn missing_server_is_an_error() {
        let config = ClientConfig::default();
        assert!(matches!(config.server(), Err(ApiError::MissingServer)));
    }
}
