//! Security role operations.
//!
//! An ordinary CRUD caller of the negotiation core: it contributes its
//! endpoint version facts to the registry at client construction and routes
//! every call through [`Client::dispatch`], never naming a revision itself.
//!
//! The roles API gained a `v2` payload in server `2.4.0`; servers on or
//! below that release are still spoken to with `v1`.

use serde::{Deserialize, Serialize};

use negotiation::{ApiRevision, MethodRules, SemanticVersion, VersionRegistry, VersionRule};

use crate::client::Client;
use crate::errors::ApiError;

/// Registry key for the role collection.
pub const ROLES_ENDPOINT: &str = "/api/admin/security/roles";

/// Registry key for a single role addressed by name.
///
/// A template: the concrete request path substitutes the role name, but the
/// registry matches on this exact string.
pub const ROLE_BY_NAME_ENDPOINT: &str = "/api/admin/security/roles/:name";

/// Contributes the role endpoints' version rules to a registry under
/// construction.
pub(crate) fn register_rules(registry: VersionRegistry) -> VersionRegistry {
    let rules = || {
        vec![
            VersionRule::new(SemanticVersion::new(1, 0, 0), ApiRevision::new("v1")),
            VersionRule::new(SemanticVersion::new(2, 4, 0), ApiRevision::new("v2")),
        ]
    };

    registry
        .with_endpoint(
            ROLES_ENDPOINT,
            MethodRules::new()
                .with_method("GET", rules())
                .with_method("POST", rules()),
        )
        .with_endpoint(
            ROLE_BY_NAME_ENDPOINT,
            MethodRules::new()
                .with_method("GET", rules())
                .with_method("DELETE", vec![VersionRule::new(
                    SemanticVersion::new(1, 0, 0),
                    ApiRevision::new("v1"),
                )]),
        )
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A security role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role name.
    pub name: String,
    /// Role kind; `"core"` for server-managed roles.
    #[serde(rename = "type")]
    pub role_type: String,
    /// Role membership.
    pub attributes: RoleAttributes,
}

impl Role {
    /// Creates a server-managed role holding the given users.
    pub fn core(name: impl Into<String>, users: Vec<String>) -> Self {
        Self {
            name: name.into(),
            role_type: "core".to_string(),
            attributes: RoleAttributes { users },
        }
    }
}

/// Membership attributes of a [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAttributes {
    /// Usernames holding the role.
    pub users: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RoleListPayload {
    roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
struct DeleteMessage {
    message: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Role operations on one [`Client`].
#[derive(Debug)]
pub struct RoleService<'a> {
    client: &'a Client,
}

impl<'a> RoleService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists all roles.
    pub async fn list(&self) -> Result<Vec<Role>, ApiError> {
        let payload: RoleListPayload = self
            .client
            .get_json(ROLES_ENDPOINT, ROLES_ENDPOINT)
            .await?;
        Ok(payload.roles)
    }

    /// Fetches one role by name.
    pub async fn get(&self, name: &str) -> Result<Role, ApiError> {
        self.client
            .get_json(ROLE_BY_NAME_ENDPOINT, &role_path(name))
            .await
    }

    /// Creates a role, returning the server's view of it.
    pub async fn create(&self, role: &Role) -> Result<Role, ApiError> {
        self.client
            .dispatch(reqwest::Method::POST, ROLES_ENDPOINT, ROLES_ENDPOINT, Some(role))
            .await
    }

    /// Deletes a role by name, returning the server's confirmation message.
    pub async fn delete(&self, name: &str) -> Result<String, ApiError> {
        let payload: DeleteMessage = self
            .client
            .dispatch(
                reqwest::Method::DELETE,
                ROLE_BY_NAME_ENDPOINT,
                &role_path(name),
                None::<&()>,
            )
            .await?;
        Ok(payload.message)
    }
}

fn role_path(name: &str) -> String {
    format!("{ROLES_ENDPOINT}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serialises_with_the_wire_type_field() {
        let role = Role::core("operators", vec!["alice".to_string(), "bob".to_string()]);
        let json = serde_json::to_value(&role).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "operators",
                "type": "core",
                "attributes": { "users": ["alice", "bob"] }
            })
        );
    }

    #[test]
    fn role_path_substitutes_the_name() {
        assert_eq!(role_path("operators"), "/api/admin/security/roles/operators");
    }
}
