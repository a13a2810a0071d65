//! The Conveyor HTTP client.
//!
//! Owns the reqwest client, the version rule registry, and the server
//! version cache. Every API call flows through [`Client::dispatch`]: look up
//! the server version (fetching it on first use), resolve the API revision
//! for the (endpoint, method) pair, attach the vendor `Accept` header, and
//! perform the call.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use negotiation::{
    ApiRevision, NegotiationError, ServerVersion, ServerVersionCache, ServerVersionPayload,
    ServerVersionSource, VersionRegistry,
};

use crate::config::ClientConfig;
use crate::errors::ApiError;
use crate::roles::{self, RoleService};

/// User agent for all requests.
const USER_AGENT_VALUE: &str = concat!("conveyor-client/", env!("CARGO_PKG_VERSION"));

/// Endpoint serving the server's own version descriptor.
pub const VERSION_ENDPOINT: &str = "/api/version";

/// Accept header for the bootstrap version fetch.
///
/// Negotiation cannot run before the first version fetch, so this one call
/// pins revision `v1` — the revision the endpoint has carried since server
/// `1.0.0`.
const BOOTSTRAP_ACCEPT: &str = "application/vnd.conveyor.v1+json";

/// Builds the vendor `Accept` header value for a resolved revision.
pub fn accept_header(revision: &ApiRevision) -> String {
    format!("application/vnd.conveyor.{revision}+json")
}

// ---------------------------------------------------------------------------
// Request correlation
// ---------------------------------------------------------------------------

/// Correlates one dispatched request across log events.
///
/// Generated fresh per dispatch; only ever logged, never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a new random request identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A client for one Conveyor server.
///
/// The registry is built once here, before any resolution can happen, and
/// never mutated afterwards. The version cache is owned per client value, so
/// independent clients (and tests) never share negotiation state.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    registry: Arc<VersionRegistry>,
    version_cache: ServerVersionCache,
}

impl Client {
    /// Constructs a client from resolved configuration.
    ///
    /// Fails when no server URL is configured or the HTTP client cannot be
    /// built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.server()?.trim_end_matches('/').to_string();

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = reqwest::Client::builder()
            .default_headers(default_headers)
            .danger_accept_invalid_certs(config.skip_tls_verify)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;

        Ok(Self {
            http,
            base_url,
            username: config.username,
            password: config.password,
            registry: Arc::new(default_registry()),
            version_cache: ServerVersionCache::new(),
        })
    }

    /// The server base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The registry of version rules this client negotiates against.
    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    /// The server's version descriptor, fetched once and cached.
    pub async fn server_version(&self) -> Result<Arc<ServerVersion>, ApiError> {
        Ok(self.version_cache.get(self).await?)
    }

    /// Drops the cached server version and fetches a fresh descriptor.
    pub async fn refresh_server_version(&self) -> Result<Arc<ServerVersion>, ApiError> {
        self.version_cache.invalidate().await;
        self.server_version().await
    }

    /// Pre-seeds the version cache without a round trip.
    pub async fn set_server_version(&self, version: ServerVersion) {
        self.version_cache.set(version).await;
    }

    /// Operations on security roles.
    pub fn roles(&self) -> RoleService<'_> {
        RoleService::new(self)
    }

    /// Issues a negotiated GET and decodes the JSON response.
    pub(crate) async fn get_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
    ) -> Result<R, ApiError> {
        self.dispatch(Method::GET, endpoint, path, None::<&()>).await
    }

    /// Issues a negotiated request with an optional JSON body.
    ///
    /// `endpoint` is the registry lookup key (the registered template);
    /// `path` is the concrete URL path, which differs for endpoints
    /// addressed by name.
    pub(crate) async fn dispatch<B, R>(
        &self,
        method: Method,
        endpoint: &str,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let server = self.version_cache.get(self).await?;
        let revision = self
            .registry
            .resolve(endpoint, method.as_str(), server.parts())?;

        let request_id = RequestId::new_random();
        debug!(
            %request_id,
            method = %method,
            path,
            revision = %revision,
            "dispatching API request"
        );

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .header(ACCEPT, accept_header(&revision));
        request = self.with_auth(request);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ApiError::Request {
            path: path.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status,
                path: path.to_string(),
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_deref()),
            None => request,
        }
    }
}

/// The version rule table every client starts from: the version endpoint
/// itself, plus the rules each CRUD module contributes.
fn default_registry() -> VersionRegistry {
    roles::register_rules(VersionRegistry::with_defaults())
}

// ---------------------------------------------------------------------------
// Version fetch port
// ---------------------------------------------------------------------------

#[async_trait]
impl ServerVersionSource for Client {
    /// Performs the bootstrap `GET /api/version` round trip.
    ///
    /// No retry here: transport failures propagate unchanged through the
    /// cache to the caller.
    async fn fetch_version(&self) -> Result<ServerVersionPayload, NegotiationError> {
        let url = format!("{}{}", self.base_url, VERSION_ENDPOINT);
        let request = self.with_auth(
            self.http
                .get(&url)
                .header(ACCEPT, HeaderValue::from_static(BOOTSTRAP_ACCEPT)),
        );

        let response = request
            .send()
            .await
            .map_err(|source| {
                NegotiationError::fetch(ApiError::Request {
                    path: VERSION_ENDPOINT.to_string(),
                    source,
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NegotiationError::fetch(ApiError::UnexpectedStatus {
                status,
                path: VERSION_ENDPOINT.to_string(),
            }));
        }

        response.json().await.map_err(|source| {
            NegotiationError::fetch(ApiError::Decode {
                path: VERSION_ENDPOINT.to_string(),
                source,
            })
        })
    }
}
