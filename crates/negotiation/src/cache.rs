//! The process-wide server version cache.
//!
//! A client talks to one server, and that server's version does not change
//! under a running process, so the version is fetched once and reused for
//! every later negotiation. The cache is an injectable value owned by the
//! client — never a hidden global — so tests construct independent instances
//! without cross-test leakage.
//!
//! Lifecycle: Empty → (successful fetch) → Populated → (invalidate) → Empty.
//! A fetch while populated is a no-op returning the cached descriptor; a
//! failed fetch leaves the cache Empty.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::NegotiationError;
use crate::server_version::{ServerVersion, ServerVersionPayload};

/// Port for the transport collaborator that performs the actual
/// `GET /api/version` round trip.
///
/// Implementations must not retry internally; a failure propagates to the
/// caller unchanged (wrapped in [`NegotiationError::Fetch`]) and the cache
/// stores nothing.
#[async_trait]
pub trait ServerVersionSource: Send + Sync {
    /// Fetches the raw version payload from the server.
    async fn fetch_version(&self) -> Result<ServerVersionPayload, NegotiationError>;
}

/// Single-slot cache holding the last-fetched server version.
#[derive(Debug, Default)]
pub struct ServerVersionCache {
    slot: Mutex<Option<Arc<ServerVersion>>>,
}

impl ServerVersionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached descriptor, fetching it from `source` on a miss.
    ///
    /// The check-fetch-store sequence runs under one lock held across the
    /// fetch, so concurrent callers racing on an empty cache converge on a
    /// single descriptor and `source` is invoked exactly once; late callers
    /// wait for the in-flight fetch instead of issuing their own.
    ///
    /// A fetch or parse failure propagates to the caller and nothing is
    /// stored; the next call fetches again.
    pub async fn get(
        &self,
        source: &dyn ServerVersionSource,
    ) -> Result<Arc<ServerVersion>, NegotiationError> {
        let mut slot = self.slot.lock().await;

        if let Some(version) = slot.as_ref() {
            return Ok(Arc::clone(version));
        }

        debug!("server version cache miss, fetching from server");
        let payload = source.fetch_version().await?;
        let version = Arc::new(ServerVersion::from_payload(payload)?);

        *slot = Some(Arc::clone(&version));
        Ok(version)
    }

    /// Clears the cached descriptor unconditionally.
    ///
    /// The next [`get`](ServerVersionCache::get) triggers a fresh fetch.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    /// Seeds the cache directly, without a round trip.
    ///
    /// Used by explicit refresh flows and test harnesses. Replaces any
    /// previously cached descriptor.
    pub async fn set(&self, version: ServerVersion) {
        *self.slot.lock().await = Some(Arc::new(version));
    }
}
