//! Valkey-backed shared storage for the allocated-port set.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use redis::AsyncCommands as _;

use crate::application::ports::PortStateStore;
use crate::domain::config::ValkeyConfig;

/// Well-known keys in the shared cache.
pub mod keys {
    /// JSON-serialized array of currently allocated ports.
    pub const ALLOCATED_PORTS: &str = "launchpad:ports";
}

/// Port-set store backed by Valkey/Redis so every orchestrator process
/// shares one pool.
pub struct ValkeyPortStore {
    client: redis::Client,
}

impl ValkeyPortStore {
    /// Create a new store.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection URL is invalid.
    pub fn new(config: &ValkeyConfig) -> Result<Self> {
        let client = redis::Client::open(config.connection_url())
            .context("failed to create Valkey client")?;
        Ok(Self { client })
    }
}

impl PortStateStore for ValkeyPortStore {
    async fn load(&self) -> Result<BTreeSet<u16>> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("failed to connect to Valkey")?;
        let raw: Option<String> = conn
            .get(keys::ALLOCATED_PORTS)
            .await
            .context("failed to fetch the allocated-port set")?;
        match raw {
            Some(raw) => serde_json::from_str(&raw).context("allocated-port set is not valid JSON"),
            None => Ok(BTreeSet::new()),
        }
    }

    async fn save(&self, ports: &BTreeSet<u16>) -> Result<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("failed to connect to Valkey")?;
        let payload = serde_json::to_string(ports).context("serializing the allocated-port set")?;
        let _: () = conn
            .set(keys::ALLOCATED_PORTS, payload)
            .await
            .context("failed to store the allocated-port set")?;
        Ok(())
    }
}
