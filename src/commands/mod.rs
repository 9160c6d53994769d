//! Command handlers — wire CLI arguments to application services.

pub mod cleanup;
pub mod launch;
pub mod status;
pub mod uninstall;

use std::path::PathBuf;

use anyhow::Result;

use crate::application::services::port_allocator::PortAllocator;
use crate::domain::config::{DEFAULT_PORT_MAX, DEFAULT_PORT_MIN, PortRange, ValkeyConfig};
use crate::infra::port_store::ValkeyPortStore;
use crate::infra::templates::FsTemplateStore;

/// Collaborator settings shared by all commands.
#[derive(clap::Args)]
pub struct ConnectionArgs {
    /// Manifest templates root directory
    #[arg(long, env = "LAUNCHPAD_MANIFESTS_DIR", default_value = "manifests")]
    pub manifests_dir: PathBuf,

    /// Valkey host for the shared port pool
    #[arg(long, env = "LAUNCHPAD_VALKEY_HOST", default_value = "127.0.0.1")]
    pub valkey_host: String,

    /// Valkey port
    #[arg(long, env = "LAUNCHPAD_VALKEY_PORT", default_value_t = 6379)]
    pub valkey_port: u16,

    /// Lowest port the allocator may hand out
    #[arg(long, default_value_t = DEFAULT_PORT_MIN)]
    pub port_min: u16,

    /// Highest port the allocator may hand out
    #[arg(long, default_value_t = DEFAULT_PORT_MAX)]
    pub port_max: u16,
}

impl ConnectionArgs {
    fn valkey_config(&self) -> ValkeyConfig {
        ValkeyConfig {
            host: self.valkey_host.clone(),
            port: self.valkey_port,
            ..ValkeyConfig::default()
        }
    }

    /// Build the template store rooted at the configured manifests dir.
    #[must_use]
    pub fn template_store(&self) -> FsTemplateStore {
        FsTemplateStore::new(self.manifests_dir.clone())
    }

    /// Build the shared-pool port allocator.
    ///
    /// # Errors
    ///
    /// Returns an error if the port range is empty or the Valkey URL is
    /// invalid.
    pub fn port_allocator(&self) -> Result<PortAllocator<ValkeyPortStore>> {
        let range = PortRange {
            min: self.port_min,
            max: self.port_max,
        };
        range.validate()?;
        let store = ValkeyPortStore::new(&self.valkey_config())?;
        Ok(PortAllocator::new(store, range))
    }
}
