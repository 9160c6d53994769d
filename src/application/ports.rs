//! Port trait definitions for the application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::domain::error::ClusterError;
use crate::domain::resource::{
    CreateOutcome, DeleteOutcome, ReadOutcome, ResourceKind, ResourceManifest,
};

// ── Cluster Port Traits ───────────────────────────────────────────────────────

/// Uniform create/read/delete surface over the cluster API.
#[allow(async_fn_in_trait)]
pub trait ResourceProvisioner {
    /// Submit a resolved manifest to the cluster.
    ///
    /// An "already exists" rejection is reported as
    /// [`CreateOutcome::AlreadyExists`], never as an error. Namespace-scoped
    /// kinds receive the scope key in `scope`; the namespace itself does not.
    async fn create(
        &self,
        manifest: &ResourceManifest,
        scope: Option<&str>,
    ) -> Result<CreateOutcome, ClusterError>;

    /// Look up the resource of `kind` belonging to `scope`.
    async fn read(&self, kind: ResourceKind, scope: &str) -> Result<ReadOutcome, ClusterError>;

    /// Delete the resource of `kind` belonging to `scope`.
    async fn delete(&self, kind: ResourceKind, scope: &str) -> Result<DeleteOutcome, ClusterError>;
}

/// Observation of asynchronously converging cluster state for one instance.
#[allow(async_fn_in_trait)]
pub trait ClusterProbe {
    /// Phase of the instance's workload pod, `None` while no pod exists.
    async fn workload_phase(&self, scope: &str) -> Result<Option<String>, ClusterError>;

    /// Public URL of the instance's service, `None` until the endpoint is
    /// assigned.
    async fn service_url(&self, scope: &str) -> Result<Option<String>, ClusterError>;
}

/// Composite trait — any type implementing both halves is a `ClusterApi`.
pub trait ClusterApi: ResourceProvisioner + ClusterProbe {}

/// Blanket implementation: any type implementing both halves is a `ClusterApi`.
impl<T> ClusterApi for T where T: ResourceProvisioner + ClusterProbe {}

// ── Template Store Port ───────────────────────────────────────────────────────

/// Lookup of raw manifest templates by application directory and kind.
#[allow(async_fn_in_trait)]
pub trait TemplateStore {
    /// Fetch the template for `kind` under `template_dir`, `None` if absent.
    async fn fetch(&self, template_dir: &str, kind: ResourceKind) -> Result<Option<String>>;
}

// ── Port State Store Port ─────────────────────────────────────────────────────

/// Shared storage for the allocated-port set.
///
/// The set lives under a well-known key so every orchestrator process
/// observes the same pool.
#[allow(async_fn_in_trait)]
pub trait PortStateStore {
    /// Load the current allocated-port set.
    async fn load(&self) -> Result<BTreeSet<u16>>;

    /// Persist the given allocated-port set.
    async fn save(&self, ports: &BTreeSet<u16>) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

/// Reporter that swallows everything. Used by non-interactive callers.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
