//! Launch orchestration — ordered resource creation with hooks, then
//! readiness.

use anyhow::{Context, Result};

use crate::application::ports::{ClusterApi, PortStateStore, ProgressReporter, TemplateStore};
use crate::application::services::port_allocator::PortAllocator;
use crate::application::services::{manifest, readiness};
use crate::domain::app::{AppSpec, SessionContext, scope_key};
use crate::domain::config::PollSettings;
use crate::domain::instance::InstanceDetails;
use crate::domain::resource::{CreateOutcome, ResourceKind};

/// Options for a launch.
#[derive(Debug, Clone, Copy)]
pub struct LaunchOptions {
    /// Block until the instance is reachable before returning.
    pub wait_for_readiness: bool,
    /// Polling policy for the readiness wait.
    pub readiness: PollSettings,
}

/// Launch an application instance for a session.
///
/// Creates every resource in the spec's creation order (pre-hook kinds before
/// their hooked kind, post-hook kinds after). An "already exists" response
/// from the cluster is a successful no-op, so re-launching the same
/// (application, session) pair never creates duplicates. Any other cluster
/// failure aborts the sequence; resources created so far are left in place —
/// the grouping namespace's deletion on a later uninstall sweeps them up, so
/// no rollback is attempted here.
///
/// # Errors
///
/// Surfaces manifest, port-pool, cluster, and deadline failures unchanged.
pub async fn launch<S: PortStateStore>(
    cluster: &impl ClusterApi,
    templates: &impl TemplateStore,
    ports: &PortAllocator<S>,
    reporter: &impl ProgressReporter,
    app: &AppSpec,
    ctx: &SessionContext,
    opts: LaunchOptions,
) -> Result<InstanceDetails> {
    let scope = scope_key(app.name(), &ctx.session);
    tracing::info!(app = app.name(), %scope, "launching instance");

    for kind in app.creation_order().to_vec() {
        create_resource(cluster, templates, ports, reporter, app, ctx, &scope, kind).await?;
    }

    if opts.wait_for_readiness {
        reporter.step(&format!("waiting for '{}' to become reachable...", app.name()));
        let ready = readiness::await_ready(cluster, app.name(), &scope, opts.readiness).await?;
        reporter.success(&format!("'{}' is reachable at {}", app.name(), ready.url));
    }

    let details = readiness::refresh_details(cluster, &scope)
        .await
        .context("refreshing instance details")?;
    Ok(details)
}

/// Resolve and submit one resource.
#[allow(clippy::too_many_arguments)]
async fn create_resource<S: PortStateStore>(
    cluster: &impl ClusterApi,
    templates: &impl TemplateStore,
    ports: &PortAllocator<S>,
    reporter: &impl ProgressReporter,
    app: &AppSpec,
    ctx: &SessionContext,
    scope: &str,
    kind: ResourceKind,
) -> Result<CreateOutcome> {
    reporter.step(&format!("creating {kind}..."));
    let resolved = manifest::resolve(templates, ports, app, ctx, kind).await?;
    let namespace = kind.is_namespaced().then_some(scope);
    let outcome = cluster
        .create(&resolved.manifest, namespace)
        .await
        .with_context(|| format!("creating {kind} for '{scope}'"))?;

    match outcome {
        CreateOutcome::Created => tracing::info!(%kind, scope, "resource created"),
        CreateOutcome::AlreadyExists => {
            tracing::info!(%kind, scope, "resource already exists, skipping");
            // The pool entry drawn while resolving was never published;
            // give it back so idempotent re-launches don't drain the pool.
            if let Some(port) = resolved.allocated_port {
                ports.release(port).await?;
            }
        }
    }
    Ok(outcome)
}
