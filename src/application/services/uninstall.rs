//! Uninstall orchestration — delete the grouping namespace and release the
//! instance's port.

use anyhow::{Context, Result};
use tokio::time::Instant;

use crate::application::ports::{ClusterApi, PortStateStore, ProgressReporter};
use crate::application::services::port_allocator::PortAllocator;
use crate::application::services::readiness::{self, ensure_within_deadline};
use crate::domain::app::scope_key;
use crate::domain::config::PollSettings;
use crate::domain::error::WaitError;
use crate::domain::instance::port_from_url;
use crate::domain::resource::{DeleteOutcome, ReadOutcome, ResourceKind};

/// Uninstall a session's application instance.
///
/// Deleting the grouping namespace cascades to every resource scoped beneath
/// it. An already-absent namespace is the success case ("nothing to clean
/// up") and returns without releasing any port. With
/// `wait_until_uninstalled`, polls until the cluster confirms the namespace
/// is gone, bounded by `termination.deadline`.
///
/// # Errors
///
/// Surfaces cluster and deadline failures unchanged.
pub async fn uninstall<S: PortStateStore>(
    cluster: &impl ClusterApi,
    ports: &PortAllocator<S>,
    reporter: &impl ProgressReporter,
    app_name: &str,
    session: &str,
    wait_until_uninstalled: bool,
    termination: PollSettings,
) -> Result<()> {
    let scope = scope_key(app_name, session);

    // The port is not tracked against the instance; recover it from the
    // observed URL before the service disappears.
    let details = readiness::refresh_details(cluster, &scope)
        .await
        .context("refreshing instance details")?;
    let port = details.url.as_deref().and_then(port_from_url);

    reporter.step(&format!("deleting '{scope}'..."));
    match cluster
        .delete(ResourceKind::Namespace, &scope)
        .await
        .with_context(|| format!("deleting namespace '{scope}'"))?
    {
        DeleteOutcome::NotFound => {
            tracing::info!(%scope, "no such app");
            reporter.warn(&format!("nothing to clean up for '{scope}'"));
            return Ok(());
        }
        DeleteOutcome::Deleted => {}
    }

    if wait_until_uninstalled {
        wait_for_termination(cluster, &scope, termination).await?;
        tracing::info!(%scope, "uninstalled successfully");
        reporter.success(&format!("uninstalled '{scope}'"));
    } else {
        tracing::info!(%scope, "uninstall started");
        reporter.step(&format!("uninstall started for '{scope}'"));
    }

    if let Some(port) = port {
        ports.release(port).await?;
    }
    Ok(())
}

/// Poll the grouping namespace until the cluster reports it gone.
async fn wait_for_termination(
    cluster: &impl ClusterApi,
    scope: &str,
    settings: PollSettings,
) -> Result<(), WaitError> {
    let started = Instant::now();
    loop {
        match cluster.read(ResourceKind::Namespace, scope).await? {
            ReadOutcome::NotFound => return Ok(()),
            ReadOutcome::Found => {
                ensure_within_deadline(
                    started,
                    settings,
                    &format!("namespace '{scope}' termination"),
                )?;
                tracing::info!(scope, "waiting for namespace to terminate");
                tokio::time::sleep(settings.interval).await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::Result;

    use super::*;
    use crate::application::ports::{
        ClusterProbe, NullReporter, PortStateStore, ResourceProvisioner,
    };
    use crate::domain::config::PortRange;
    use crate::domain::error::ClusterError;
    use crate::domain::resource::{CreateOutcome, ResourceManifest};

    struct MemoryStore(Mutex<BTreeSet<u16>>);

    impl PortStateStore for MemoryStore {
        async fn load(&self) -> Result<BTreeSet<u16>> {
            Ok(self.0.lock().expect("lock").clone())
        }
        async fn save(&self, ports: &BTreeSet<u16>) -> Result<()> {
            *self.0.lock().expect("lock") = ports.clone();
            Ok(())
        }
    }

    fn pool_with(allocated: &[u16]) -> PortAllocator<MemoryStore> {
        PortAllocator::new(
            MemoryStore(Mutex::new(allocated.iter().copied().collect())),
            PortRange {
                min: 9000,
                max: 9100,
            },
        )
    }

    /// Cluster stub: namespace present for `reads_until_gone` read calls,
    /// then gone; delete succeeds unless the namespace never existed.
    struct TearDownCluster {
        exists: bool,
        url: Option<&'static str>,
        reads_until_gone: usize,
        reads: AtomicUsize,
    }

    impl ResourceProvisioner for TearDownCluster {
        async fn create(
            &self,
            _: &ResourceManifest,
            _: Option<&str>,
        ) -> Result<CreateOutcome, ClusterError> {
            Ok(CreateOutcome::Created)
        }
        async fn read(&self, _: ResourceKind, _: &str) -> Result<ReadOutcome, ClusterError> {
            let seen = self.reads.fetch_add(1, Ordering::SeqCst);
            if seen < self.reads_until_gone {
                Ok(ReadOutcome::Found)
            } else {
                Ok(ReadOutcome::NotFound)
            }
        }
        async fn delete(&self, _: ResourceKind, _: &str) -> Result<DeleteOutcome, ClusterError> {
            if self.exists {
                Ok(DeleteOutcome::Deleted)
            } else {
                Ok(DeleteOutcome::NotFound)
            }
        }
    }

    impl ClusterProbe for TearDownCluster {
        async fn workload_phase(&self, _: &str) -> Result<Option<String>, ClusterError> {
            Ok(self.exists.then(|| "Running".to_string()))
        }
        async fn service_url(&self, _: &str) -> Result<Option<String>, ClusterError> {
            Ok(self.url.map(ToString::to_string))
        }
    }

    #[tokio::test]
    async fn missing_namespace_is_a_silent_success_without_port_release() {
        let cluster = TearDownCluster {
            exists: false,
            url: None,
            reads_until_gone: 0,
            reads: AtomicUsize::new(0),
        };
        let ports = pool_with(&[9050]);
        uninstall(&cluster, &ports, &NullReporter, "editor", "s1", true, PollSettings::termination())
            .await
            .expect("uninstall");
        // No URL was observed, so nothing was released.
        assert!(!ports.is_available(9050).await.expect("is_available"));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_until_the_namespace_is_gone_then_releases_the_port() {
        let cluster = TearDownCluster {
            exists: true,
            url: Some("http://10.0.0.1:9050"),
            reads_until_gone: 2,
            reads: AtomicUsize::new(0),
        };
        let ports = pool_with(&[9050]);
        uninstall(&cluster, &ports, &NullReporter, "editor", "s1", true, PollSettings::termination())
            .await
            .expect("uninstall");
        assert_eq!(cluster.reads.load(Ordering::SeqCst), 3);
        assert!(ports.is_available(9050).await.expect("is_available"));
    }

    #[tokio::test]
    async fn no_wait_still_releases_the_recovered_port() {
        let cluster = TearDownCluster {
            exists: true,
            url: Some("http://10.0.0.1:9050"),
            reads_until_gone: usize::MAX,
            reads: AtomicUsize::new(0),
        };
        let ports = pool_with(&[9050]);
        uninstall(
            &cluster,
            &ports,
            &NullReporter,
            "editor",
            "s1",
            false,
            PollSettings::termination(),
        )
        .await
        .expect("uninstall");
        // No read polls without waiting.
        assert_eq!(cluster.reads.load(Ordering::SeqCst), 0);
        assert!(ports.is_available(9050).await.expect("is_available"));
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_termination_times_out() {
        let cluster = TearDownCluster {
            exists: true,
            url: None,
            reads_until_gone: usize::MAX,
            reads: AtomicUsize::new(0),
        };
        let ports = pool_with(&[]);
        let err = uninstall(
            &cluster,
            &ports,
            &NullReporter,
            "editor",
            "s1",
            true,
            PollSettings {
                interval: std::time::Duration::from_secs(1),
                deadline: std::time::Duration::from_secs(3),
            },
        )
        .await
        .expect_err("expected Err");
        let wait_err = err.downcast_ref::<WaitError>().expect("WaitError");
        assert!(matches!(wait_err, WaitError::DeadlineExceeded { .. }));
    }
}
