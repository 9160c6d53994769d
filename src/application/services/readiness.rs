//! Readiness polling — wait until the workload runs and the endpoint exists.

use chrono::Utc;
use tokio::time::Instant;

use crate::application::ports::ClusterProbe;
use crate::domain::config::PollSettings;
use crate::domain::error::{ClusterError, WaitError};
use crate::domain::instance::InstanceDetails;

/// Workload phase that still counts as "not ready".
const PHASE_PENDING: &str = "Pending";

/// Observed readiness of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub status: String,
    pub url: String,
}

/// Poll until the workload reports a terminal, non-pending phase and the
/// service has a public URL.
///
/// Suspends `settings.interval` between attempts so other instances'
/// orchestrations keep running while this one waits.
///
/// # Errors
///
/// Fails with [`WaitError::DeadlineExceeded`] once `settings.deadline` has
/// elapsed, or with the underlying [`ClusterError`] if a poll itself fails.
pub async fn await_ready(
    probe: &impl ClusterProbe,
    app_name: &str,
    scope: &str,
    settings: PollSettings,
) -> Result<Readiness, WaitError> {
    let started = Instant::now();

    let status = loop {
        match probe.workload_phase(scope).await? {
            Some(phase) if phase != PHASE_PENDING => break phase,
            _ => {
                ensure_within_deadline(started, settings, &format!("'{app_name}' readiness"))?;
                tracing::info!(app = app_name, scope, "waiting for workload to be ready");
                tokio::time::sleep(settings.interval).await;
            }
        }
    };

    let url = loop {
        if let Some(url) = probe.service_url(scope).await? {
            break url;
        }
        ensure_within_deadline(
            started,
            settings,
            &format!("'{app_name}' public endpoint assignment"),
        )?;
        tracing::info!(app = app_name, scope, "waiting for a public IP address");
        tokio::time::sleep(settings.interval).await;
    };

    Ok(Readiness { status, url })
}

/// One non-waiting observation of the instance.
///
/// # Errors
///
/// Returns the underlying [`ClusterError`] if either probe fails.
pub async fn refresh_details(
    probe: &impl ClusterProbe,
    scope: &str,
) -> Result<InstanceDetails, ClusterError> {
    Ok(InstanceDetails {
        status: probe.workload_phase(scope).await?,
        url: probe.service_url(scope).await?,
        last_checked_at: Utc::now(),
    })
}

/// Shared deadline guard for the orchestrator's wait loops.
pub(crate) fn ensure_within_deadline(
    started: Instant,
    settings: PollSettings,
    what: &str,
) -> Result<(), WaitError> {
    let waited = started.elapsed();
    if waited >= settings.deadline {
        return Err(WaitError::DeadlineExceeded {
            what: what.to_string(),
            waited,
        });
    }
    Ok(())
}
