//! `launchpad cleanup` — uninstall every session listed in a file.
//!
//! The scheduled cleanup job writes one session identifier per line; this
//! command sweeps them all, tolerating sessions that are already gone.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::services;
use crate::catalog::AppId;
use crate::domain::config::PollSettings;
use crate::infra::cluster::KubeCluster;
use crate::output::OutputContext;
use crate::output::reporter::TerminalReporter;

#[derive(clap::Args)]
pub struct CleanupArgs {
    /// App whose instances are being swept
    #[arg(long, default_value = "vscode")]
    pub app: String,

    /// File with one session identifier per line
    #[arg(long, default_value = "installed_apps.txt")]
    pub file: PathBuf,

    /// Seconds to wait for each namespace to terminate
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,

    #[command(flatten)]
    pub conn: super::ConnectionArgs,
}

/// Execute the cleanup command.
///
/// Failures for individual sessions are reported and do not stop the sweep;
/// the command fails at the end if any session could not be cleaned up.
///
/// # Errors
///
/// Returns an error if the session file cannot be read, the app is unknown,
/// or any session failed to uninstall.
pub async fn run(ctx: &OutputContext, args: CleanupArgs) -> Result<()> {
    let listing = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading session list {}", args.file.display()))?;
    let id = AppId::from_name(&args.app)?;

    let settings = PollSettings {
        interval: Duration::from_secs(1),
        deadline: Duration::from_secs(args.timeout),
    };
    settings.validate()?;

    let ports = args.conn.port_allocator()?;
    let cluster = KubeCluster::connect().await?;
    let reporter = TerminalReporter::new(ctx);

    let mut failed = 0usize;
    for session in listing.split_whitespace() {
        ctx.info(&format!("cleaning up session {session}"));
        let result = services::uninstall::uninstall(
            &cluster,
            &ports,
            &reporter,
            id.name(),
            session,
            true,
            settings,
        )
        .await;
        match result {
            Ok(()) => ctx.success(&format!("cleaned up session {session}")),
            Err(e) => {
                failed += 1;
                ctx.error(&format!("session {session}: {e:#}"));
            }
        }
    }

    anyhow::ensure!(failed == 0, "{failed} session(s) failed to clean up");
    Ok(())
}
