//! `launchpad uninstall` — tear down a session's app instance.

use std::time::Duration;

use anyhow::Result;

use crate::application::services;
use crate::catalog::AppId;
use crate::domain::config::PollSettings;
use crate::infra::cluster::KubeCluster;
use crate::output::OutputContext;
use crate::output::reporter::TerminalReporter;

#[derive(clap::Args)]
pub struct UninstallArgs {
    /// App to uninstall
    #[arg(long, default_value = "vscode")]
    pub app: String,

    /// Session identifier the instance belongs to
    #[arg(long)]
    pub session: String,

    /// Return once deletion is issued instead of waiting for termination
    #[arg(long)]
    pub no_wait: bool,

    /// Seconds to wait for the namespace to terminate
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,

    #[command(flatten)]
    pub conn: super::ConnectionArgs,
}

/// Execute the uninstall command.
///
/// # Errors
///
/// Returns an error if the app is unknown, configuration is invalid, or the
/// teardown fails.
pub async fn run(ctx: &OutputContext, args: UninstallArgs) -> Result<()> {
    let id = AppId::from_name(&args.app)?;

    let settings = PollSettings {
        interval: Duration::from_secs(1),
        deadline: Duration::from_secs(args.timeout),
    };
    settings.validate()?;

    let ports = args.conn.port_allocator()?;
    let cluster = KubeCluster::connect().await?;
    let reporter = TerminalReporter::new(ctx);

    services::uninstall::uninstall(
        &cluster,
        &ports,
        &reporter,
        id.name(),
        &args.session,
        !args.no_wait,
        settings,
    )
    .await
}
