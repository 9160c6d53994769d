//! `launchpad launch` — provision an app instance for a session.

use std::time::Duration;

use anyhow::Result;

use crate::application::services;
use crate::catalog::{self, AppId};
use crate::domain::app::SessionContext;
use crate::domain::config::PollSettings;
use crate::infra::cluster::KubeCluster;
use crate::output::OutputContext;
use crate::output::reporter::SpinnerReporter;

#[derive(clap::Args)]
pub struct LaunchArgs {
    /// App to launch
    #[arg(long, default_value = "vscode")]
    pub app: String,

    /// Session identifier the instance belongs to
    #[arg(long)]
    pub session: String,

    /// Override the app's default credential
    #[arg(long)]
    pub password: Option<String>,

    /// Return immediately instead of waiting for readiness
    #[arg(long)]
    pub no_wait: bool,

    /// Seconds to wait for the instance to become reachable
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,

    #[command(flatten)]
    pub conn: super::ConnectionArgs,
}

/// Execute the launch command.
///
/// # Errors
///
/// Returns an error if the app is unknown, configuration is invalid, or any
/// step of the launch sequence fails.
pub async fn run(ctx: &OutputContext, json: bool, args: LaunchArgs) -> Result<()> {
    let id = AppId::from_name(&args.app)?;
    let app = catalog::app_spec(id)?;
    let session_ctx = SessionContext {
        session: args.session.clone(),
        credential: args
            .password
            .clone()
            .unwrap_or_else(|| catalog::default_credential(id).to_string()),
    };

    let settings = PollSettings {
        interval: Duration::from_millis(300),
        deadline: Duration::from_secs(args.timeout),
    };
    settings.validate()?;

    let templates = args.conn.template_store();
    let ports = args.conn.port_allocator()?;
    let cluster = KubeCluster::connect().await?;
    let reporter = SpinnerReporter::default();

    let details = services::launch::launch(
        &cluster,
        &templates,
        &ports,
        &reporter,
        &app,
        &session_ctx,
        services::launch::LaunchOptions {
            wait_for_readiness: !args.no_wait,
            readiness: settings,
        },
    )
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        ctx.kv("status", details.status.as_deref().unwrap_or("-"));
        ctx.kv("url", details.url.as_deref().unwrap_or("-"));
        ctx.kv("checked", &details.last_checked_at.to_rfc3339());
    }
    Ok(())
}
