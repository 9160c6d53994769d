//! `launchpad status` — show an instance's observed status and URL.

use anyhow::Result;

use crate::application::services::readiness;
use crate::catalog::AppId;
use crate::domain::app::scope_key;
use crate::infra::cluster::KubeCluster;
use crate::output::OutputContext;

#[derive(clap::Args)]
pub struct StatusArgs {
    /// App to inspect
    #[arg(long, default_value = "vscode")]
    pub app: String,

    /// Session identifier the instance belongs to
    #[arg(long)]
    pub session: String,
}

/// Execute the status command.
///
/// # Errors
///
/// Returns an error if the app is unknown or the cluster cannot be queried.
pub async fn run(ctx: &OutputContext, json: bool, args: StatusArgs) -> Result<()> {
    let id = AppId::from_name(&args.app)?;
    let scope = scope_key(id.name(), &args.session);

    let cluster = KubeCluster::connect().await?;
    let details = readiness::refresh_details(&cluster, &scope).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        ctx.kv("instance", &scope);
        ctx.kv("status", details.status.as_deref().unwrap_or("-"));
        ctx.kv("url", details.url.as_deref().unwrap_or("-"));
        ctx.kv("checked", &details.last_checked_at.to_rfc3339());
    }
    Ok(())
}
