//! Launchpad CLI — short-lived per-session app instances on Kubernetes.

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;

use launchpad::cli::Cli;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("launchpad=info")),
        )
        .with_target(false)
        .init();
}
