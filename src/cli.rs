//! CLI argument parsing with clap derive.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// Short-lived per-session app instances on Kubernetes
#[derive(Parser)]
#[command(
    name = "launchpad",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Launch an app instance for a session
    Launch(commands::launch::LaunchArgs),

    /// Tear down a session's app instance
    Uninstall(commands::uninstall::UninstallArgs),

    /// Show an instance's observed status and URL
    Status(commands::status::StatusArgs),

    /// Uninstall every session listed in a file
    Cleanup(commands::cleanup::CleanupArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
        } = self;
        let ctx = OutputContext::new(no_color, quiet);
        match command {
            Command::Launch(args) => commands::launch::run(&ctx, json, args).await,
            Command::Uninstall(args) => commands::uninstall::run(&ctx, args).await,
            Command::Status(args) => commands::status::run(&ctx, json, args).await,
            Command::Cleanup(args) => commands::cleanup::run(&ctx, args).await,
        }
    }
}
