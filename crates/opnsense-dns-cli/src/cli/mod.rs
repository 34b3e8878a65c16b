//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;
pub mod settings;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use settings::Settings;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = Config::resolve_path(cli.global.config.as_deref())?;
    let config = Config::load(&config_path)?;

    let settings = Settings::resolve(&cli.global, &config)?;
    crate::logging::init(&settings.log_level, settings.log_format)?;

    debug!(
        config = %config_path.display(),
        url = ?settings.url,
        dry_run = settings.dry_run,
        domain_filter = ?settings.provider.domain_filter,
        max_retries = settings.retry.max_retries,
        timeout = ?settings.timeout,
        "Resolved settings"
    );

    let timeout = settings.timeout;

    // Create context for commands
    let ctx = commands::Context { settings, config_path };

    let operation = dispatch(ctx, cli.command);

    tokio::select! {
        result = with_timeout(operation, timeout) => result,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("Interrupted"),
    }
}

async fn dispatch(ctx: commands::Context, command: Commands) -> Result<()> {
    match command {
        Commands::Negotiate => commands::negotiate::execute(ctx).await,
        Commands::Records => commands::records::execute(ctx).await,
        Commands::Adjust(args) => commands::adjust::execute(ctx, args).await,
        Commands::Apply(args) => commands::apply::execute(ctx, args).await,
        Commands::Check => commands::check::execute(ctx).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}

/// Drop the operation, aborting in-flight requests, once `timeout` elapses.
async fn with_timeout<F>(operation: F, timeout: Option<Duration>) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, operation)
            .await
            .map_err(|_| anyhow::anyhow!("Operation timed out after {}s", limit.as_secs()))?,
        None => operation.await,
    }
}
