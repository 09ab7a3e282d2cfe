mod contracts;
mod items;
mod sources;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sris_client::ApiClient;
use sris_dashboard::{Dashboard, PollConfig, PollHandle, SessionOutcome};
use tracing_subscriber::EnvFilter;

use contracts::ContractCommands;
use items::ItemCommands;
use sources::SourceCommands;

#[derive(Debug, Parser)]
#[command(name = "sris")]
#[command(about = "Supply-chain risk intelligence dashboard client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingested intelligence items
    Items {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Show headline stats (distinct sources, high-risk items)
    Stats,
    /// Crawl sources
    Sources {
        #[command(subcommand)]
        command: SourceCommands,
    },
    /// Contract risk analysis
    Contracts {
        #[command(subcommand)]
        command: ContractCommands,
    },
    /// Check that the backend is reachable
    Ping,
}

type Api = Dashboard<ApiClient>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = sris_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .init();
    tracing::debug!(
        base_url = %config.api_base_url,
        env = %config.env,
        "configuration loaded"
    );

    let client = ApiClient::new(&config)?;
    let dashboard: Api = Dashboard::new(Arc::new(client), PollConfig::from(&config));

    match cli.command {
        Some(Commands::Items { command }) => items::run(&dashboard, command).await?,
        Some(Commands::Stats) => items::run_stats(&dashboard).await?,
        Some(Commands::Sources { command }) => sources::run(&dashboard, command).await?,
        Some(Commands::Contracts { command }) => contracts::run(&dashboard, command).await?,
        Some(Commands::Ping) => {
            let status = dashboard.ping().await?;
            println!("{}: {}", config.api_base_url, status.message);
        }
        None => println!("sris: no command given; try `sris --help`"),
    }

    Ok(())
}

/// Waits for a polling session, stopping it on Ctrl-C.
async fn follow(session: PollHandle) -> anyhow::Result<SessionOutcome> {
    let stop = session.stop_token();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.cancel();
        }
    });
    let outcome = session.wait().await;
    watcher.abort();
    Ok(outcome?)
}

/// Formats an optional timestamp for display, with a dash placeholder for `None`.
fn fmt_time(time: Option<chrono::NaiveDateTime>) -> String {
    time.map_or_else(
        || "\u{2014}".to_string(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Shortens `text` to `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
