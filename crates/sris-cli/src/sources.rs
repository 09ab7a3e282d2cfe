//! `sources` command handlers.

use clap::Subcommand;
use sris_dashboard::{BatchCrawlOutcome, Phase, SessionOutcome};

use crate::{fmt_time, follow, truncate, Api};

/// Sub-commands available under `sources`.
#[derive(Debug, Subcommand)]
pub enum SourceCommands {
    /// List crawl sources and their status
    List,
    /// Register a new source URL and start ingesting it
    Add { url: String },
    /// Delete a source and its items
    Delete { id: String },
    /// Re-crawl one source
    Retry { id: String },
    /// Replace a source's URL
    Edit { id: String, url: String },
    /// Re-crawl every source and follow progress until done
    CrawlAll {
        /// Return as soon as the crawl is queued
        #[arg(long)]
        no_wait: bool,
    },
}

pub(crate) async fn run(dashboard: &Api, command: SourceCommands) -> anyhow::Result<()> {
    match command {
        SourceCommands::List => {
            dashboard.refresh_sources().await?;
            print_sources(dashboard).await;
        }
        SourceCommands::Add { url } => {
            let receipt = dashboard.add_source(&url).await?;
            if receipt.already_exists() {
                println!(
                    "source already registered (id {})",
                    receipt.source_id.as_deref().unwrap_or("?")
                );
            } else {
                println!(
                    "source added (id {}); ingestion runs in the background",
                    receipt.source_id.as_deref().unwrap_or("?")
                );
            }
        }
        SourceCommands::Delete { id } => {
            dashboard.delete_source(&id).await?;
            println!("deleted source {id}");
        }
        SourceCommands::Retry { id } => {
            dashboard.refresh_sources().await?;
            dashboard.retry_source(&id).await?;
            println!("re-crawl of source {id} requested");
            print_sources(dashboard).await;
        }
        SourceCommands::Edit { id, url } => {
            dashboard.edit_source(&id, &url).await?;
            println!("source {id} now points at {}", url.trim());
        }
        SourceCommands::CrawlAll { no_wait } => run_crawl_all(dashboard, no_wait).await?,
    }
    Ok(())
}

async fn run_crawl_all(dashboard: &Api, no_wait: bool) -> anyhow::Result<()> {
    dashboard.refresh_sources().await?;
    let (count, session) = match dashboard.batch_crawl().await? {
        BatchCrawlOutcome::AlreadyRunning => {
            println!("a batch crawl is already being followed");
            return Ok(());
        }
        BatchCrawlOutcome::NothingStarted => {
            println!("no sources needed crawling");
            return Ok(());
        }
        BatchCrawlOutcome::Started { count, session } => (count, session),
    };

    if no_wait {
        println!("crawl queued for {count} sources; check with `sources list`");
        return Ok(());
    }

    println!("crawling {count} sources; press Ctrl-C to stop following");
    match follow(session).await? {
        SessionOutcome::Completed { ticks } => println!("crawl finished after {ticks} checks"),
        SessionOutcome::TimedOut { .. } => {
            println!("stopped following after the polling timeout; crawls may still be running");
        }
        SessionOutcome::Cancelled { .. } => println!("stopped following"),
    }
    print_sources(dashboard).await;
    Ok(())
}

async fn print_sources(dashboard: &Api) {
    let snapshot = dashboard.snapshot().await;
    let entries = snapshot.store().source_entries();
    if entries.is_empty() {
        println!("no sources; add one with `sources add <url>`");
        return;
    }

    println!("{:<8}{:<12}{:<18}URL", "ID", "STATUS", "LAST CRAWLED");
    for entry in entries {
        let source = &entry.source;
        let status = match entry.phase {
            Phase::Confirmed => source.status.to_string(),
            Phase::Speculative { .. } => format!("{}*", source.status),
        };
        println!(
            "{:<8}{:<12}{:<18}{}",
            source.id,
            status,
            fmt_time(source.last_crawled_at),
            truncate(&source.url, 70)
        );
        if let Some(error) = &source.error_message {
            println!("{:<38}error: {}", "", truncate(error, 70));
        }
    }
}
