//! `items` and `stats` command handlers.

use clap::Subcommand;
use sris_core::is_high_risk;

use crate::{truncate, Api};

/// Sub-commands available under `items`.
#[derive(Debug, Subcommand)]
pub enum ItemCommands {
    /// List intelligence items, newest first
    List {
        /// Only show items flagged as high risk
        #[arg(long)]
        high_risk: bool,
    },
    /// Show one item in full
    Show { id: String },
    /// Delete one item
    Delete { id: String },
    /// Delete several items in one request
    DeleteBatch {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

pub(crate) async fn run(dashboard: &Api, command: ItemCommands) -> anyhow::Result<()> {
    match command {
        ItemCommands::List { high_risk } => run_list(dashboard, high_risk).await,
        ItemCommands::Show { id } => run_show(dashboard, &id).await,
        ItemCommands::Delete { id } => {
            dashboard.refresh_items().await?;
            let stats = dashboard.delete_item(&id).await?;
            println!(
                "deleted item {id}; {} sources, {} high-risk items remain",
                stats.total_sources, stats.high_risk_count
            );
            Ok(())
        }
        ItemCommands::DeleteBatch { ids } => {
            dashboard.refresh_items().await?;
            dashboard.enter_batch_mode().await;
            for id in &ids {
                dashboard.toggle_select(id).await;
            }
            match dashboard.batch_delete().await? {
                Some(receipt) => println!(
                    "deleted {} of {} items",
                    receipt.count.map_or_else(|| "?".to_string(), |c| c.to_string()),
                    ids.len()
                ),
                None => println!("nothing selected"),
            }
            Ok(())
        }
    }
}

async fn run_list(dashboard: &Api, high_risk_only: bool) -> anyhow::Result<()> {
    dashboard.refresh_items().await?;
    let snapshot = dashboard.snapshot().await;
    let items: Vec<_> = snapshot
        .items()
        .iter()
        .filter(|item| !high_risk_only || is_high_risk(item))
        .collect();

    if items.is_empty() {
        println!("no intelligence items; add a source with `sources add <url>`");
        return Ok(());
    }

    println!("{:<8}{:<10}{:<6}{:<12}SUMMARY", "ID", "SOURCE", "RISK", "PUBLISHED");
    for item in items {
        let flag = if is_high_risk(item) { "HIGH" } else { "" };
        let published = item.publish_date.as_deref().unwrap_or("\u{2014}");
        let summary = item
            .title
            .as_deref()
            .or(item.summary.as_deref())
            .unwrap_or_default();
        println!(
            "{:<8}{:<10}{:<6}{:<12}{}",
            item.id,
            item.source_id,
            flag,
            truncate(published, 10),
            truncate(summary, 60)
        );
    }
    Ok(())
}

async fn run_show(dashboard: &Api, id: &str) -> anyhow::Result<()> {
    dashboard.refresh_items().await?;
    let item = dashboard
        .open_detail(id)
        .await
        .ok_or_else(|| anyhow::anyhow!("item '{id}' not found"))?;

    println!("Item {} (source {})", item.id, item.source_id);
    if let Some(title) = &item.title {
        println!("Title: {title}");
    }
    if let Some(url) = &item.source_url {
        println!("URL: {url}");
    }
    if let Some(hint) = &item.risk_hint {
        println!("Risk: {hint}{}", if is_high_risk(&item) { " [HIGH]" } else { "" });
    }
    if let Some(tags) = item.risk_tags.as_ref().filter(|t| !t.is_empty()) {
        println!("Tags: {}", tags.join(", "));
    }
    if let Some(summary) = &item.summary {
        println!();
        println!("{summary}");
    }
    if let Some(text) = item.translated_text.as_ref().or(item.original_text.as_ref()) {
        println!();
        println!("{text}");
    }
    Ok(())
}

pub(crate) async fn run_stats(dashboard: &Api) -> anyhow::Result<()> {
    let stats = dashboard.refresh_items().await?;
    println!("sources with items: {}", stats.total_sources);
    println!("high-risk items:    {}", stats.high_risk_count);
    Ok(())
}
