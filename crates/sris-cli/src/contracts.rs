//! `contracts` command handlers.

use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use sris_dashboard::{ContractView, SessionOutcome};

use crate::{fmt_time, follow, truncate, Api};

/// Sub-commands available under `contracts`.
#[derive(Debug, Subcommand)]
pub enum ContractCommands {
    /// List past analyses
    List,
    /// Upload a contract document and show its risk analysis
    Upload {
        path: PathBuf,
        /// Return after the first result fetch even if analysis is ongoing
        #[arg(long)]
        no_wait: bool,
    },
    /// Show the risk analysis for a task
    Show { task_id: String },
    /// Delete an analysis record
    Delete { task_id: String },
}

pub(crate) async fn run(dashboard: &Api, command: ContractCommands) -> anyhow::Result<()> {
    match command {
        ContractCommands::List => run_list(dashboard).await?,
        ContractCommands::Upload { path, no_wait } => run_upload(dashboard, path, no_wait).await?,
        ContractCommands::Show { task_id } => {
            let view = dashboard.view_contract_result(&task_id).await?;
            print_view(&view);
        }
        ContractCommands::Delete { task_id } => {
            dashboard.delete_contract_task(&task_id).await?;
            println!("deleted contract record {task_id}");
        }
    }
    Ok(())
}

async fn run_list(dashboard: &Api) -> anyhow::Result<()> {
    dashboard.refresh_contract_tasks().await?;
    let snapshot = dashboard.snapshot().await;
    let tasks = snapshot.store().list_contract_tasks();
    if tasks.is_empty() {
        println!("no contract analyses yet; upload one with `contracts upload <file>`");
        return Ok(());
    }

    println!("{:<10}{:<12}{:<10}{:<18}FILE", "TASK", "STATUS", "RISK", "UPLOADED");
    for task in tasks {
        println!(
            "{:<10}{:<12}{:<10}{:<18}{}",
            task.id.as_deref().unwrap_or("\u{2014}"),
            task.status,
            task.overall_risk_level.as_deref().unwrap_or("\u{2014}"),
            fmt_time(task.created_at),
            truncate(&task.filename, 50)
        );
    }
    Ok(())
}

async fn run_upload(dashboard: &Api, path: PathBuf, no_wait: bool) -> anyhow::Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .with_context(|| format!("'{}' has no usable file name", path.display()))?;
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    println!("analysing {filename} ({} bytes)...", bytes.len());
    let upload = dashboard.upload_contract(&filename, bytes).await?;

    let Some(session) = upload.session.filter(|_| !no_wait) else {
        print_view(&upload.view);
        return Ok(());
    };

    println!("analysis still running; press Ctrl-C to stop following");
    let outcome = follow(session).await?;
    if let SessionOutcome::TimedOut { .. } = outcome {
        println!("stopped following after the polling timeout");
    }
    match dashboard.snapshot().await.contract() {
        Some(view) => print_view(view),
        None => print_view(&upload.view),
    }
    Ok(())
}

fn print_view(view: &ContractView) {
    let task = &view.task;
    println!("{} [{}]", task.filename, task.status);
    if let Some(level) = &task.overall_risk_level {
        println!("Overall risk: {level}");
    }
    if view.risks.is_empty() {
        println!("no risks reported");
        return;
    }

    println!();
    println!("{:<10}{:<20}CLAUSE", "LEVEL", "CATEGORY");
    for risk in &view.risks {
        println!(
            "{:<10}{:<20}{}",
            risk.risk_level.as_deref().unwrap_or("\u{2014}"),
            truncate(risk.risk_category.as_deref().unwrap_or("\u{2014}"), 18),
            truncate(risk.clause_text.as_deref().unwrap_or_default(), 60)
        );
        if let Some(reason) = risk.risk_reason.as_ref().or(risk.explanation.as_ref()) {
            println!("{:<30}{}", "", truncate(reason, 80));
        }
    }
}
