//! Full-collection re-fetches shared by the controller and polling targets.
//!
//! Each refresh overwrites one collection with backend truth. The `reconcile_*`
//! variants are used after a failed or completed mutation and only log their
//! own failure.

use sris_client::{ClientError, IntelApi};
use sris_core::DashboardStats;
use tokio::sync::RwLock;

use crate::state::DashboardState;

pub(crate) async fn refresh_items<A: IntelApi + ?Sized>(
    api: &A,
    state: &RwLock<DashboardState>,
) -> Result<DashboardStats, ClientError> {
    let items = api.list_intelligence().await?;
    let count = items.len();
    let stats = state.write().await.replace_items(items);
    tracing::debug!(
        count,
        total_sources = stats.total_sources,
        high_risk = stats.high_risk_count,
        "intelligence items refreshed"
    );
    Ok(stats)
}

pub(crate) async fn refresh_sources<A: IntelApi + ?Sized>(
    api: &A,
    state: &RwLock<DashboardState>,
) -> Result<(), ClientError> {
    let sources = api.list_sources().await?;
    let count = sources.len();
    let divergences = state.write().await.store.replace_sources(sources);
    for d in &divergences {
        tracing::info!(
            source_id = %d.source_id,
            speculated = %d.speculated,
            confirmed = %d.confirmed,
            "backend contradicted optimistic source status"
        );
    }
    tracing::debug!(count, "sources refreshed");
    Ok(())
}

pub(crate) async fn refresh_contract_tasks<A: IntelApi + ?Sized>(
    api: &A,
    state: &RwLock<DashboardState>,
) -> Result<(), ClientError> {
    let tasks = api.list_contract_tasks().await?;
    let count = tasks.len();
    state.write().await.store.replace_contract_tasks(tasks);
    tracing::debug!(count, "contract history refreshed");
    Ok(())
}

pub(crate) async fn reconcile_items<A: IntelApi + ?Sized>(api: &A, state: &RwLock<DashboardState>) {
    if let Err(e) = refresh_items(api, state).await {
        tracing::warn!(error = %e, "item refresh failed");
    }
}

pub(crate) async fn reconcile_sources<A: IntelApi + ?Sized>(
    api: &A,
    state: &RwLock<DashboardState>,
) {
    if let Err(e) = refresh_sources(api, state).await {
        tracing::warn!(error = %e, "source refresh failed");
    }
}

pub(crate) async fn reconcile_contract_tasks<A: IntelApi + ?Sized>(
    api: &A,
    state: &RwLock<DashboardState>,
) {
    if let Err(e) = refresh_contract_tasks(api, state).await {
        tracing::warn!(error = %e, "contract history refresh failed");
    }
}

/// Re-fetches sources then items, in that order.
pub(crate) async fn reconcile_sources_and_items<A: IntelApi + ?Sized>(
    api: &A,
    state: &RwLock<DashboardState>,
) {
    reconcile_sources(api, state).await;
    reconcile_items(api, state).await;
}
