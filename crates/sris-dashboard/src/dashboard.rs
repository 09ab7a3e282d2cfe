//! The dashboard controller.
//!
//! [`Dashboard`] owns the single [`DashboardState`] behind an async lock and
//! exposes every user action as a method. Locks are never held across a
//! backend call. Batch operations live in `batch`, contract operations in
//! `contracts`.

use std::sync::Arc;

use sris_client::IntelApi;
use sris_core::{AddSourceReceipt, DashboardStats, IntelligenceItem, ServiceStatus};
use tokio::sync::RwLock;

use crate::error::{Action, DashboardError};
use crate::optimistic;
use crate::poller::{JobFlag, PollConfig};
use crate::refresh::{
    reconcile_items, reconcile_sources, reconcile_sources_and_items, refresh_contract_tasks,
    refresh_items, refresh_sources,
};
use crate::state::DashboardState;

pub struct Dashboard<A: IntelApi> {
    pub(crate) api: Arc<A>,
    pub(crate) state: Arc<RwLock<DashboardState>>,
    pub(crate) poll: PollConfig,
    pub(crate) crawl_flag: JobFlag,
    pub(crate) contract_flag: JobFlag,
}

impl<A: IntelApi> Clone for Dashboard<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            poll: self.poll,
            crawl_flag: self.crawl_flag.clone(),
            contract_flag: self.contract_flag.clone(),
        }
    }
}

impl<A: IntelApi> Dashboard<A> {
    /// Creates a controller with empty state. Call [`Dashboard::load`] to
    /// populate it.
    #[must_use]
    pub fn new(api: Arc<A>, poll: PollConfig) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(DashboardState::default())),
            poll,
            crawl_flag: JobFlag::default(),
            contract_flag: JobFlag::default(),
        }
    }

    /// A copy of everything currently displayed.
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// `true` while a batch crawl session is polling.
    #[must_use]
    pub fn crawl_in_progress(&self) -> bool {
        self.crawl_flag.is_held()
    }

    /// `true` while a contract analysis session is polling.
    #[must_use]
    pub fn contract_analysis_in_progress(&self) -> bool {
        self.contract_flag.is_held()
    }

    /// Initial fetch of items (with stats) and contract history. Both
    /// requests run concurrently; the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] naming the collection that failed
    /// to load.
    pub async fn load(&self) -> Result<DashboardStats, DashboardError> {
        let (items, contracts) = tokio::join!(
            refresh_items(&*self.api, &self.state),
            refresh_contract_tasks(&*self.api, &self.state),
        );
        let stats = items.map_err(|e| DashboardError::action(Action::LoadItems, e))?;
        contracts.map_err(|e| DashboardError::action(Action::LoadContracts, e))?;
        tracing::info!(
            total_sources = stats.total_sources,
            high_risk = stats.high_risk_count,
            "dashboard loaded"
        );
        Ok(stats)
    }

    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the item list cannot be fetched.
    pub async fn refresh_items(&self) -> Result<DashboardStats, DashboardError> {
        refresh_items(&*self.api, &self.state)
            .await
            .map_err(|e| DashboardError::action(Action::LoadItems, e))
    }

    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the source list cannot be fetched.
    pub async fn refresh_sources(&self) -> Result<(), DashboardError> {
        refresh_sources(&*self.api, &self.state)
            .await
            .map_err(|e| DashboardError::action(Action::LoadSources, e))
    }

    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the contract history cannot be
    /// fetched.
    pub async fn refresh_contract_tasks(&self) -> Result<(), DashboardError> {
        refresh_contract_tasks(&*self.api, &self.state)
            .await
            .map_err(|e| DashboardError::action(Action::LoadContracts, e))
    }

    /// Backend liveness check.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if `GET /` fails.
    pub async fn ping(&self) -> Result<ServiceStatus, DashboardError> {
        self.api
            .service_status()
            .await
            .map_err(|e| DashboardError::action(Action::Ping, e))
    }

    // -- sources -----------------------------------------------------------

    /// Registers a source URL, then refreshes items and sources.
    ///
    /// A reply of `status: "exists"` is returned as-is; callers decide how to
    /// report it.
    ///
    /// # Errors
    ///
    /// - [`DashboardError::InvalidInput`] if `url` is blank after trimming.
    /// - [`DashboardError::Action`] if the backend rejects the request.
    pub async fn add_source(&self, url: &str) -> Result<AddSourceReceipt, DashboardError> {
        let url = non_blank_url(url)?;

        self.state.write().await.adding_source = true;
        let result = self.api.add_source(url).await;
        self.state.write().await.adding_source = false;

        match result {
            Ok(receipt) => {
                if receipt.already_exists() {
                    tracing::info!(url, "source already registered");
                } else {
                    tracing::info!(url, source_id = ?receipt.source_id, "source added");
                }
                reconcile_items(&*self.api, &self.state).await;
                reconcile_sources(&*self.api, &self.state).await;
                Ok(receipt)
            }
            Err(e) => {
                reconcile_sources(&*self.api, &self.state).await;
                Err(DashboardError::action(Action::AddSource, e))
            }
        }
    }

    /// Deletes a source, then refreshes sources and items.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the backend rejects the delete.
    pub async fn delete_source(&self, source_id: &str) -> Result<(), DashboardError> {
        match self.api.delete_source(source_id).await {
            Ok(()) => {
                tracing::info!(source_id, "source deleted");
                reconcile_sources_and_items(&*self.api, &self.state).await;
                Ok(())
            }
            Err(e) => {
                reconcile_sources(&*self.api, &self.state).await;
                Err(DashboardError::action(Action::DeleteSource, e))
            }
        }
    }

    /// Shows the source as crawling, asks the backend to re-crawl it, then
    /// refreshes once. Single retries are not polled.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the retry request fails; the
    /// optimistic status is corrected by a source refresh first.
    pub async fn retry_source(&self, source_id: &str) -> Result<(), DashboardError> {
        let flipped = optimistic::begin_retry(&mut self.state.write().await.store, source_id);
        if !flipped {
            tracing::debug!(source_id, "retrying a source not in the local snapshot");
        }

        match self.api.retry_source(source_id).await {
            Ok(()) => {
                tracing::info!(source_id, "source retry requested");
                reconcile_sources_and_items(&*self.api, &self.state).await;
                Ok(())
            }
            Err(e) => {
                reconcile_sources(&*self.api, &self.state).await;
                Err(DashboardError::action(Action::RetrySource, e))
            }
        }
    }

    /// Replaces a source's URL, then refreshes sources.
    ///
    /// # Errors
    ///
    /// - [`DashboardError::InvalidInput`] if `url` is blank after trimming.
    /// - [`DashboardError::Action`] on any non-OK reply.
    pub async fn edit_source(&self, source_id: &str, url: &str) -> Result<(), DashboardError> {
        let url = non_blank_url(url)?;
        let result = self.api.update_source_url(source_id, url).await;
        reconcile_sources(&*self.api, &self.state).await;
        match result {
            Ok(()) => {
                tracing::info!(source_id, url, "source URL updated");
                Ok(())
            }
            Err(e) => Err(DashboardError::action(Action::EditSource, e)),
        }
    }

    // -- items -------------------------------------------------------------

    /// Opens the detail pane on an item from the current list.
    pub async fn open_detail(&self, item_id: &str) -> Option<IntelligenceItem> {
        let mut state = self.state.write().await;
        let item = state.items.iter().find(|i| i.id == item_id).cloned();
        state.detail.clone_from(&item);
        item
    }

    pub async fn close_detail(&self) {
        self.state.write().await.detail = None;
    }

    /// Deletes one item. On success it is removed locally, stats are
    /// recomputed, and the detail pane closes if it showed that item.
    ///
    /// Unlike the other mutations, a successful delete does not re-fetch the
    /// item list; the local removal is authoritative.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] unless the backend answers 200; the
    /// item list is re-fetched first.
    pub async fn delete_item(&self, item_id: &str) -> Result<DashboardStats, DashboardError> {
        match self.api.delete_item(item_id).await {
            Ok(()) => {
                let stats = self.state.write().await.remove_items(&[item_id.to_string()]);
                tracing::info!(item_id, "intelligence item deleted");
                Ok(stats)
            }
            Err(e) => {
                reconcile_items(&*self.api, &self.state).await;
                Err(DashboardError::action(Action::DeleteItem, e))
            }
        }
    }
}

fn non_blank_url(url: &str) -> Result<&str, DashboardError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::InvalidInput(
            "source URL must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
