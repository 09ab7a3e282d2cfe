//! Batch crawl and batch delete.

use std::sync::Arc;

use async_trait::async_trait;
use sris_client::IntelApi;
use sris_core::BatchDeleteReceipt;
use tokio::sync::RwLock;

use crate::dashboard::Dashboard;
use crate::error::{Action, DashboardError};
use crate::optimistic;
use crate::poller::{spawn_session, PollHandle, PollTarget, SessionOutcome, SessionState};
use crate::refresh::{reconcile_items, reconcile_sources, refresh_items, refresh_sources};
use crate::state::DashboardState;

/// Result of [`Dashboard::batch_crawl`].
#[derive(Debug)]
pub enum BatchCrawlOutcome {
    /// A crawl session is already polling; nothing was sent.
    AlreadyRunning,
    /// The backend queued no sources, so no session was started.
    NothingStarted,
    /// The backend queued `count` sources and a session is polling them.
    Started { count: u32, session: PollHandle },
}

/// Polls sources and items until no source is processing.
struct CrawlProgress<A: IntelApi> {
    api: Arc<A>,
    state: Arc<RwLock<DashboardState>>,
}

#[async_trait]
impl<A: IntelApi> PollTarget for CrawlProgress<A> {
    fn name(&self) -> &'static str {
        "batch-crawl"
    }

    async fn tick(&self) -> bool {
        let (sources, items) = tokio::join!(
            refresh_sources(&*self.api, &self.state),
            refresh_items(&*self.api, &self.state),
        );
        if let Err(e) = items {
            tracing::warn!(error = %e, "crawl tick: item refresh failed");
        }
        match sources {
            Ok(()) => !self.state.read().await.store.any_processing(),
            Err(e) => {
                tracing::warn!(error = %e, "crawl tick: source refresh failed");
                false
            }
        }
    }

    async fn on_finish(&self, outcome: SessionOutcome) {
        self.state.write().await.crawl_session = outcome.state();
    }

    async fn on_timeout(&self) {
        reconcile_sources(&*self.api, &self.state).await;
    }
}

impl<A: IntelApi> Dashboard<A> {
    /// Queues every source for crawling and polls until they settle.
    ///
    /// Sources are shown as processing immediately. A second call while a
    /// session is polling is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the batch crawl request fails.
    /// Sources are re-fetched and the crawl flag is released first.
    pub async fn batch_crawl(&self) -> Result<BatchCrawlOutcome, DashboardError> {
        let Some(guard) = self.crawl_flag.try_acquire() else {
            tracing::info!("batch crawl already polling, request ignored");
            return Ok(BatchCrawlOutcome::AlreadyRunning);
        };

        let flipped = optimistic::begin_batch_crawl(&mut self.state.write().await.store);
        tracing::debug!(flipped, "sources marked processing");

        let receipt = match self.api.batch_crawl().await {
            Ok(receipt) => receipt,
            Err(e) => {
                drop(guard);
                reconcile_sources(&*self.api, &self.state).await;
                return Err(DashboardError::action(Action::BatchCrawl, e));
            }
        };

        if receipt.count == 0 {
            drop(guard);
            tracing::info!("batch crawl queued no sources");
            reconcile_sources(&*self.api, &self.state).await;
            return Ok(BatchCrawlOutcome::NothingStarted);
        }

        tracing::info!(count = receipt.count, "batch crawl started");
        self.state.write().await.crawl_session = SessionState::Active;
        let target = CrawlProgress {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
        };
        Ok(BatchCrawlOutcome::Started {
            count: receipt.count,
            session: spawn_session(target, self.poll, guard),
        })
    }

    /// Enters multi-select mode with an empty selection.
    pub async fn enter_batch_mode(&self) {
        let mut state = self.state.write().await;
        state.batch_mode = true;
        state.selected.clear();
    }

    pub async fn exit_batch_mode(&self) {
        let mut state = self.state.write().await;
        state.batch_mode = false;
        state.selected.clear();
    }

    /// Adds or removes one item from the selection. Returns whether it is
    /// now selected.
    pub async fn toggle_select(&self, item_id: &str) -> bool {
        let mut state = self.state.write().await;
        if let Some(index) = state.selected.iter().position(|id| id == item_id) {
            state.selected.remove(index);
            false
        } else {
            state.selected.push(item_id.to_string());
            true
        }
    }

    /// Selects every listed item, or clears the selection if everything is
    /// already selected. Returns the new selection size.
    pub async fn select_all(&self) -> usize {
        let mut state = self.state.write().await;
        let all_selected = !state.items.is_empty()
            && state
                .items
                .iter()
                .all(|item| state.selected.contains(&item.id));
        let next: Vec<_> = if all_selected {
            Vec::new()
        } else {
            state.items.iter().map(|item| item.id.clone()).collect()
        };
        state.selected = next;
        state.selected.len()
    }

    /// Deletes the selected items in one request, then leaves batch mode.
    ///
    /// Returns `Ok(None)` without contacting the backend when nothing is
    /// selected.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the request fails. The item
    /// list is re-fetched; batch mode and the selection are kept.
    pub async fn batch_delete(&self) -> Result<Option<BatchDeleteReceipt>, DashboardError> {
        let selected = self.state.read().await.selected.clone();
        if selected.is_empty() {
            return Ok(None);
        }

        match self.api.batch_delete_items(&selected).await {
            Ok(receipt) => {
                let mut state = self.state.write().await;
                state.remove_items(&selected);
                state.batch_mode = false;
                state.selected.clear();
                tracing::info!(
                    requested = selected.len(),
                    deleted = ?receipt.count,
                    "batch delete finished"
                );
                Ok(Some(receipt))
            }
            Err(e) => {
                reconcile_items(&*self.api, &self.state).await;
                Err(DashboardError::action(Action::BatchDelete, e))
            }
        }
    }
}
