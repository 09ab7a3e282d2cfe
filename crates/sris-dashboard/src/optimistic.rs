//! Local guesses applied before the backend confirms a mutation.
//!
//! Every guess is overwritten by the next successful fetch. Only the upload
//! placeholder has an explicit failure state.

use sris_core::{ContractTask, SourceStatus};

use crate::state::{ContractView, DashboardState, ViewPhase};
use crate::store::JobStore;

/// Shows a single source as crawling while its retry request is in flight.
pub(crate) fn begin_retry(store: &mut JobStore, source_id: &str) -> bool {
    store.upsert_source_status(source_id, SourceStatus::Processing)
}

/// Shows every idle, done or failed source as crawling. Returns how many
/// were flipped.
pub(crate) fn begin_batch_crawl(store: &mut JobStore) -> usize {
    let pending: Vec<String> = store
        .list_sources()
        .filter(|s| !s.status.is_processing())
        .map(|s| s.id.clone())
        .collect();
    for id in &pending {
        store.upsert_source_status(id, SourceStatus::Processing);
    }
    pending.len()
}

/// Replaces the open contract with a processing placeholder for `filename`.
pub(crate) fn begin_upload(state: &mut DashboardState, filename: &str) {
    state.contract = Some(ContractView::speculative(ContractTask::transient(
        filename,
    )));
}

/// Marks the upload placeholder as failed. A confirmed view is left alone.
pub(crate) fn fail_upload(state: &mut DashboardState, filename: &str) {
    let task = match state.contract.take() {
        Some(view) if view.phase == ViewPhase::Confirmed => {
            state.contract = Some(view);
            return;
        }
        Some(view) => view.task,
        None => ContractTask::transient(filename),
    };
    state.contract = Some(ContractView::speculative(task.into_failed()));
}
