//! The dashboard's view state, owned by [`crate::Dashboard`].

use sris_core::{
    recompute_stats, ContractTask, DashboardStats, IntelligenceItem, ItemId, Risk,
};

use crate::poller::SessionState;
use crate::store::JobStore;

/// Whether the displayed contract is backend data or a local placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Confirmed,
    Speculative,
}

/// The contract analysis currently open in the detail pane.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractView {
    pub task: ContractTask,
    pub risks: Vec<Risk>,
    pub phase: ViewPhase,
}

impl ContractView {
    #[must_use]
    pub fn confirmed(task: ContractTask, risks: Vec<Risk>) -> Self {
        Self {
            task,
            risks,
            phase: ViewPhase::Confirmed,
        }
    }

    #[must_use]
    pub fn speculative(task: ContractTask) -> Self {
        Self {
            task,
            risks: Vec::new(),
            phase: ViewPhase::Speculative,
        }
    }

    #[must_use]
    pub fn shows(&self, task_id: &str) -> bool {
        self.task.id.as_deref() == Some(task_id)
    }
}

/// Everything the dashboard displays.
///
/// Cloned out through [`crate::Dashboard::snapshot`]; all mutation goes
/// through the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub(crate) store: JobStore,
    pub(crate) items: Vec<IntelligenceItem>,
    pub(crate) stats: DashboardStats,
    pub(crate) detail: Option<IntelligenceItem>,
    pub(crate) batch_mode: bool,
    pub(crate) selected: Vec<ItemId>,
    pub(crate) contract: Option<ContractView>,
    pub(crate) adding_source: bool,
    pub(crate) crawl_session: SessionState,
    pub(crate) contract_session: SessionState,
}

impl DashboardState {
    #[must_use]
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    #[must_use]
    pub fn items(&self) -> &[IntelligenceItem] {
        &self.items
    }

    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        self.stats
    }

    #[must_use]
    pub fn detail(&self) -> Option<&IntelligenceItem> {
        self.detail.as_ref()
    }

    #[must_use]
    pub fn batch_mode(&self) -> bool {
        self.batch_mode
    }

    #[must_use]
    pub fn selected(&self) -> &[ItemId] {
        &self.selected
    }

    #[must_use]
    pub fn contract(&self) -> Option<&ContractView> {
        self.contract.as_ref()
    }

    #[must_use]
    pub fn adding_source(&self) -> bool {
        self.adding_source
    }

    #[must_use]
    pub fn crawl_session(&self) -> SessionState {
        self.crawl_session
    }

    #[must_use]
    pub fn contract_session(&self) -> SessionState {
        self.contract_session
    }

    /// Overwrites the item list and recomputes the stats from it.
    pub(crate) fn replace_items(&mut self, items: Vec<IntelligenceItem>) -> DashboardStats {
        self.items = items;
        self.stats = recompute_stats(&self.items);
        self.stats
    }

    /// Drops the given items, recomputes stats, and closes the detail pane if
    /// it showed one of them.
    pub(crate) fn remove_items(&mut self, ids: &[ItemId]) -> DashboardStats {
        self.items.retain(|item| !ids.contains(&item.id));
        if self
            .detail
            .as_ref()
            .is_some_and(|open| ids.contains(&open.id))
        {
            self.detail = None;
        }
        self.stats = recompute_stats(&self.items);
        self.stats
    }
}
