//! Client-side snapshot of sources and contract tasks.
//!
//! Backend fetches overwrite the store wholesale. Between fetches the
//! optimistic mutator may flip a source's status locally; such entries are
//! marked [`Phase::Speculative`] until the next replacement confirms or
//! contradicts the guess.

use sris_core::{ContractTask, Source, SourceId, SourceStatus};

/// Whether an entry reflects the last backend fetch or a local guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Confirmed,
    Speculative { confirmed_status: SourceStatus },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    pub source: Source,
    pub phase: Phase,
}

/// A speculative status that the backend did not agree with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    pub source_id: SourceId,
    pub speculated: SourceStatus,
    pub confirmed: SourceStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobStore {
    sources: Vec<SourceEntry>,
    contract_tasks: Vec<ContractTask>,
}

impl JobStore {
    pub fn list_sources(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter().map(|entry| &entry.source)
    }

    #[must_use]
    pub fn source_entries(&self) -> &[SourceEntry] {
        &self.sources
    }

    #[must_use]
    pub fn source(&self, id: &str) -> Option<&Source> {
        self.list_sources().find(|s| s.id == id)
    }

    #[must_use]
    pub fn list_contract_tasks(&self) -> &[ContractTask] {
        &self.contract_tasks
    }

    /// `true` while any source is being crawled, confirmed or guessed.
    #[must_use]
    pub fn any_processing(&self) -> bool {
        self.list_sources().any(|s| s.status.is_processing())
    }

    /// Overwrites every source with backend truth.
    ///
    /// Returns the speculative entries whose guessed status the backend
    /// contradicted. The backend value always wins; nothing is rolled back.
    pub fn replace_sources(&mut self, sources: Vec<Source>) -> Vec<Divergence> {
        let divergences = sources
            .iter()
            .filter_map(|fresh| {
                let previous = self.sources.iter().find(|e| e.source.id == fresh.id)?;
                match previous.phase {
                    Phase::Speculative { .. } if previous.source.status != fresh.status => {
                        Some(Divergence {
                            source_id: fresh.id.clone(),
                            speculated: previous.source.status,
                            confirmed: fresh.status,
                        })
                    }
                    _ => None,
                }
            })
            .collect();

        self.sources = sources
            .into_iter()
            .map(|source| SourceEntry {
                source,
                phase: Phase::Confirmed,
            })
            .collect();
        divergences
    }

    pub fn replace_contract_tasks(&mut self, tasks: Vec<ContractTask>) {
        self.contract_tasks = tasks;
    }

    /// Flips one source's status locally. Returns `false` when the source is
    /// not in the store.
    pub fn upsert_source_status(&mut self, id: &str, status: SourceStatus) -> bool {
        let Some(entry) = self.sources.iter_mut().find(|e| e.source.id == id) else {
            return false;
        };
        let confirmed_status = match entry.phase {
            Phase::Confirmed => entry.source.status,
            Phase::Speculative { confirmed_status } => confirmed_status,
        };
        entry.source.status = status;
        entry.phase = Phase::Speculative { confirmed_status };
        true
    }

    pub fn remove_source(&mut self, id: &str) -> Option<Source> {
        let index = self.sources.iter().position(|e| e.source.id == id)?;
        Some(self.sources.remove(index).source)
    }

    pub fn remove_contract_task(&mut self, id: &str) -> Option<ContractTask> {
        let index = self
            .contract_tasks
            .iter()
            .position(|t| t.id.as_deref() == Some(id))?;
        Some(self.contract_tasks.remove(index))
    }
}
