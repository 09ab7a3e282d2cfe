//! Contract upload, result viewing and history management.

use std::sync::Arc;

use async_trait::async_trait;
use sris_client::IntelApi;
use sris_core::TaskId;
use tokio::sync::RwLock;

use crate::dashboard::Dashboard;
use crate::error::{Action, DashboardError};
use crate::optimistic;
use crate::poller::{spawn_session, PollHandle, PollTarget, SessionOutcome, SessionState};
use crate::refresh::reconcile_contract_tasks;
use crate::state::{ContractView, DashboardState};

/// Result of [`Dashboard::upload_contract`].
#[derive(Debug)]
pub struct ContractUpload {
    pub view: ContractView,
    /// Present when the backend was still analysing after the follow-up
    /// fetch and a polling session was started for the result.
    pub session: Option<PollHandle>,
}

/// Polls one task's result until it leaves `processing`.
struct AnalysisProgress<A: IntelApi> {
    api: Arc<A>,
    state: Arc<RwLock<DashboardState>>,
    task_id: TaskId,
}

#[async_trait]
impl<A: IntelApi> PollTarget for AnalysisProgress<A> {
    fn name(&self) -> &'static str {
        "contract-analysis"
    }

    async fn tick(&self) -> bool {
        let result = match self.api.contract_result(&self.task_id).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    task_id = %self.task_id,
                    error = %e,
                    "contract result fetch failed"
                );
                return false;
            }
        };
        let done = !result.task.is_processing();
        let mut state = self.state.write().await;
        // Only refresh the pane if the user is still looking at this task.
        if state
            .contract
            .as_ref()
            .is_some_and(|view| view.shows(&self.task_id))
        {
            state.contract = Some(ContractView::confirmed(result.task, result.risks));
        }
        done
    }

    async fn on_finish(&self, outcome: SessionOutcome) {
        self.state.write().await.contract_session = outcome.state();
        if matches!(outcome, SessionOutcome::Completed { .. }) {
            reconcile_contract_tasks(&*self.api, &self.state).await;
        }
    }

    async fn on_timeout(&self) {
        reconcile_contract_tasks(&*self.api, &self.state).await;
    }
}

impl<A: IntelApi> Dashboard<A> {
    /// Uploads a document for analysis and opens its result.
    ///
    /// A processing placeholder is shown while the upload runs. The result is
    /// fetched once; if it is still processing, a polling session follows it
    /// unless one is already running.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the upload or the follow-up
    /// result fetch fails. The placeholder is then marked failed with the
    /// `"Error"` risk level and contract history is re-fetched.
    pub async fn upload_contract(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ContractUpload, DashboardError> {
        optimistic::begin_upload(&mut *self.state.write().await, filename);
        tracing::info!(filename, size = bytes.len(), "uploading contract");

        let result = match self.api.upload_contract(filename, bytes).await {
            Ok(receipt) => self.api.contract_result(&receipt.task_id).await,
            Err(e) => Err(e),
        };
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                optimistic::fail_upload(&mut *self.state.write().await, filename);
                reconcile_contract_tasks(&*self.api, &self.state).await;
                return Err(DashboardError::action(Action::UploadContract, e));
            }
        };

        let view = ContractView::confirmed(result.task, result.risks);
        self.state.write().await.contract = Some(view.clone());
        reconcile_contract_tasks(&*self.api, &self.state).await;

        let session = match view.task.id.clone() {
            Some(task_id) if view.task.is_processing() => self.follow_analysis(task_id).await,
            _ => None,
        };
        Ok(ContractUpload { view, session })
    }

    async fn follow_analysis(&self, task_id: TaskId) -> Option<PollHandle> {
        let Some(guard) = self.contract_flag.try_acquire() else {
            tracing::info!(%task_id, "contract analysis already polling, not following");
            return None;
        };
        self.state.write().await.contract_session = SessionState::Active;
        let target = AnalysisProgress {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            task_id,
        };
        Some(spawn_session(target, self.poll, guard))
    }

    /// Opens a task's analysis, replacing any previously shown risks.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the result cannot be fetched.
    pub async fn view_contract_result(
        &self,
        task_id: &str,
    ) -> Result<ContractView, DashboardError> {
        let result = self
            .api
            .contract_result(task_id)
            .await
            .map_err(|e| DashboardError::action(Action::ViewContract, e))?;
        let view = ContractView::confirmed(result.task, result.risks);
        self.state.write().await.contract = Some(view.clone());
        Ok(view)
    }

    /// Deletes a task from the history. The open analysis closes if it was
    /// that task.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Action`] if the backend rejects the delete;
    /// the history is re-fetched first.
    pub async fn delete_contract_task(&self, task_id: &str) -> Result<(), DashboardError> {
        if let Err(e) = self.api.delete_contract_task(task_id).await {
            reconcile_contract_tasks(&*self.api, &self.state).await;
            return Err(DashboardError::action(Action::DeleteContract, e));
        }

        {
            let mut state = self.state.write().await;
            state.store.remove_contract_task(task_id);
            if state.contract.as_ref().is_some_and(|view| view.shows(task_id)) {
                state.contract = None;
            }
        }
        tracing::info!(task_id, "contract record deleted");
        reconcile_contract_tasks(&*self.api, &self.state).await;
        Ok(())
    }

    /// Closes the open analysis and returns to the history list.
    pub async fn back_to_contract_list(&self) {
        self.state.write().await.contract = None;
    }
}
