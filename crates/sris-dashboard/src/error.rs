use sris_client::ClientError;
use thiserror::Error;

/// A user-initiated dashboard action, named in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadItems,
    LoadSources,
    LoadContracts,
    AddSource,
    DeleteSource,
    RetrySource,
    EditSource,
    BatchCrawl,
    DeleteItem,
    BatchDelete,
    UploadContract,
    ViewContract,
    DeleteContract,
    Ping,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::LoadItems => "load intelligence items",
            Action::LoadSources => "load sources",
            Action::LoadContracts => "load contract history",
            Action::AddSource => "add source",
            Action::DeleteSource => "delete source",
            Action::RetrySource => "retry source crawl",
            Action::EditSource => "update source URL",
            Action::BatchCrawl => "start batch crawl",
            Action::DeleteItem => "delete intelligence item",
            Action::BatchDelete => "delete selected items",
            Action::UploadContract => "analyse contract",
            Action::ViewContract => "load contract result",
            Action::DeleteContract => "delete contract record",
            Action::Ping => "reach the backend",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by dashboard operations.
///
/// `Display` names the failed action only; the client error stays reachable
/// through [`std::error::Error::source`] for logs.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to {action}")]
    Action {
        action: Action,
        #[source]
        source: ClientError,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("polling session ended abnormally: {0}")]
    SessionJoin(#[from] tokio::task::JoinError),
}

impl DashboardError {
    pub(crate) fn action(action: Action, source: ClientError) -> Self {
        tracing::warn!(%action, error = %source, "dashboard action failed");
        Self::Action { action, source }
    }

    /// The action that failed, if this error came from a backend call.
    #[must_use]
    pub fn failed_action(&self) -> Option<Action> {
        match self {
            Self::Action { action, .. } => Some(*action),
            _ => None,
        }
    }
}
