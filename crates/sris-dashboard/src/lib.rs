//! Job orchestration and view state for the SRIS risk dashboard.
//!
//! [`Dashboard`] is the single controller: it fetches backend collections,
//! applies optimistic updates, coordinates batch operations, and runs
//! bounded polling sessions for batch crawls and contract analysis.

mod batch;
mod contracts;
mod dashboard;
pub mod error;
mod optimistic;
pub mod poller;
mod refresh;
pub mod state;
pub mod store;

pub use batch::BatchCrawlOutcome;
pub use contracts::ContractUpload;
pub use dashboard::Dashboard;
pub use error::{Action, DashboardError};
pub use poller::{PollConfig, PollHandle, SessionOutcome, SessionState};
pub use state::{ContractView, DashboardState, ViewPhase};
pub use store::{Divergence, JobStore, Phase, SourceEntry};
