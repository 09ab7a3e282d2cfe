//! Domain types and pure logic shared by the SRIS dashboard crates.

pub mod app_config;
pub mod config;
pub mod risk;
pub mod stats;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use risk::{is_high_risk, HIGH_RISK_KEYWORDS};
pub use stats::{recompute_stats, DashboardStats};
pub use types::{
    AddSourceReceipt, BatchCrawlReceipt, BatchDeleteReceipt, ContractResult, ContractStatus,
    ContractTask, IntelligenceItem, ItemId, Risk, ServiceStatus, Source, SourceId, SourceStatus,
    TaskId, UploadReceipt, FAILED_RISK_LEVEL,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
