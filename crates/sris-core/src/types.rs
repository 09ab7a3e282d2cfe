//! Wire types for the SRIS backend API.
//!
//! Every response body is decoded into one of these types at the boundary.
//! Required fields stay required: a missing `id` or an unknown status string
//! is a decode error here rather than a silently empty value downstream.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned source identifier.
pub type SourceId = String;
/// Server-assigned intelligence item identifier.
pub type ItemId = String;
/// Server-assigned contract task identifier.
pub type TaskId = String;

/// Ids arrive as UUID strings; integer ids are accepted and rendered in decimal.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Crawl status of a [`Source`].
///
/// The backend reports `active`, `inactive` and `error` for finished crawls;
/// those are folded into the client vocabulary on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    #[serde(alias = "inactive")]
    Idle,
    Processing,
    #[serde(alias = "active")]
    Done,
    #[serde(alias = "error")]
    Failed,
}

impl SourceStatus {
    #[must_use]
    pub fn is_processing(self) -> bool {
        self == Self::Processing
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured crawl target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: SourceId,
    pub url: String,
    pub status: SourceStatus,
    #[serde(default)]
    pub last_crawled_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Source {
    #[must_use]
    pub fn new(id: impl Into<SourceId>, url: impl Into<String>, status: SourceStatus) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            status,
            last_crawled_at: None,
            error_message: None,
            created_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Intelligence items
// ---------------------------------------------------------------------------

/// One ingested, backend-produced content record.
///
/// `source_id` is a lookup-only reference; the client never dereferences it
/// against the source list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ItemId,
    #[serde(deserialize_with = "deserialize_id")]
    pub source_id: SourceId,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub risk_hint: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_zh: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub risk_tags: Option<Vec<String>>,
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Overall risk level written onto a contract task whose analysis failed.
pub const FAILED_RISK_LEVEL: &str = "Error";

/// Lifecycle status of a [`ContractTask`]. The backend's `done` decodes as
/// [`ContractStatus::Completed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Processing,
    #[serde(alias = "done")]
    Completed,
    Failed,
}

impl ContractStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted document-analysis job.
///
/// `id` is `None` only on the transient record the client synthesises before
/// the upload has been acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTask {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<TaskId>,
    pub filename: String,
    pub status: ContractStatus,
    #[serde(default)]
    pub overall_risk_level: Option<String>,
    #[serde(default, alias = "upload_time")]
    pub created_at: Option<NaiveDateTime>,
}

impl ContractTask {
    /// The optimistic placeholder shown while an upload is in flight.
    #[must_use]
    pub fn transient(filename: impl Into<String>) -> Self {
        Self {
            id: None,
            filename: filename.into(),
            status: ContractStatus::Processing,
            overall_risk_level: None,
            created_at: None,
        }
    }

    /// Marks this record as failed with the `"Error"` risk level.
    #[must_use]
    pub fn into_failed(self) -> Self {
        Self {
            status: ContractStatus::Failed,
            overall_risk_level: Some(FAILED_RISK_LEVEL.to_string()),
            ..self
        }
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.status == ContractStatus::Processing
    }
}

/// One risk finding attached to a contract task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub clause_id: Option<String>,
    #[serde(default)]
    pub clause_text: Option<String>,
    #[serde(default)]
    pub risk_category: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub risk_reason: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Body of `GET /api/contract/{task_id}/result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractResult {
    pub task: ContractTask,
    #[serde(default)]
    pub risks: Vec<Risk>,
}

// ---------------------------------------------------------------------------
// Mutation receipts
// ---------------------------------------------------------------------------

/// Body of `POST /api/intelligence/source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSourceReceipt {
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub source_id: Option<SourceId>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AddSourceReceipt {
    /// The backend already tracks this URL and did not create a new source.
    #[must_use]
    pub fn already_exists(&self) -> bool {
        self.status == "exists"
    }
}

/// Body of `POST /api/source/batch-crawl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCrawlReceipt {
    pub count: u32,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/intelligence/batch-delete`. Only logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDeleteReceipt {
    #[serde(default)]
    pub count: Option<u32>,
}

/// Body of `POST /api/contract/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(deserialize_with = "deserialize_id")]
    pub task_id: TaskId,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
}
