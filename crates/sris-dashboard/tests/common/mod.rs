//! In-memory backend used by the orchestration tests.
//!
//! Time-dependent behaviour reads `tokio::time::Instant`, so tests running
//! with a paused clock control exactly when crawls and analyses finish.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use sris_client::{ClientError, IntelApi};
use sris_core::{
    AddSourceReceipt, BatchCrawlReceipt, BatchDeleteReceipt, ContractResult, ContractStatus,
    ContractTask, IntelligenceItem, ItemId, Risk, ServiceStatus, Source, SourceStatus,
    UploadReceipt,
};
use sris_dashboard::{Dashboard, PollConfig};
use tokio::time::Instant;

#[derive(Default)]
struct Backend {
    items: Vec<IntelligenceItem>,
    sources: Vec<Source>,
    tasks: Vec<ContractTask>,
    risks: HashMap<String, Vec<Risk>>,
    /// Crawls started by `batch_crawl` finish after this long. `None` never
    /// finishes.
    crawl_duration: Option<Duration>,
    crawl_done_at: Option<Instant>,
    /// Uploaded contracts stay `processing` this long.
    analysis_duration: Option<Duration>,
    analysis_done_at: HashMap<String, Instant>,
    next_id: u32,
    failing: HashSet<&'static str>,
    calls: HashMap<&'static str, usize>,
}

#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<Backend>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(self, items: Vec<IntelligenceItem>) -> Self {
        self.lock().items = items;
        self
    }

    pub fn with_sources(self, sources: Vec<Source>) -> Self {
        self.lock().sources = sources;
        self
    }

    pub fn with_tasks(self, tasks: Vec<ContractTask>) -> Self {
        self.lock().tasks = tasks;
        self
    }

    pub fn with_risks(self, task_id: &str, risks: Vec<Risk>) -> Self {
        self.lock().risks.insert(task_id.to_string(), risks);
        self
    }

    pub fn crawl_takes(self, duration: Duration) -> Self {
        self.lock().crawl_duration = Some(duration);
        self
    }

    pub fn analysis_takes(self, duration: Duration) -> Self {
        self.lock().analysis_duration = Some(duration);
        self
    }

    pub fn fail_on(&self, op: &'static str) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.lock().failing.remove(op);
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.lock().calls.get(op).copied().unwrap_or(0)
    }

    pub fn source_status(&self, id: &str) -> Option<SourceStatus> {
        self.lock()
            .sources
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.status)
    }

    fn lock(&self) -> MutexGuard<'_, Backend> {
        self.inner.lock().unwrap()
    }

    /// Records the call and fails it if the test asked for that.
    fn enter(&self, op: &'static str) -> Result<MutexGuard<'_, Backend>, ClientError> {
        let mut backend = self.lock();
        *backend.calls.entry(op).or_default() += 1;
        if backend.failing.contains(op) {
            return Err(ClientError::UnexpectedStatus {
                status: 500,
                url: format!("fake://{op}"),
            });
        }
        backend.settle();
        Ok(backend)
    }
}

impl Backend {
    fn settle(&mut self) {
        let now = Instant::now();
        if self.crawl_done_at.is_some_and(|at| now >= at) {
            self.crawl_done_at = None;
            for source in &mut self.sources {
                if source.status == SourceStatus::Processing {
                    source.status = SourceStatus::Done;
                }
            }
        }
        for task in &mut self.tasks {
            let Some(id) = task.id.as_deref() else {
                continue;
            };
            if task.status == ContractStatus::Processing
                && self.analysis_done_at.get(id).is_some_and(|at| now >= *at)
            {
                task.status = ContractStatus::Completed;
                task.overall_risk_level = Some("High".to_string());
            }
        }
    }

    fn not_found(op: &str, id: &str) -> ClientError {
        ClientError::UnexpectedStatus {
            status: 404,
            url: format!("fake://{op}/{id}"),
        }
    }
}

#[async_trait]
impl IntelApi for FakeBackend {
    async fn service_status(&self) -> Result<ServiceStatus, ClientError> {
        self.enter("service_status")?;
        Ok(ServiceStatus {
            message: "SRIS backend running".to_string(),
        })
    }

    async fn list_intelligence(&self) -> Result<Vec<IntelligenceItem>, ClientError> {
        Ok(self.enter("list_intelligence")?.items.clone())
    }

    async fn add_source(&self, url: &str) -> Result<AddSourceReceipt, ClientError> {
        let mut backend = self.enter("add_source")?;
        if let Some(existing) = backend.sources.iter().find(|s| s.url == url) {
            return Ok(AddSourceReceipt {
                status: "exists".to_string(),
                source_id: Some(existing.id.clone()),
                message: None,
            });
        }
        backend.next_id += 1;
        let id = format!("s{}", backend.next_id);
        backend
            .sources
            .push(Source::new(id.clone(), url, SourceStatus::Processing));
        Ok(AddSourceReceipt {
            status: "processing".to_string(),
            source_id: Some(id),
            message: None,
        })
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), ClientError> {
        let mut backend = self.enter("delete_item")?;
        let before = backend.items.len();
        backend.items.retain(|i| i.id != item_id);
        if backend.items.len() == before {
            return Err(Backend::not_found("delete_item", item_id));
        }
        Ok(())
    }

    async fn batch_delete_items(
        &self,
        item_ids: &[ItemId],
    ) -> Result<BatchDeleteReceipt, ClientError> {
        let mut backend = self.enter("batch_delete_items")?;
        let before = backend.items.len();
        backend.items.retain(|i| !item_ids.contains(&i.id));
        let deleted = u32::try_from(before - backend.items.len()).unwrap();
        Ok(BatchDeleteReceipt {
            count: Some(deleted),
        })
    }

    async fn list_sources(&self) -> Result<Vec<Source>, ClientError> {
        Ok(self.enter("list_sources")?.sources.clone())
    }

    async fn delete_source(&self, source_id: &str) -> Result<(), ClientError> {
        let mut backend = self.enter("delete_source")?;
        let before = backend.sources.len();
        backend.sources.retain(|s| s.id != source_id);
        if backend.sources.len() == before {
            return Err(Backend::not_found("delete_source", source_id));
        }
        backend.items.retain(|i| i.source_id != source_id);
        Ok(())
    }

    async fn retry_source(&self, source_id: &str) -> Result<(), ClientError> {
        let mut backend = self.enter("retry_source")?;
        let source = backend
            .sources
            .iter_mut()
            .find(|s| s.id == source_id)
            .ok_or_else(|| Backend::not_found("retry_source", source_id))?;
        source.status = SourceStatus::Processing;
        Ok(())
    }

    async fn batch_crawl(&self) -> Result<BatchCrawlReceipt, ClientError> {
        let mut backend = self.enter("batch_crawl")?;
        let mut count = 0;
        for source in &mut backend.sources {
            if source.status != SourceStatus::Processing {
                source.status = SourceStatus::Processing;
                count += 1;
            }
        }
        if count > 0 {
            backend.crawl_done_at = backend.crawl_duration.map(|d| Instant::now() + d);
        }
        Ok(BatchCrawlReceipt {
            count,
            message: None,
        })
    }

    async fn update_source_url(&self, source_id: &str, url: &str) -> Result<(), ClientError> {
        let mut backend = self.enter("update_source_url")?;
        let source = backend
            .sources
            .iter_mut()
            .find(|s| s.id == source_id)
            .ok_or_else(|| Backend::not_found("update_source_url", source_id))?;
        source.url = url.to_string();
        Ok(())
    }

    async fn upload_contract(
        &self,
        filename: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ClientError> {
        let mut backend = self.enter("upload_contract")?;
        backend.next_id += 1;
        let task_id = format!("t{}", backend.next_id);
        let mut task = ContractTask {
            id: Some(task_id.clone()),
            ..ContractTask::transient(filename)
        };
        let analysis_duration = backend.analysis_duration;
        match analysis_duration {
            Some(d) => {
                backend
                    .analysis_done_at
                    .insert(task_id.clone(), Instant::now() + d);
            }
            None => {
                task.status = ContractStatus::Completed;
                task.overall_risk_level = Some("Medium".to_string());
            }
        }
        backend.risks.entry(task_id.clone()).or_insert_with(|| {
            vec![Risk {
                risk_level: Some("Medium".to_string()),
                clause_text: Some(format!("clause from {filename}")),
                ..Risk::default()
            }]
        });
        backend.tasks.insert(0, task);
        Ok(UploadReceipt { task_id })
    }

    async fn contract_result(&self, task_id: &str) -> Result<ContractResult, ClientError> {
        let backend = self.enter("contract_result")?;
        let task = backend
            .tasks
            .iter()
            .find(|t| t.id.as_deref() == Some(task_id))
            .cloned()
            .ok_or_else(|| Backend::not_found("contract_result", task_id))?;
        let risks = backend.risks.get(task_id).cloned().unwrap_or_default();
        Ok(ContractResult { task, risks })
    }

    async fn list_contract_tasks(&self) -> Result<Vec<ContractTask>, ClientError> {
        Ok(self.enter("list_contract_tasks")?.tasks.clone())
    }

    async fn delete_contract_task(&self, task_id: &str) -> Result<(), ClientError> {
        let mut backend = self.enter("delete_contract_task")?;
        let before = backend.tasks.len();
        backend.tasks.retain(|t| t.id.as_deref() != Some(task_id));
        if backend.tasks.len() == before {
            return Err(Backend::not_found("delete_contract_task", task_id));
        }
        Ok(())
    }
}

pub const TICK: Duration = Duration::from_secs(5);
pub const CEILING: Duration = Duration::from_secs(300);

pub fn dashboard(backend: &Arc<FakeBackend>) -> Dashboard<FakeBackend> {
    Dashboard::new(
        Arc::clone(backend),
        PollConfig {
            interval: TICK,
            timeout: CEILING,
        },
    )
}

pub fn item(id: &str, source_id: &str, risk_hint: &str) -> IntelligenceItem {
    IntelligenceItem {
        id: id.to_string(),
        source_id: source_id.to_string(),
        risk_hint: Some(risk_hint.to_string()),
        ..IntelligenceItem::default()
    }
}

pub fn source(id: &str, status: SourceStatus) -> Source {
    Source::new(id, format!("https://{id}.example.com/feed"), status)
}

pub fn task(id: &str, filename: &str, status: ContractStatus) -> ContractTask {
    ContractTask {
        id: Some(id.to_string()),
        filename: filename.to_string(),
        status,
        overall_risk_level: None,
        created_at: None,
    }
}
