//! The [`IntelApi`] seam between the dashboard core and the backend.
//!
//! The dashboard is generic over this trait so its orchestration can run
//! against [`ApiClient`] in production and an in-memory backend in tests.

use async_trait::async_trait;
use sris_core::{
    AddSourceReceipt, BatchCrawlReceipt, BatchDeleteReceipt, ContractResult, ContractTask,
    IntelligenceItem, ItemId, ServiceStatus, Source, UploadReceipt,
};

use crate::client::ApiClient;
use crate::error::ClientError;

/// Every backend operation the dashboard consumes.
#[async_trait]
pub trait IntelApi: Send + Sync + 'static {
    async fn service_status(&self) -> Result<ServiceStatus, ClientError>;

    async fn list_intelligence(&self) -> Result<Vec<IntelligenceItem>, ClientError>;
    async fn add_source(&self, url: &str) -> Result<AddSourceReceipt, ClientError>;
    async fn delete_item(&self, item_id: &str) -> Result<(), ClientError>;
    async fn batch_delete_items(
        &self,
        item_ids: &[ItemId],
    ) -> Result<BatchDeleteReceipt, ClientError>;

    async fn list_sources(&self) -> Result<Vec<Source>, ClientError>;
    async fn delete_source(&self, source_id: &str) -> Result<(), ClientError>;
    async fn retry_source(&self, source_id: &str) -> Result<(), ClientError>;
    async fn batch_crawl(&self) -> Result<BatchCrawlReceipt, ClientError>;
    async fn update_source_url(&self, source_id: &str, url: &str) -> Result<(), ClientError>;

    async fn upload_contract(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ClientError>;
    async fn contract_result(&self, task_id: &str) -> Result<ContractResult, ClientError>;
    async fn list_contract_tasks(&self) -> Result<Vec<ContractTask>, ClientError>;
    async fn delete_contract_task(&self, task_id: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl IntelApi for ApiClient {
    async fn service_status(&self) -> Result<ServiceStatus, ClientError> {
        ApiClient::service_status(self).await
    }

    async fn list_intelligence(&self) -> Result<Vec<IntelligenceItem>, ClientError> {
        ApiClient::list_intelligence(self).await
    }

    async fn add_source(&self, url: &str) -> Result<AddSourceReceipt, ClientError> {
        ApiClient::add_source(self, url).await
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), ClientError> {
        ApiClient::delete_item(self, item_id).await
    }

    async fn batch_delete_items(
        &self,
        item_ids: &[ItemId],
    ) -> Result<BatchDeleteReceipt, ClientError> {
        ApiClient::batch_delete_items(self, item_ids).await
    }

    async fn list_sources(&self) -> Result<Vec<Source>, ClientError> {
        ApiClient::list_sources(self).await
    }

    async fn delete_source(&self, source_id: &str) -> Result<(), ClientError> {
        ApiClient::delete_source(self, source_id).await
    }

    async fn retry_source(&self, source_id: &str) -> Result<(), ClientError> {
        ApiClient::retry_source(self, source_id).await
    }

    async fn batch_crawl(&self) -> Result<BatchCrawlReceipt, ClientError> {
        ApiClient::batch_crawl(self).await
    }

    async fn update_source_url(&self, source_id: &str, url: &str) -> Result<(), ClientError> {
        ApiClient::update_source_url(self, source_id, url).await
    }

    async fn upload_contract(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ClientError> {
        ApiClient::upload_contract(self, filename, bytes).await
    }

    async fn contract_result(&self, task_id: &str) -> Result<ContractResult, ClientError> {
        ApiClient::contract_result(self, task_id).await
    }

    async fn list_contract_tasks(&self) -> Result<Vec<ContractTask>, ClientError> {
        ApiClient::list_contract_tasks(self).await
    }

    async fn delete_contract_task(&self, task_id: &str) -> Result<(), ClientError> {
        ApiClient::delete_contract_task(self, task_id).await
    }
}
