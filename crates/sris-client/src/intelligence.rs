//! Intelligence item endpoints.

use reqwest::StatusCode;
use sris_core::{AddSourceReceipt, BatchDeleteReceipt, IntelligenceItem, ItemId};

use crate::client::ApiClient;
use crate::error::ClientError;

impl ApiClient {
    /// Lists all intelligence items, newest first (`GET /api/intelligence/list`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if any item is malformed.
    pub async fn list_intelligence(&self) -> Result<Vec<IntelligenceItem>, ClientError> {
        let url = self.endpoint(&["api", "intelligence", "list"]);
        self.send_json(self.client.get(url.clone()), &url, "intelligence/list")
            .await
    }

    /// Registers a new source by URL and starts ingestion in the background
    /// (`POST /api/intelligence/source?url=`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the receipt is malformed.
    pub async fn add_source(&self, source_url: &str) -> Result<AddSourceReceipt, ClientError> {
        let url =
            self.endpoint_with_query(&["api", "intelligence", "source"], &[("url", source_url)]);
        self.send_json(self.client.post(url.clone()), &url, "intelligence/source")
            .await
    }

    /// Deletes one item (`DELETE /api/intelligence/item/{id}`). Anything but
    /// `200 OK` is a failure.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on any status other than 200.
    pub async fn delete_item(&self, item_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "intelligence", "item", item_id]);
        self.send_expecting(self.client.delete(url.clone()), &url, StatusCode::OK)
            .await
    }

    /// Deletes several items in one round-trip
    /// (`POST /api/intelligence/batch-delete` with a JSON array of ids).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the result body is not JSON.
    pub async fn batch_delete_items(
        &self,
        item_ids: &[ItemId],
    ) -> Result<BatchDeleteReceipt, ClientError> {
        let url = self.endpoint(&["api", "intelligence", "batch-delete"]);
        let request = self.client.post(url.clone()).json(item_ids);
        self.send_json(request, &url, "intelligence/batch-delete")
            .await
    }
}
