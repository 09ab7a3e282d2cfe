//! Source management endpoints.

use sris_core::{BatchCrawlReceipt, Source};

use crate::client::ApiClient;
use crate::error::ClientError;

impl ApiClient {
    /// Lists all configured sources (`GET /api/source/list`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if any source is malformed or carries
    ///   an unknown status.
    pub async fn list_sources(&self) -> Result<Vec<Source>, ClientError> {
        let url = self.endpoint(&["api", "source", "list"]);
        self.send_json(self.client.get(url.clone()), &url, "source/list")
            .await
    }

    /// Deletes a source; the backend removes its items as well
    /// (`DELETE /api/source/{id}`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    pub async fn delete_source(&self, source_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "source", source_id]);
        self.send_ok(self.client.delete(url.clone()), &url).await
    }

    /// Re-triggers the crawl of one source (`POST /api/source/{id}/retry`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    pub async fn retry_source(&self, source_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "source", source_id, "retry"]);
        self.send_ok(self.client.post(url.clone()), &url).await
    }

    /// Triggers a crawl of every source not already processing
    /// (`POST /api/source/batch-crawl`). Returns how many crawls started.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body lacks `count`.
    pub async fn batch_crawl(&self) -> Result<BatchCrawlReceipt, ClientError> {
        let url = self.endpoint(&["api", "source", "batch-crawl"]);
        self.send_json(self.client.post(url.clone()), &url, "source/batch-crawl")
            .await
    }

    /// Replaces a source's URL (`PUT /api/source/{id}?url=`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    pub async fn update_source_url(
        &self,
        source_id: &str,
        new_url: &str,
    ) -> Result<(), ClientError> {
        let url = self.endpoint_with_query(&["api", "source", source_id], &[("url", new_url)]);
        self.send_ok(self.client.put(url.clone()), &url).await
    }
}
