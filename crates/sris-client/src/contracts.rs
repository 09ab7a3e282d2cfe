//! Contract analysis endpoints.

use reqwest::multipart::{Form, Part};
use sris_core::{ContractResult, ContractTask, UploadReceipt};

use crate::client::ApiClient;
use crate::error::ClientError;

impl ApiClient {
    /// Uploads a document for analysis (`POST /api/contract/upload`, multipart
    /// field `file`). Uses the longer upload timeout.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or timeout.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body lacks `task_id`.
    pub async fn upload_contract(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ClientError> {
        let url = self.endpoint(&["api", "contract", "upload"]);
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_owned()));
        let request = self
            .client
            .post(url.clone())
            .timeout(self.upload_timeout)
            .multipart(form);
        self.send_json(request, &url, "contract/upload").await
    }

    /// Fetches a task and its risk findings (`GET /api/contract/{id}/result`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the task or a risk is malformed.
    pub async fn contract_result(&self, task_id: &str) -> Result<ContractResult, ClientError> {
        let url = self.endpoint(&["api", "contract", task_id, "result"]);
        self.send_json(self.client.get(url.clone()), &url, "contract/result")
            .await
    }

    /// Lists contract task summaries, newest first (`GET /api/contract/list`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if any summary is malformed.
    pub async fn list_contract_tasks(&self) -> Result<Vec<ContractTask>, ClientError> {
        let url = self.endpoint(&["api", "contract", "list"]);
        self.send_json(self.client.get(url.clone()), &url, "contract/list")
            .await
    }

    /// Deletes a task and its risks (`DELETE /api/contract/{id}`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    pub async fn delete_contract_task(&self, task_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "contract", task_id]);
        self.send_ok(self.client.delete(url.clone()), &url).await
    }
}
