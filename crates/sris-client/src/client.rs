//! HTTP client for the SRIS backend REST API.
//!
//! Wraps `reqwest` with typed response decoding and status checking. Endpoint
//! methods live in the sibling `intelligence`, `sources` and `contracts`
//! modules; this module owns construction, URL building and the shared
//! request helpers.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use sris_core::{AppConfig, ServiceStatus};

use crate::error::ClientError;

/// Client for the SRIS REST API.
///
/// Use [`ApiClient::new`] with a loaded [`AppConfig`], or
/// [`ApiClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) upload_timeout: Duration,
}

impl ApiClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if the base URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            config.upload_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with an explicit base URL and timeouts.
    ///
    /// `upload_timeout_secs` applies only to contract uploads, which block
    /// until the backend has finished analysing the document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `base_url` is not a usable
    /// http(s) URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        upload_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so path segments append below any prefix.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "expected an http(s) URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            upload_timeout: Duration::from_secs(upload_timeout_secs),
        })
    }

    /// Checks that the backend is up (`GET /`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not the expected shape.
    pub async fn service_status(&self) -> Result<ServiceStatus, ClientError> {
        let url = self.endpoint(&[]);
        self.send_json(self.client.get(url.clone()), &url, "GET /")
            .await
    }

    /// Builds an endpoint URL from percent-encoded path segments.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if segments.is_empty() {
            return url;
        }
        // Infallible: `with_base_url` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Builds an endpoint URL and appends percent-encoded query parameters.
    pub(crate) fn endpoint_with_query(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint(segments);
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a request, requires a 2xx status, and decodes the body as `T`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body does not decode as `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        context: &str,
    ) -> Result<T, ClientError> {
        tracing::debug!(%url, "sris request");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Sends a request and requires a 2xx status; the body is ignored.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    pub(crate) async fn send_ok(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<(), ClientError> {
        tracing::debug!(%url, "sris request");
        let status = request.send().await?.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }

    /// Sends a request and requires exactly `expected`; the body is ignored.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] if the status is not `expected`.
    pub(crate) async fn send_expecting(
        &self,
        request: RequestBuilder,
        url: &Url,
        expected: StatusCode,
    ) -> Result<(), ClientError> {
        tracing::debug!(%url, "sris request");
        let response = request.send().await?;
        let status = response.status();
        if status != expected {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
