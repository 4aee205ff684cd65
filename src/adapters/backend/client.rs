//! HTTP client for the export backend
//!
//! Implements [`ExportBackend`] and [`Uploader`] over the backend's REST
//! endpoints. Only the read-only bulk fetch is retried; the download
//! trigger starts a job and the upload writes a file, so neither is
//! repeated automatically.

use super::traits::{ExportBackend, Uploader};
use crate::config::{BackendConfig, RetryConfig};
use crate::domain::{BackendError, ExportForm, ExportPayload, GeodocError, OutputPath, Result, UploadError};
use crate::log_retry_attempt;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;

/// Export backend HTTP client
///
/// # Example
///
/// ```no_run
/// use geodoc::adapters::backend::{BackendClient, ExportBackend};
/// use geodoc::config::BackendConfig;
/// use geodoc::domain::ExportForm;
///
/// # async fn example() -> geodoc::domain::Result<()> {
/// let client = BackendClient::new(&BackendConfig::default())?;
/// let payload = client.fetch_all_data(&ExportForm::default()).await?;
/// println!("{} files", payload.geo_files.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Errors
    ///
    /// Returns [`GeodocError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            GeodocError::Configuration(format!("Failed to build backend HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Retry a request with exponential backoff
    ///
    /// Client errors and undecodable responses are returned at once.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> std::result::Result<T, BackendError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, BackendError>>,
    {
        let max_retries = self.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries || !e.is_retryable() {
                        return Err(e);
                    }

                    let delay_ms = self.retry.delay_for_attempt(attempt);
                    log_retry_attempt!(attempt, max_retries, delay_ms, e);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn post_form(&self, path: &str, form: &ExportForm) -> std::result::Result<Response, BackendError> {
        let response = self
            .client
            .post(self.url(path))
            .json(form)
            .send()
            .await
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;
        ensure_success(response).await
    }
}

#[async_trait]
impl ExportBackend for BackendClient {
    async fn trigger_download(&self, form: &ExportForm) -> std::result::Result<(), BackendError> {
        tracing::info!(
            company_id = %form.company_id,
            start_range = %form.start_range,
            end_range = %form.end_range,
            folder_view = form.is_checked,
            "Triggering export job"
        );
        self.post_form("/download", form).await?;
        Ok(())
    }

    async fn fetch_all_data(
        &self,
        form: &ExportForm,
    ) -> std::result::Result<ExportPayload, BackendError> {
        tracing::info!(
            company_id = %form.company_id,
            start_range = %form.start_range,
            end_range = %form.end_range,
            "Fetching export records"
        );

        let payload: ExportPayload = self
            .retry_request(|| async {
                let response = self.post_form("/fetch-all-data", form).await?;
                response
                    .json()
                    .await
                    .map_err(|e| BackendError::InvalidResponse(e.to_string()))
            })
            .await?;

        tracing::info!(
            projects = payload.geo_projects.len(),
            files = payload.geo_files.len(),
            estimates = payload.geo_estimates.len(),
            annotations = payload.geo_annotations.len(),
            "Export records fetched"
        );
        Ok(payload)
    }
}

#[async_trait]
impl Uploader for BackendClient {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        output_path: &OutputPath,
        display_name: &str,
        custom_path: &str,
    ) -> std::result::Result<(), UploadError> {
        let part = Part::bytes(bytes)
            .file_name(display_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| UploadError::InvalidRequest(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("path", output_path.to_string())
            .text("customPath", custom_path.to_string());

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

async fn ensure_success(response: Response) -> std::result::Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(BackendError::from_status(status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_client_creation() {
        let config = BackendConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..BackendConfig::default()
        };
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/upload"), "http://localhost:5000/upload");
    }

    #[test]
    fn test_backend_client_without_tls_verify() {
        let config = BackendConfig {
            tls_verify: false,
            ..BackendConfig::default()
        };
        assert!(BackendClient::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_retry_stops_on_client_error() {
        let client = BackendClient::new(&BackendConfig::default()).unwrap();
        let calls = std::sync::atomic::AtomicUsize::new(0);

        let result: std::result::Result<(), BackendError> = client
            .retry_request(|| async {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Err(BackendError::from_status(400, "bad form"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_server_error() {
        let mut config = BackendConfig::default();
        config.retry.initial_delay_ms = 1;
        config.retry.max_delay_ms = 5;
        let client = BackendClient::new(&config).unwrap();
        let calls = std::sync::atomic::AtomicUsize::new(0);

        let result = client
            .retry_request(|| async {
                let n = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                if n == 0 {
                    Err(BackendError::from_status(503, "busy"))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 1);
    }
}
