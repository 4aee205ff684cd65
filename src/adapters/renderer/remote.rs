//! HTTP rendering-service adapter
//!
//! Drives a document rendering service over a small REST protocol:
//!
//! | Step | Request |
//! |------|---------|
//! | load | `POST /documents` (multipart `file`) → `{documentId, loaded}` |
//! | readiness | `GET /documents/{id}/status` → `{loaded, error?}` |
//! | import overlay | `POST /documents/{id}/annotations/import` (XFDF body) |
//! | export overlay state | `GET /documents/{id}/annotations/export` → XFDF |
//! | serialize | `POST /documents/{id}/file` `{xfdf}` → document bytes |
//! | release | `DELETE /documents/{id}` |

use super::{DocumentRenderer, RenderedDocument};
use crate::config::{RendererConfig, SecretString};
use crate::domain::{GeodocError, MergeError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const LICENSE_HEADER: &str = "X-License-Key";

/// Rendering service client
pub struct RemoteRenderer {
    session: Arc<Session>,
}

struct Session {
    client: Client,
    base_url: String,
    license_key: Option<SecretString>,
    poll_interval: Duration,
}

impl Session {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.license_key {
            Some(key) => {
                let value: &str = key.expose_secret().as_ref();
                request.header(LICENSE_HEADER, value)
            }
            None => request,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenResponse {
    document_id: String,
    #[serde(default)]
    loaded: bool,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    loaded: bool,
    #[serde(default)]
    error: Option<String>,
}

impl RemoteRenderer {
    /// Create a new rendering service client
    ///
    /// # Errors
    ///
    /// Returns [`GeodocError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &RendererConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            GeodocError::Configuration(format!("Failed to build renderer HTTP client: {e}"))
        })?;

        Ok(Self {
            session: Arc::new(Session {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                license_key: config.license_key.clone(),
                poll_interval: Duration::from_millis(config.poll_interval_ms),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.session.base_url
    }
}

#[async_trait]
impl DocumentRenderer for RemoteRenderer {
    async fn open(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> std::result::Result<Box<dyn RenderedDocument>, MergeError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| MergeError::Renderer(e.to_string()))?;
        let form = Form::new().part("file", part);

        let request = self
            .session
            .authorize(self.session.client.post(self.session.url("/documents")))
            .multipart(form);

        let response = request.send().await.map_err(transport)?;
        let response = ensure_success(response, MergeError::LoadFailed).await?;
        let opened: OpenResponse = response
            .json()
            .await
            .map_err(|e| MergeError::LoadFailed(format!("invalid open response: {e}")))?;

        tracing::debug!(
            document_id = %opened.document_id,
            file_name = %file_name,
            loaded = opened.loaded,
            "Document opened in rendering service"
        );

        Ok(Box::new(RemoteDocument {
            session: Arc::clone(&self.session),
            document_id: opened.document_id,
            loaded: opened.loaded,
            imported: 0,
            closed: false,
        }))
    }

    fn name(&self) -> &str {
        "remote"
    }
}

/// Handle to a document held by the rendering service
pub struct RemoteDocument {
    session: Arc<Session>,
    document_id: String,
    loaded: bool,
    imported: usize,
    closed: bool,
}

impl RemoteDocument {
    fn path(&self, suffix: &str) -> String {
        self.session
            .url(&format!("/documents/{}{suffix}", self.document_id))
    }
}

#[async_trait]
impl RenderedDocument for RemoteDocument {
    async fn wait_until_loaded(&mut self) -> std::result::Result<(), MergeError> {
        while !self.loaded {
            let request = self
                .session
                .authorize(self.session.client.get(self.path("/status")));
            let response = request.send().await.map_err(transport)?;
            let response = ensure_success(response, MergeError::LoadFailed).await?;
            let status: StatusResponse = response
                .json()
                .await
                .map_err(|e| MergeError::LoadFailed(format!("invalid status response: {e}")))?;

            if let Some(error) = status.error {
                return Err(MergeError::LoadFailed(error));
            }
            if status.loaded {
                self.loaded = true;
            } else {
                tokio::time::sleep(self.session.poll_interval).await;
            }
        }
        Ok(())
    }

    async fn import_overlay(&mut self, markup: &str) -> std::result::Result<(), MergeError> {
        let index = self.imported;
        let request = self
            .session
            .authorize(self.session.client.post(self.path("/annotations/import")))
            .header(reqwest::header::CONTENT_TYPE, "application/vnd.adobe.xfdf")
            .body(markup.to_string());

        let response = request.send().await.map_err(transport)?;
        ensure_success(response, |reason| MergeError::ImportFailed { index, reason }).await?;

        self.imported += 1;
        Ok(())
    }

    async fn export_overlay_state(&mut self) -> std::result::Result<String, MergeError> {
        let request = self
            .session
            .authorize(self.session.client.get(self.path("/annotations/export")));
        let response = request.send().await.map_err(transport)?;
        let response = ensure_success(response, MergeError::ExportFailed).await?;
        response
            .text()
            .await
            .map_err(|e| MergeError::ExportFailed(e.to_string()))
    }

    async fn serialize(&mut self, overlay_state: &str) -> std::result::Result<Vec<u8>, MergeError> {
        let request = self
            .session
            .authorize(self.session.client.post(self.path("/file")))
            .json(&serde_json::json!({ "xfdf": overlay_state }));
        let response = request.send().await.map_err(transport)?;
        let response = ensure_success(response, MergeError::SerializeFailed).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MergeError::SerializeFailed(e.to_string()))?;

        if bytes.is_empty() {
            return Err(MergeError::SerializeFailed(
                "rendering service returned an empty document".to_string(),
            ));
        }
        Ok(bytes.to_vec())
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let request = self
            .session
            .authorize(self.session.client.delete(self.path("")));
        match request.send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(document_id = %self.document_id, "Document closed");
            }
            Ok(response) => {
                tracing::warn!(
                    document_id = %self.document_id,
                    status = response.status().as_u16(),
                    "Rendering service refused to close document"
                );
            }
            Err(e) => {
                tracing::warn!(
                    document_id = %self.document_id,
                    error = %e,
                    "Failed to close document"
                );
            }
        }
    }
}

fn transport(err: reqwest::Error) -> MergeError {
    MergeError::Renderer(err.to_string())
}

async fn ensure_success<F>(
    response: Response,
    classify: F,
) -> std::result::Result<Response, MergeError>
where
    F: FnOnce(String) -> MergeError,
{
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify(format!("status {status}: {body}")))
}
