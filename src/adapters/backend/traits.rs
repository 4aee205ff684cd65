//! Export backend abstraction traits
//!
//! The pipeline only sees these traits. [`super::BackendClient`] implements
//! all three over HTTP; tests substitute in-memory fakes.

use crate::core::status::Notification;
use crate::domain::{BackendError, ExportForm, ExportPayload, OutputPath, UploadError};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Backend job endpoints
#[async_trait]
pub trait ExportBackend: Send + Sync {
    /// Start the streaming export job (`POST /download`)
    ///
    /// Returns once the backend accepted the job; progress arrives on the
    /// notification stream.
    async fn trigger_download(&self, form: &ExportForm) -> Result<(), BackendError>;

    /// Fetch every record the form selects in one payload (`POST /fetch-all-data`)
    async fn fetch_all_data(&self, form: &ExportForm) -> Result<ExportPayload, BackendError>;
}

/// Persists merged documents
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload one merged document (`POST /upload`)
    ///
    /// Never retried: the caller aborts the batch on any error.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        output_path: &OutputPath,
        display_name: &str,
        custom_path: &str,
    ) -> Result<(), UploadError>;
}

/// Delivers backend job notifications
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Forward notifications into `tx` until the stream ends or the receiver
    /// is dropped
    ///
    /// Malformed notifications are logged and skipped.
    async fn subscribe(&self, tx: mpsc::Sender<Notification>) -> Result<(), BackendError>;
}
