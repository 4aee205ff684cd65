//! Shared fixtures and in-memory fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use geodoc::adapters::backend::{ExportBackend, NotificationSource, Uploader};
use geodoc::adapters::renderer::{DocumentRenderer, RenderedDocument};
use geodoc::core::status::Notification;
use geodoc::domain::{
    Annotation, BackendError, DocumentContent, Estimate, EstimateId, ExportForm, ExportPayload,
    FileId, FileRecord, MergeError, OutputPath, Project, ProjectId, UploadError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

pub fn form() -> ExportForm {
    ExportForm {
        company_id: "9".to_string(),
        custom_path: "D:/exports".to_string(),
        start_range: "1".to_string(),
        end_range: "50".to_string(),
        is_checked: false,
    }
}

pub fn project(id: i64) -> Project {
    Project {
        id: ProjectId::new(id),
        company_id: Some("9".to_string()),
    }
}

pub fn estimate(id: i64, project_id: i64) -> Estimate {
    Estimate {
        id: EstimateId::new(id),
        geo_project_id: ProjectId::new(project_id),
    }
}

pub fn file(id: i64, project_id: i64, name: &str) -> FileRecord {
    FileRecord {
        id: FileId::new(id),
        geo_project_id: ProjectId::new(project_id),
        name: name.to_string(),
        document: Some(DocumentContent::from_bytes(format!("PDF:{name}").as_bytes())),
    }
}

pub fn empty_file(id: i64, project_id: i64, name: &str) -> FileRecord {
    FileRecord {
        document: None,
        ..file(id, project_id, name)
    }
}

pub fn annotation(estimate_id: i64, file_id: i64, markup: &str) -> Annotation {
    Annotation {
        geo_estimate_id: EstimateId::new(estimate_id),
        file_id: FileId::new(file_id),
        overlay_markup: markup.to_string(),
    }
}

/// Renderer whose serialized output is `<original bytes>+<overlays joined by |>`
#[derive(Default)]
pub struct FakeRenderer {
    pub events: Arc<Mutex<Vec<String>>>,
    /// Documents currently open
    pub open_documents: Arc<AtomicUsize>,
    /// Documents with this name fail to load
    pub fail_loading: Option<String>,
}

struct FakeDocument {
    name: String,
    original: Vec<u8>,
    overlays: Vec<String>,
    events: Arc<Mutex<Vec<String>>>,
    open_documents: Arc<AtomicUsize>,
    fail_loading: bool,
}

#[async_trait]
impl DocumentRenderer for FakeRenderer {
    async fn open(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<Box<dyn RenderedDocument>, MergeError> {
        self.open_documents.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(format!("open {file_name}"));
        Ok(Box::new(FakeDocument {
            name: file_name.to_string(),
            original: bytes,
            overlays: Vec::new(),
            events: Arc::clone(&self.events),
            open_documents: Arc::clone(&self.open_documents),
            fail_loading: self.fail_loading.as_deref() == Some(file_name),
        }))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[async_trait]
impl RenderedDocument for FakeDocument {
    async fn wait_until_loaded(&mut self) -> Result<(), MergeError> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        if self.fail_loading {
            return Err(MergeError::LoadFailed(format!("{} is corrupt", self.name)));
        }
        Ok(())
    }

    async fn import_overlay(&mut self, markup: &str) -> Result<(), MergeError> {
        self.overlays.push(markup.to_string());
        Ok(())
    }

    async fn export_overlay_state(&mut self) -> Result<String, MergeError> {
        Ok(self.overlays.join("|"))
    }

    async fn serialize(&mut self, overlay_state: &str) -> Result<Vec<u8>, MergeError> {
        let mut out = self.original.clone();
        out.push(b'+');
        out.extend_from_slice(overlay_state.as_bytes());
        Ok(out)
    }

    async fn close(&mut self) {
        self.open_documents.fetch_sub(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(format!("close {}", self.name));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub path: String,
    pub display_name: String,
    pub custom_path: String,
    pub bytes: Vec<u8>,
}

/// Uploader that records uploads and checks the one-in-flight discipline
#[derive(Default)]
pub struct RecordingUploader {
    pub uploads: Mutex<Vec<Upload>>,
    /// Shared with the renderer; must be zero while uploading
    pub open_documents: Arc<AtomicUsize>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    /// The upload with this index (0-based) is rejected with status 500
    pub fail_at: Option<usize>,
    /// Raise the shutdown flag once this many uploads completed
    pub shutdown_after: Option<(usize, watch::Sender<bool>)>,
}

impl RecordingUploader {
    pub fn paths(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.path.clone())
            .collect()
    }
}

#[async_trait]
impl Uploader for RecordingUploader {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        output_path: &OutputPath,
        display_name: &str,
        custom_path: &str,
    ) -> Result<(), UploadError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        assert_eq!(
            self.open_documents.load(Ordering::SeqCst),
            0,
            "document handle still open during upload"
        );

        tokio::time::sleep(Duration::from_millis(1)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let index = self.uploads.lock().unwrap().len();
        if self.fail_at == Some(index) {
            return Err(UploadError::Status {
                status: 500,
                message: "disk full".to_string(),
            });
        }

        self.uploads.lock().unwrap().push(Upload {
            path: output_path.to_string(),
            display_name: display_name.to_string(),
            custom_path: custom_path.to_string(),
            bytes,
        });

        if let Some((after, tx)) = &self.shutdown_after {
            if self.uploads.lock().unwrap().len() == *after {
                let _ = tx.send(true);
            }
        }
        Ok(())
    }
}

/// Backend serving a fixed payload
#[derive(Default)]
pub struct FakeBackend {
    pub payload: ExportPayload,
    pub reject_trigger: bool,
    pub unreachable: bool,
    pub triggered: AtomicUsize,
    pub fetched: AtomicUsize,
}

#[async_trait]
impl ExportBackend for FakeBackend {
    async fn trigger_download(&self, _form: &ExportForm) -> Result<(), BackendError> {
        self.triggered.fetch_add(1, Ordering::SeqCst);
        if self.reject_trigger {
            return Err(BackendError::from_status(500, "job could not start"));
        }
        Ok(())
    }

    async fn fetch_all_data(&self, _form: &ExportForm) -> Result<ExportPayload, BackendError> {
        self.fetched.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(BackendError::ConnectionFailed("connection refused".to_string()));
        }
        Ok(self.payload.clone())
    }
}

/// Notification source replaying a fixed script, then closing
#[derive(Default)]
pub struct ScriptedNotifications {
    pub script: Vec<Notification>,
    pub gap: Duration,
}

impl ScriptedNotifications {
    pub fn new(script: Vec<Notification>) -> Self {
        Self {
            script,
            gap: Duration::from_millis(1),
        }
    }
}

#[async_trait]
impl NotificationSource for ScriptedNotifications {
    async fn subscribe(&self, tx: mpsc::Sender<Notification>) -> Result<(), BackendError> {
        for notification in &self.script {
            tokio::time::sleep(self.gap).await;
            if tx.send(notification.clone()).await.is_err() {
                break;
            }
        }
        Ok(())
    }
}
