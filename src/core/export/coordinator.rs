//! Export coordinator - main orchestrator for both export modes
//!
//! - **Download mode**: trigger the backend job, then follow its
//!   notification stream through a [`StatusMonitor`] until completion.
//! - **Merge mode**: fetch every record, join them into export units and
//!   merge and upload the units one at a time.

use crate::adapters::backend::{
    BackendClient, EventStream, ExportBackend, NotificationSource, Uploader,
};
use crate::adapters::renderer::{DocumentRenderer, RemoteRenderer};
use crate::config::GeodocConfig;
use crate::core::export::cursor::BatchCursor;
use crate::core::export::join;
use crate::core::export::merge::AnnotationMerger;
use crate::core::export::pipeline::BatchRunner;
use crate::core::export::summary::BatchSummary;
use crate::core::status::{MonitorOutcome, StatusChannel, StatusMonitor, StatusSettings, StatusState};
use crate::domain::{ExportForm, GeodocError, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};

/// Buffered notifications between the stream reader and the monitor
const NOTIFICATION_BUFFER: usize = 64;

/// Result of a merge-mode run
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub summary: BatchSummary,
    /// Status as the user sees it once the batch ended
    pub status: StatusState,
}

/// Export coordinator
pub struct ExportCoordinator {
    settings: StatusSettings,
    backend: Arc<dyn ExportBackend>,
    uploader: Arc<dyn Uploader>,
    renderer: Arc<dyn DocumentRenderer>,
    notifications: Arc<dyn NotificationSource>,
    shutdown: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Create a coordinator wired to the HTTP backend and rendering service
    pub fn new(config: &GeodocConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let backend = Arc::new(BackendClient::new(&config.backend)?);
        let notifications = Arc::new(EventStream::new(&config.backend)?);
        let renderer = Arc::new(RemoteRenderer::new(&config.renderer)?);

        tracing::debug!(
            backend_url = %backend.base_url(),
            events_url = %notifications.url(),
            renderer_url = %renderer.base_url(),
            "Export coordinator created"
        );

        Ok(Self::with_components(
            StatusSettings::from_config(&config.export),
            backend.clone(),
            backend,
            renderer,
            notifications,
            shutdown,
        ))
    }

    /// Create a coordinator from explicit components
    pub fn with_components(
        settings: StatusSettings,
        backend: Arc<dyn ExportBackend>,
        uploader: Arc<dyn Uploader>,
        renderer: Arc<dyn DocumentRenderer>,
        notifications: Arc<dyn NotificationSource>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            settings,
            backend,
            uploader,
            renderer,
            notifications,
            shutdown,
        }
    }

    /// Run the streaming export job
    ///
    /// `on_update` is called with each published status state; states that
    /// change faster than the caller observes them may be coalesced. The
    /// final state is always in the returned outcome.
    ///
    /// # Errors
    ///
    /// [`GeodocError::InvalidInput`] for an invalid form. A rejected trigger
    /// request is not an error: it yields a failed outcome.
    pub async fn run_download_export<F>(
        &self,
        form: ExportForm,
        mut on_update: F,
    ) -> Result<MonitorOutcome>
    where
        F: FnMut(&StatusState) + Send,
    {
        form.validate()?;

        let (mut monitor, mut snapshots) = StatusMonitor::new(self.settings.clone(), form.clone());
        monitor.begin();
        on_update(monitor.state());

        let (tx, rx) = mpsc::channel(NOTIFICATION_BUFFER);
        let source = Arc::clone(&self.notifications);
        let stream_task = tokio::spawn(async move {
            if let Err(e) = source.subscribe(tx).await {
                tracing::warn!(error = %e, "Notification stream ended with an error");
            }
        });

        if let Err(e) = self.backend.trigger_download(&form).await {
            stream_task.abort();
            let outcome = monitor.fail(&e.to_string());
            on_update(&outcome.state);
            return Ok(outcome);
        }

        let handle = tokio::spawn(monitor.run(rx, self.shutdown.clone()));
        drop(snapshots.borrow_and_update());
        while snapshots.changed().await.is_ok() {
            let state = snapshots.borrow_and_update().clone();
            on_update(&state);
        }

        let outcome = handle
            .await
            .map_err(|e| GeodocError::Other(format!("Status monitor stopped unexpectedly: {e}")))?;
        stream_task.abort();

        tracing::info!(
            phase = ?outcome.state.phase,
            resets_fired = outcome.resets_fired,
            interrupted = outcome.interrupted,
            "Download export finished"
        );
        Ok(outcome)
    }

    /// Run the merge-and-upload export
    ///
    /// # Errors
    ///
    /// [`GeodocError::InvalidInput`] for an invalid form and
    /// [`GeodocError::Backend`] when the records cannot be fetched. Unit
    /// failures are reported in the summary.
    pub async fn run_merge_export(&self, form: &ExportForm) -> Result<MergeOutcome> {
        form.validate()?;
        let company_id = form.company_id()?;
        let start = Instant::now();

        let mut status = StatusChannel::new(self.settings.clone());
        status.begin();

        let payload = match self.backend.fetch_all_data(form).await {
            Ok(payload) => payload,
            Err(e) => {
                status.fail(&e.to_string());
                return Err(e.into());
            }
        };

        let units = join::join(
            &company_id,
            &payload.geo_projects,
            &payload.geo_files,
            &payload.geo_estimates,
            &payload.geo_annotations,
        );

        let mut summary = BatchSummary::new(units.len());
        summary.files_without_content = payload.files_without_content();
        summary.path_collisions = join::path_collisions(&units);

        tracing::info!(
            run_id = %summary.run_id,
            company_id = %company_id,
            units = units.len(),
            files_without_content = summary.files_without_content,
            "Starting merge export"
        );

        let mut cursor = BatchCursor::new(units);
        let runner = BatchRunner::new(
            AnnotationMerger::new(Arc::clone(&self.renderer)),
            Arc::clone(&self.uploader),
            form.custom_path.clone(),
        );
        runner.run(&mut cursor, &mut summary, &self.shutdown).await?;

        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();

        if let Some(failed) = summary.failure() {
            status.fail(&format!("unit {} ({}) failed", failed.index, failed.output_path));
        } else if !summary.interrupted {
            status.finish();
        }

        Ok(MergeOutcome {
            summary,
            status: status.state().clone(),
        })
    }
}
