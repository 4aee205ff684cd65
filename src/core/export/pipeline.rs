//! Sequential merge-and-upload pipeline
//!
//! Drives a [`BatchCursor`] one unit at a time: merge the unit's overlays,
//! upload the result, and only then advance. The first failure aborts the
//! batch; later units are never touched.

use super::cursor::BatchCursor;
use super::merge::AnnotationMerger;
use super::summary::{checksum, BatchSummary, FailureStage};
use crate::adapters::backend::Uploader;
use crate::domain::{ExportUnit, Result};
use crate::{log_batch_progress, log_unit_start};
use std::sync::Arc;
use tokio::sync::watch;

/// Runs one batch through merge and upload
pub struct BatchRunner {
    merger: AnnotationMerger,
    uploader: Arc<dyn Uploader>,
    custom_path: String,
}

impl BatchRunner {
    pub fn new(
        merger: AnnotationMerger,
        uploader: Arc<dyn Uploader>,
        custom_path: impl Into<String>,
    ) -> Self {
        Self {
            merger,
            uploader,
            custom_path: custom_path.into(),
        }
    }

    /// Process every unit of `cursor` in order, recording into `summary`
    ///
    /// The shutdown flag is checked between units only: a unit already in
    /// flight always finishes its merge and upload.
    ///
    /// # Errors
    ///
    /// Unit failures are not errors; they abort the cursor and are recorded
    /// in the summary. An error is returned only if the cursor was already
    /// started.
    pub async fn run(
        &self,
        cursor: &mut BatchCursor,
        summary: &mut BatchSummary,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<()> {
        cursor.start()?;
        let total = cursor.len();

        while let Some((index, unit)) = cursor.current() {
            if *shutdown.borrow() {
                tracing::warn!(
                    run_id = %summary.run_id,
                    completed = index,
                    total,
                    "Shutdown requested, stopping before next unit"
                );
                summary.interrupted = true;
                break;
            }

            let unit = unit.clone();
            log_unit_start!(summary.run_id, index, total, unit.output_path);

            match self.process(&unit).await {
                Ok((bytes, digest)) => {
                    summary.record_upload(index, &unit, bytes, digest);
                    cursor.advance()?;
                    log_batch_progress!(index + 1, total);
                }
                Err((stage, reason)) => {
                    tracing::error!(
                        run_id = %summary.run_id,
                        unit_index = index,
                        unit = %unit.label(),
                        output_path = %unit.output_path,
                        stage = ?stage,
                        error = %reason,
                        "Unit failed, aborting batch"
                    );
                    summary.record_failure(index, &unit, stage, reason.clone());
                    cursor.abort(reason)?;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Merge then upload one unit; returns the uploaded size and checksum
    async fn process(
        &self,
        unit: &ExportUnit,
    ) -> std::result::Result<(usize, String), (FailureStage, String)> {
        let merged = self
            .merger
            .merge(&unit.document, &unit.overlays, &unit.display_name)
            .await
            .map_err(|e| (FailureStage::Merge, e.to_string()))?;

        let size = merged.len();
        let digest = checksum(&merged);

        self.uploader
            .upload(
                merged,
                &unit.output_path,
                &unit.display_name,
                &self.custom_path,
            )
            .await
            .map_err(|e| (FailureStage::Upload, e.to_string()))?;

        tracing::debug!(
            output_path = %unit.output_path,
            overlays = unit.overlays.len(),
            bytes = size,
            checksum = %digest,
            "Unit uploaded"
        );

        Ok((size, digest))
    }
}
