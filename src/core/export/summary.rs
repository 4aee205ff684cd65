//! Batch summary and reporting
//!
//! This module defines structures for tracking and reporting the result of
//! one merge-and-upload batch.

use crate::domain::{ExportUnit, OutputPath};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::time::Duration;
use uuid::Uuid;

/// Stage at which a unit failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Overlay merge (document load, import, serialize)
    Merge,
    /// Upload to the backend
    Upload,
}

/// What happened to one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitStatus {
    Uploaded {
        bytes: usize,
        /// Hex-encoded SHA-256 of the uploaded bytes
        checksum: String,
    },
    Failed {
        stage: FailureStage,
        reason: String,
    },
}

/// Per-unit result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutcome {
    /// Position in the batch
    pub index: usize,
    pub output_path: OutputPath,
    pub display_name: String,
    pub status: UnitStatus,
}

/// Summary of a batch run
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Identifier attached to every log line of the run
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    /// Units produced by the join
    pub total_units: usize,

    /// Units merged and uploaded
    pub uploaded: usize,

    /// File records dropped for lack of document content
    pub files_without_content: usize,

    /// Output paths written more than once; the later unit wins
    pub path_collisions: Vec<OutputPath>,

    /// One entry per attempted unit, in processing order
    pub outcomes: Vec<UnitOutcome>,

    /// The batch stopped early because shutdown was requested
    pub interrupted: bool,

    pub duration: Duration,
}

impl BatchSummary {
    /// Create a new empty summary for a batch of `total_units`
    pub fn new(total_units: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            total_units,
            uploaded: 0,
            files_without_content: 0,
            path_collisions: Vec::new(),
            outcomes: Vec::new(),
            interrupted: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record an uploaded unit
    pub fn record_upload(
        &mut self,
        index: usize,
        unit: &ExportUnit,
        bytes: usize,
        checksum: String,
    ) {
        self.uploaded += 1;
        self.outcomes.push(UnitOutcome {
            index,
            output_path: unit.output_path.clone(),
            display_name: unit.display_name.clone(),
            status: UnitStatus::Uploaded { bytes, checksum },
        });
    }

    /// Record the unit that aborted the batch
    pub fn record_failure(
        &mut self,
        index: usize,
        unit: &ExportUnit,
        stage: FailureStage,
        reason: impl Into<String>,
    ) {
        self.outcomes.push(UnitOutcome {
            index,
            output_path: unit.output_path.clone(),
            display_name: unit.display_name.clone(),
            status: UnitStatus::Failed {
                stage,
                reason: reason.into(),
            },
        });
    }

    /// The unit that aborted the batch, if any
    pub fn failure(&self) -> Option<&UnitOutcome> {
        self.outcomes
            .iter()
            .find(|o| matches!(o.status, UnitStatus::Failed { .. }))
    }

    /// Units never attempted
    pub fn remaining(&self) -> usize {
        self.total_units.saturating_sub(self.outcomes.len())
    }

    /// Every unit was uploaded
    pub fn is_successful(&self) -> bool {
        self.failure().is_none() && !self.interrupted && self.uploaded == self.total_units
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            total_units = self.total_units,
            uploaded = self.uploaded,
            remaining = self.remaining(),
            files_without_content = self.files_without_content,
            interrupted = self.interrupted,
            duration_secs = self.duration.as_secs(),
            "Batch completed"
        );

        for path in &self.path_collisions {
            tracing::warn!(
                run_id = %self.run_id,
                output_path = %path,
                "Output path written by more than one unit"
            );
        }

        if let Some(failed) = self.failure() {
            if let UnitStatus::Failed { stage, reason } = &failed.status {
                tracing::error!(
                    run_id = %self.run_id,
                    unit_index = failed.index,
                    output_path = %failed.output_path,
                    stage = ?stage,
                    reason = %reason,
                    "Batch aborted"
                );
            }
        }
    }
}

/// Hex-encoded SHA-256 of raw bytes
pub fn checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
