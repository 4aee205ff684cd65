//! Export orchestration and batch processing
//!
//! This module provides the core export logic for geodoc, including:
//! - Output path derivation ([`path`])
//! - The record join into export units ([`join`])
//! - The sequential batch cursor ([`cursor`]) and its runner ([`pipeline`])
//! - Overlay merge ([`merge`])
//! - Summary and reporting ([`summary`])
//! - Export coordination ([`coordinator`])

pub mod coordinator;
pub mod cursor;
pub mod join;
pub mod merge;
pub mod path;
pub mod pipeline;
pub mod summary;

pub use coordinator::{ExportCoordinator, MergeOutcome};
pub use cursor::{BatchCursor, BatchFailure, CursorState};
pub use merge::AnnotationMerger;
pub use pipeline::BatchRunner;
pub use summary::{BatchSummary, FailureStage, UnitOutcome, UnitStatus};
