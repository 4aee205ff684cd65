//! Export units and their output paths
//!
//! An export unit is one (project, estimate, file) combination: the file's
//! document, the overlays annotated on it for that estimate, and the path the
//! merged result is written to.

use super::ids::{EstimateId, FileId, ProjectId};
use super::records::{Annotation, DocumentContent};
use serde::Serialize;
use std::fmt;

/// Relative output path below the user's custom base path
///
/// Built only by [`crate::core::export::path::resolve`], so every segment is
/// known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OutputPath(String);

impl OutputPath {
    pub(crate) fn from_resolved(path: String) -> Self {
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OutputPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One document slated for overlay merge and upload
#[derive(Debug, Clone, PartialEq)]
pub struct ExportUnit {
    pub project_id: ProjectId,
    pub estimate_id: EstimateId,
    pub file_id: FileId,

    /// Source document
    pub document: DocumentContent,

    /// Overlays to import, in import order
    pub overlays: Vec<Annotation>,

    pub output_path: OutputPath,

    /// File name shown to the user and sent with the upload
    pub display_name: String,
}

impl ExportUnit {
    /// Short label used in log fields
    pub fn label(&self) -> String {
        format!(
            "project={} estimate={} file={}",
            self.project_id, self.estimate_id, self.file_id
        )
    }
}
