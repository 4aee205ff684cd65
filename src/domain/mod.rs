//! Domain models and types for geodoc.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CompanyId`], [`ProjectId`], [`EstimateId`], [`FileId`])
//! - **Backend records** ([`Project`], [`Estimate`], [`FileRecord`], [`Annotation`])
//! - **Derived export units** ([`ExportUnit`], [`OutputPath`])
//! - **The export form** ([`ExportForm`])
//! - **Error types** ([`GeodocError`] and the per-component errors)
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Record keys are newtypes so a join cannot compare a file id against an
//! estimate id:
//!
//! ```rust
//! use geodoc::domain::{EstimateId, FileId};
//!
//! let estimate = EstimateId::new(10);
//! let file = FileId::new(10);
//! // estimate == file  // Compile error!
//! assert_eq!(estimate.get(), file.get());
//! ```

pub mod errors;
pub mod form;
pub mod ids;
pub mod records;
pub mod result;
pub mod unit;

// Re-export commonly used types for convenience
pub use errors::{BackendError, GeodocError, MergeError, NotificationParseError, UploadError};
pub use form::ExportForm;
pub use ids::{CompanyId, EstimateId, FileId, ProjectId};
pub use records::{Annotation, DocumentContent, Estimate, ExportPayload, FileRecord, Project};
pub use result::Result;
pub use unit::{ExportUnit, OutputPath};
