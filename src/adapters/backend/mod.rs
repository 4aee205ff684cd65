//! Export backend integration
//!
//! - [`BackendClient`] - `/download`, `/fetch-all-data` and `/upload`
//! - [`EventStream`] - the job notification stream
//!
//! The pipeline depends on the traits in [`traits`] only.

pub mod client;
pub mod events;
pub mod traits;

pub use client::BackendClient;
pub use events::{parse_line, EventStream};
pub use traits::{ExportBackend, NotificationSource, Uploader};
