// geodoc - Bulk document export with annotation merge
// Copyright (c) 2025 Geodoc Contributors
// Licensed under the MIT License

//! # geodoc - bulk document export with annotation merge
//!
//! geodoc drives a document export backend. It either triggers the
//! backend's own export job and follows its progress, or fetches every
//! selected record, bakes the annotation overlays into each PDF and uploads
//! the merged documents one at a time.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Joining** flat project, estimate, file and annotation records into export units
//! - **Deriving** a deterministic output path per unit
//! - **Merging** annotation overlays into documents through a rendering service
//! - **Uploading** merged documents strictly one at a time, aborting on the first failure
//! - **Tracking** backend job status and progress from a notification stream
//!
//! ## Architecture
//!
//! geodoc follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (join, merge pipeline, status tracking)
//! - [`adapters`] - External integrations (export backend, rendering service)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geodoc::config::load_config;
//! use geodoc::core::export::ExportCoordinator;
//! use geodoc::domain::ExportForm;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("geodoc.toml")?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let coordinator = ExportCoordinator::new(&config, shutdown_rx)?;
//!
//!     let form = ExportForm {
//!         company_id: "9".to_string(),
//!         custom_path: "D:/exports".to_string(),
//!         start_range: "1".to_string(),
//!         end_range: "50".to_string(),
//!         is_checked: false,
//!     };
//!     let outcome = coordinator.run_merge_export(&form).await?;
//!
//!     println!("Uploaded {} documents", outcome.summary.uploaded);
//!     Ok(())
//! }
//! ```
//!
//! ## Output Paths
//!
//! Every unit is written to
//! `company_{companyId}/project_{projectId}/estimate_{estimateId}/{fileName}`:
//!
//! ```rust
//! use geodoc::core::export::path;
//!
//! let out = path::resolve("9", 1, 10, "a.pdf").unwrap();
//! assert_eq!(out.as_str(), "company_9/project_1/estimate_10/a.pdf");
//! ```
//!
//! ## Error Handling
//!
//! geodoc uses the [`domain::GeodocError`] type for all errors:
//!
//! ```rust,no_run
//! use geodoc::domain::GeodocError;
//!
//! fn example() -> Result<(), GeodocError> {
//!     let config = geodoc::config::load_config("geodoc.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! geodoc uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(output_path = "company_9/project_1/estimate_10/a.pdf", "Output path collision");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
