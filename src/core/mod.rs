//! Core business logic for geodoc.
//!
//! # Modules
//!
//! - [`export`] - Export orchestration, the record join and the merge/upload batch
//! - [`status`] - Job notifications and the status state machine
//!
//! # Export Workflow
//!
//! Merge mode:
//!
//! 1. **Fetch**: `POST /fetch-all-data` returns projects, files, estimates and annotations
//! 2. **Join**: rebuild the hierarchy and flatten it into export units
//! 3. **Merge**: bake each unit's overlays into its document
//! 4. **Upload**: send the merged document before touching the next unit
//! 5. **Report**: log the batch summary
//!
//! Download mode triggers `POST /download` and follows the job through the
//! notification stream.
//!
//! # Example
//!
//! ```rust,no_run
//! use geodoc::config::load_config;
//! use geodoc::core::export::ExportCoordinator;
//! use geodoc::domain::ExportForm;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("geodoc.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = ExportCoordinator::new(&config, shutdown_rx)?;
//!
//! let form = ExportForm {
//!     company_id: "9".to_string(),
//!     custom_path: "D:/exports".to_string(),
//!     start_range: "1".to_string(),
//!     end_range: "50".to_string(),
//!     is_checked: false,
//! };
//! let outcome = coordinator.run_merge_export(&form).await?;
//!
//! println!("Uploaded: {}/{}", outcome.summary.uploaded, outcome.summary.total_units);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod status;
