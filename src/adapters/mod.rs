//! External system integrations for geodoc.
//!
//! - [`backend`] - the export backend (job endpoints, upload, notification stream)
//! - [`renderer`] - the document rendering capability used for overlay merge
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. Core code only holds trait
//! objects ([`backend::ExportBackend`], [`backend::Uploader`],
//! [`backend::NotificationSource`], [`renderer::DocumentRenderer`]).
//!
//! ```rust,no_run
//! use geodoc::adapters::backend::BackendClient;
//! use geodoc::adapters::renderer::RemoteRenderer;
//! use geodoc::config::{BackendConfig, RendererConfig};
//!
//! # fn example() -> geodoc::domain::Result<()> {
//! let backend = BackendClient::new(&BackendConfig::default())?;
//! let renderer = RemoteRenderer::new(&RendererConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod renderer;
