//! Configuration management for geodoc.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! geodoc uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `GEODOC_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Comprehensive validation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use geodoc::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("geodoc.toml")?;
//!
//! println!("Backend: {}", config.backend.base_url);
//! println!("Renderer: {}", config.renderer.base_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`BackendConfig`] - Export backend connection, notification stream and retry
//! - [`RendererConfig`] - Document rendering service and license key
//! - [`ExportConfig`] - Default custom path and status vocabulary
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [backend]
//! base_url = "https://exports.example.com"
//! events_path = "/events"
//!
//! [renderer]
//! base_url = "https://renderer.example.com"
//! license_key = "${GEODOC_RENDERER_LICENSE_KEY}"
//!
//! [export]
//! custom_path = "D:/exports"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, BackendConfig, Environment, ExportConfig, GeodocConfig, LoggingConfig,
    RendererConfig, RetryConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
