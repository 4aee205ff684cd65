//! Configuration schema types
//!
//! This module defines the configuration structure for geodoc.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main geodoc configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeodocConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Export backend (download trigger, bulk fetch, upload, events)
    pub backend: BackendConfig,

    /// Document rendering service used for overlay merge
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Export behaviour and status vocabulary
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GeodocConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.backend.validate(&self.environment)?;
        self.renderer.validate(&self.environment)?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration
///
/// Only applied to idempotent reads (`fetch-all-data`). Downloads and
/// uploads are never retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self, section: &str) -> Result<(), String> {
        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(format!(
                "{section}.retry.max_retries must be between 1 and 10, got {}",
                self.max_retries
            ));
        }
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "{section}.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "{section}.retry.initial_delay_ms ({}) must not exceed max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }
        Ok(())
    }

    /// Backoff delay before the given retry (1-based)
    pub fn delay_for_attempt(&self, attempt: usize) -> u64 {
        let factor = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1) as i32);
        let delay = (self.initial_delay_ms as f64 * factor) as u64;
        delay.min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Export backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the export backend
    pub base_url: String,

    /// Request timeout in seconds
    ///
    /// Applies to the request/response calls. The notification stream is
    /// long-lived and only bounded by the connect timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes the
    /// application to man-in-the-middle attacks. Enforced `true` in
    /// production.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Path of the newline-delimited JSON notification stream
    #[serde(default = "default_events_path")]
    pub events_path: String,

    /// Retry configuration for the bulk fetch
    #[serde(default)]
    pub retry: RetryConfig,
}

impl BackendConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        validate_base_url("backend.base_url", &self.base_url)?;

        if self.timeout_seconds == 0 {
            return Err("backend.timeout_seconds must be > 0".to_string());
        }

        if !self.events_path.starts_with('/') {
            return Err(format!(
                "backend.events_path must start with '/', got '{}'",
                self.events_path
            ));
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(tls_in_production_error("backend"));
        }

        self.retry.validate("backend")?;
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
            events_path: default_events_path(),
            retry: RetryConfig::default(),
        }
    }
}

/// Rendering service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Base URL of the rendering service
    #[serde(default = "default_renderer_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_renderer_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled (enforced in production)
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Interval between readiness polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// License key for the rendering engine (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub license_key: Option<SecretString>,
}

impl RendererConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        validate_base_url("renderer.base_url", &self.base_url)?;

        if self.timeout_seconds == 0 {
            return Err("renderer.timeout_seconds must be > 0".to_string());
        }
        if self.poll_interval_ms == 0 {
            return Err("renderer.poll_interval_ms must be > 0".to_string());
        }

        if self
            .license_key
            .as_ref()
            .is_some_and(|key| key.expose_secret().is_empty())
        {
            return Err("renderer.license_key cannot be empty when set".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(tls_in_production_error("renderer"));
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            base_url: default_renderer_base_url(),
            timeout_seconds: default_renderer_timeout_seconds(),
            tls_verify: true,
            poll_interval_ms: default_poll_interval_ms(),
            license_key: None,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default base directory on the backend host, used when the CLI
    /// does not pass `--custom-path`
    #[serde(default)]
    pub custom_path: Option<String>,

    /// Status messages that mark the backend job as finished
    #[serde(default = "default_completion_messages")]
    pub completion_messages: Vec<String>,

    /// Status line shown once the form has been reset
    #[serde(default = "default_success_message")]
    pub success_message: String,

    /// Error banner shown on any failure
    #[serde(default = "default_error_message")]
    pub error_message: String,

    /// Delay between completion and form reset in milliseconds
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.completion_messages.is_empty() {
            return Err("export.completion_messages cannot be empty".to_string());
        }
        if self.completion_messages.iter().any(|m| m.trim().is_empty()) {
            return Err("export.completion_messages cannot contain empty entries".to_string());
        }
        if self.success_message.trim().is_empty() {
            return Err("export.success_message cannot be empty".to_string());
        }
        if self.error_message.trim().is_empty() {
            return Err("export.error_message cannot be empty".to_string());
        }
        if self.reset_delay_ms > 60_000 {
            return Err(format!(
                "export.reset_delay_ms must be <= 60000, got {}",
                self.reset_delay_ms
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            custom_path: None,
            completion_messages: default_completion_messages(),
            success_message: default_success_message(),
            error_message: default_error_message(),
            reset_delay_ms: default_reset_delay_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log file directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Maximum log file size in MB
    #[serde(default = "default_local_max_size_mb")]
    pub local_max_size_mb: usize,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        if self.local_max_size_mb == 0 {
            return Err("logging.local_max_size_mb must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            local_max_size_mb: default_local_max_size_mb(),
        }
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(format!("{field} must start with http:// or https://"));
    }
    url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    Ok(())
}

fn tls_in_production_error(section: &str) -> String {
    format!(
        "TLS certificate verification cannot be disabled in production environments. \
        Set '{section}.tls_verify = true', or use environment = \"development\" or \"staging\" for testing."
    )
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_events_path() -> String {
    "/events".to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_renderer_base_url() -> String {
    "http://localhost:9090".to_string()
}

fn default_renderer_timeout_seconds() -> u64 {
    120
}

fn default_poll_interval_ms() -> u64 {
    250
}

pub(crate) fn default_completion_messages() -> Vec<String> {
    vec![
        "CSV generation completed!".to_string(),
        "Data fetching completed!".to_string(),
    ]
}

fn default_success_message() -> String {
    "Download successful!".to_string()
}

fn default_error_message() -> String {
    "An error occurred while processing the request.".to_string()
}

fn default_reset_delay_ms() -> u64 {
    2000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_local_max_size_mb() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::SecretValue;
    use secrecy::Secret;

    fn config() -> GeodocConfig {
        GeodocConfig {
            application: ApplicationConfig::default(),
            environment: Environment::Development,
            backend: BackendConfig {
                base_url: "https://exports.example.com".to_string(),
                ..Default::default()
            },
            renderer: RendererConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig {
            log_level: "info".to_string(),
        };
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_full_config_validation() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_backend_config_validation() {
        let mut backend = config().backend;
        assert!(backend.validate(&Environment::Development).is_ok());

        backend.base_url = "ftp://exports.example.com".to_string();
        assert!(backend.validate(&Environment::Development).is_err());

        backend.base_url = "https://exports.example.com".to_string();
        backend.events_path = "events".to_string();
        assert!(backend
            .validate(&Environment::Development)
            .unwrap_err()
            .contains("events_path"));
    }

    #[test]
    fn test_tls_verification_in_production() {
        let mut config = config();
        config.backend.tls_verify = false;

        config.environment = Environment::Production;
        let result = config.validate();
        assert!(result
            .unwrap_err()
            .contains("TLS certificate verification cannot be disabled in production"));

        config.environment = Environment::Staging;
        assert!(config.validate().is_ok());

        config.backend.tls_verify = true;
        config.renderer.tls_verify = false;
        config.environment = Environment::Production;
        assert!(config.validate().unwrap_err().contains("renderer.tls_verify"));
    }

    #[test]
    fn test_retry_config_validation() {
        let mut retry = RetryConfig::default();
        assert!(retry.validate("backend").is_ok());

        retry.max_retries = 0;
        assert!(retry.validate("backend").is_err());

        retry.max_retries = 3;
        retry.backoff_multiplier = 0.5;
        assert!(retry.validate("backend").is_err());
    }

    #[test]
    fn test_retry_delay_is_capped() {
        let retry = RetryConfig {
            max_retries: 5,
            initial_delay_ms: 1000,
            max_delay_ms: 3000,
            backoff_multiplier: 2.0,
        };
        assert_eq!(retry.delay_for_attempt(1), 1000);
        assert_eq!(retry.delay_for_attempt(2), 2000);
        assert_eq!(retry.delay_for_attempt(3), 3000);
        assert_eq!(retry.delay_for_attempt(4), 3000);
    }

    #[test]
    fn test_renderer_empty_license_key_rejected() {
        let mut renderer = RendererConfig::default();
        renderer.license_key = Some(Secret::new(SecretValue::from(String::new())));
        assert!(renderer.validate(&Environment::Development).is_err());

        renderer.license_key = Some(Secret::new(SecretValue::from("key-123".to_string())));
        assert!(renderer.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_export_config_validation() {
        let mut export = ExportConfig::default();
        assert!(export.validate().is_ok());

        export.completion_messages.clear();
        assert!(export.validate().is_err());

        export.completion_messages = vec!["done".to_string(), " ".to_string()];
        assert!(export.validate().is_err());

        export = ExportConfig {
            reset_delay_ms: 120_000,
            ..Default::default()
        };
        assert!(export.validate().is_err());
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(config.local_enabled);
        assert_eq!(config.local_path, "./logs");
        assert_eq!(config.local_rotation, "daily");
        assert_eq!(config.local_max_size_mb, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        config.local_rotation = "hourly".to_string();
        assert!(config.validate().is_ok());

        config.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_events_path(), "/events");
        assert_eq!(default_max_retries(), 3);
        assert_eq!(default_reset_delay_ms(), 2000);
        assert_eq!(default_success_message(), "Download successful!");
        assert_eq!(
            default_completion_messages(),
            vec!["CSV generation completed!", "Data fetching completed!"]
        );
    }
}
