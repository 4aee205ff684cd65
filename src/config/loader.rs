//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{Environment, GeodocConfig};
use super::secret::secret_string;
use crate::domain::errors::GeodocError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into GeodocConfig
/// 4. Applies environment variable overrides (GEODOC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`GeodocError::Configuration`] if the file cannot be read, a
/// referenced variable is unset, parsing fails, an override has the wrong
/// type, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use geodoc::config::loader::load_config;
///
/// let config = load_config("geodoc.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GeodocConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GeodocError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GeodocError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let mut config = parse_config(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        GeodocError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Parses configuration text after `${VAR}` substitution, without validating
pub fn parse_config(contents: &str) -> Result<GeodocConfig> {
    let contents = substitute_env_vars(contents)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| GeodocError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(GeodocError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using GEODOC_* prefix
///
/// Environment variables follow the pattern: GEODOC_<SECTION>_<KEY>
/// For example: GEODOC_BACKEND_BASE_URL, GEODOC_EXPORT_RESET_DELAY_MS
fn apply_env_overrides(config: &mut GeodocConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("GEODOC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("GEODOC_ENVIRONMENT") {
        config.environment = parse_environment(&val)?;
    }

    // Backend overrides
    if let Ok(val) = std::env::var("GEODOC_BACKEND_BASE_URL") {
        config.backend.base_url = val;
    }
    if let Ok(val) = std::env::var("GEODOC_BACKEND_TIMEOUT_SECONDS") {
        config.backend.timeout_seconds = parse_override("GEODOC_BACKEND_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("GEODOC_BACKEND_TLS_VERIFY") {
        config.backend.tls_verify = parse_override("GEODOC_BACKEND_TLS_VERIFY", &val)?;
    }
    if let Ok(val) = std::env::var("GEODOC_BACKEND_EVENTS_PATH") {
        config.backend.events_path = val;
    }
    if let Ok(val) = std::env::var("GEODOC_BACKEND_RETRY_MAX_RETRIES") {
        config.backend.retry.max_retries =
            parse_override("GEODOC_BACKEND_RETRY_MAX_RETRIES", &val)?;
    }

    // Renderer overrides
    if let Ok(val) = std::env::var("GEODOC_RENDERER_BASE_URL") {
        config.renderer.base_url = val;
    }
    if let Ok(val) = std::env::var("GEODOC_RENDERER_TIMEOUT_SECONDS") {
        config.renderer.timeout_seconds =
            parse_override("GEODOC_RENDERER_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("GEODOC_RENDERER_TLS_VERIFY") {
        config.renderer.tls_verify = parse_override("GEODOC_RENDERER_TLS_VERIFY", &val)?;
    }
    if let Ok(val) = std::env::var("GEODOC_RENDERER_LICENSE_KEY") {
        config.renderer.license_key = Some(secret_string(val));
    }

    // Export overrides
    if let Ok(val) = std::env::var("GEODOC_EXPORT_CUSTOM_PATH") {
        config.export.custom_path = Some(val);
    }
    if let Ok(val) = std::env::var("GEODOC_EXPORT_RESET_DELAY_MS") {
        config.export.reset_delay_ms = parse_override("GEODOC_EXPORT_RESET_DELAY_MS", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("GEODOC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("GEODOC_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("GEODOC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("GEODOC_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

fn parse_override<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        GeodocError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

fn parse_environment(value: &str) -> Result<Environment> {
    match value.trim().to_lowercase().as_str() {
        "development" => Ok(Environment::Development),
        "staging" => Ok(Environment::Staging),
        "production" => Ok(Environment::Production),
        other => Err(GeodocError::Configuration(format!(
            "Invalid GEODOC_ENVIRONMENT '{other}'. Must be one of: development, staging, production"
        ))),
    }
}
