//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the geodoc configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after applying overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Backend: {}", config.backend.base_url);
        println!("  Notification stream: {}", config.backend.events_path);
        println!(
            "  Fetch retries: {} (initial delay {}ms)",
            config.backend.retry.max_retries, config.backend.retry.initial_delay_ms
        );
        println!("  Renderer: {}", config.renderer.base_url);
        println!(
            "  Renderer license key: {}",
            if config.renderer.license_key.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        println!(
            "  Default custom path: {}",
            config.export.custom_path.as_deref().unwrap_or("(none)")
        );
        println!("  Completion messages: {:?}", config.export.completion_messages);
        println!("  Reset delay: {}ms", config.export.reset_delay_ms);
        println!(
            "  File logging: {}",
            if config.logging.local_enabled {
                format!("{} ({})", config.logging.local_path, config.logging.local_rotation)
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/geodoc.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[backend]
base_url = "http://localhost:5000"

[logging]
local_enabled = false
"#
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
