//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "geodoc.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing geodoc configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your backend and renderer URLs", self.output);
                println!("  2. Put GEODOC_RENDERER_LICENSE_KEY in a .env file if your renderer needs one");
                println!("  3. Validate configuration: geodoc validate-config");
                println!("  4. Run export: geodoc export --company-id <ID> --start-range <N> --end-range <N>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Sample configuration with every section and its defaults
    pub fn sample_config() -> &'static str {
        r#"# geodoc configuration
# Values of the form ${VAR} are read from the environment (and .env).
# Any key can be overridden with GEODOC_<SECTION>_<KEY>.

# development, staging or production
environment = "development"

[application]
log_level = "info"

[backend]
base_url = "http://localhost:5000"
timeout_seconds = 60
tls_verify = true
events_path = "/events"

# Applied to fetch-all-data only; downloads and uploads are never retried
[backend.retry]
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[renderer]
base_url = "http://localhost:9090"
timeout_seconds = 120
tls_verify = true
poll_interval_ms = 250
# license_key = "${GEODOC_RENDERER_LICENSE_KEY}"

[export]
# custom_path = "D:/exports"
completion_messages = ["CSV generation completed!", "Data fetching completed!"]
success_message = "Download successful!"
error_message = "An error occurred while processing the request."
reset_delay_ms = 2000

[logging]
local_enabled = true
local_path = "./logs"
local_rotation = "daily"
local_max_size_mb = 100
"#
    }
}
