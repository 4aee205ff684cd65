//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for geodoc using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// geodoc - bulk document export with annotation merge
#[derive(Parser, Debug)]
#[command(name = "geodoc")]
#[command(version, about, long_about = None)]
#[command(author = "Geodoc Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "geodoc.toml", env = "GEODOC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GEODOC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an export job, optionally merging annotations into the PDFs
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
