//! Export command implementation
//!
//! This module implements the `export` command. Without
//! `--merge-annotations` it triggers the backend job and follows its
//! notifications; with it, every document is merged with its annotations
//! and uploaded one at a time.

use crate::config::load_config;
use crate::core::export::{ExportCoordinator, MergeOutcome, UnitStatus};
use crate::core::status::{tone_of, MonitorOutcome, Phase, StatusState, StatusTone};
use crate::domain::{BackendError, ExportForm, GeodocError};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Company whose projects are exported
    #[arg(long)]
    pub company_id: String,

    /// Base directory on the backend host (defaults to export.custom_path)
    #[arg(long)]
    pub custom_path: Option<String>,

    /// First record of the range
    #[arg(long)]
    pub start_range: String,

    /// Last record of the range
    #[arg(long)]
    pub end_range: String,

    /// Lay the output out in folder view
    #[arg(long)]
    pub folder_view: bool,

    /// Merge annotations into the PDFs and upload them one by one
    #[arg(long)]
    pub merge_annotations: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl ExportArgs {
    /// Build the export form, filling the custom path from configuration
    pub fn form(&self, default_custom_path: Option<&str>) -> ExportForm {
        ExportForm {
            company_id: self.company_id.clone(),
            custom_path: self
                .custom_path
                .clone()
                .or_else(|| default_custom_path.map(str::to_string))
                .unwrap_or_default(),
            start_range: self.start_range.clone(),
            end_range: self.end_range.clone(),
            is_checked: self.folder_view,
        }
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let form = self.form(config.export.custom_path.as_deref());
        if let Err(e) = form.validate() {
            tracing::error!(error = %e, "Export form rejected");
            eprintln!("{e}");
            return Ok(2);
        }

        if !self.yes {
            println!("Export Configuration:");
            println!("  Company: {}", form.company_id);
            println!("  Range: {} - {}", form.start_range, form.end_range);
            println!("  Custom path: {}", form.custom_path);
            println!("  Folder view: {}", form.is_checked);
            println!(
                "  Mode: {}",
                if self.merge_annotations {
                    "merge annotations"
                } else {
                    "download"
                }
            );
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        let coordinator = match ExportCoordinator::new(&config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(4);
            }
        };

        println!("🚀 Starting export...");
        println!();

        let error_message = config.export.error_message.clone();
        if self.merge_annotations {
            match coordinator.run_merge_export(&form).await {
                Ok(outcome) => Ok(report_merge(&outcome)),
                Err(e) => {
                    tracing::error!(error = %e, "Merge export failed");
                    eprintln!("❌ {error_message}");
                    eprintln!("   {e}");
                    Ok(exit_code_for(&e))
                }
            }
        } else {
            let mut printer = StatusPrinter::new(config.export.success_message.clone());
            let outcome = coordinator
                .run_download_export(form, |state| {
                    for line in printer.render(state) {
                        println!("{line}");
                    }
                })
                .await;
            match outcome {
                Ok(outcome) => Ok(report_download(&outcome)),
                Err(e) => {
                    tracing::error!(error = %e, "Download export failed");
                    eprintln!("❌ {error_message}");
                    eprintln!("   {e}");
                    Ok(exit_code_for(&e))
                }
            }
        }
    }
}

/// Turns status snapshots into printable lines, skipping repeats
pub struct StatusPrinter {
    success_message: String,
    last_message: String,
    last_progress: Option<u8>,
    last_error: Option<String>,
}

impl StatusPrinter {
    pub fn new(success_message: String) -> Self {
        Self {
            success_message,
            last_message: String::new(),
            last_progress: None,
            last_error: None,
        }
    }

    pub fn render(&mut self, state: &StatusState) -> Vec<String> {
        let mut lines = Vec::new();

        if !state.message.is_empty() && state.message != self.last_message {
            let marker = match tone_of(&state.message, &self.success_message) {
                StatusTone::Started => "🟡",
                StatusTone::Finished => "🟢",
                StatusTone::Neutral => "  ",
            };
            lines.push(format!("{marker} {}", state.message));
            self.last_message = state.message.clone();
        }

        if state.phase != Phase::Idle && self.last_progress != Some(state.progress_percent) {
            lines.push(format!("   Progress: {}%", state.progress_percent));
            self.last_progress = Some(state.progress_percent);
        }

        if state.error_message.is_some() && state.error_message != self.last_error {
            if let Some(error) = &state.error_message {
                lines.push(format!("❌ {error}"));
            }
            self.last_error = state.error_message.clone();
        }

        lines
    }
}

fn report_download(outcome: &MonitorOutcome) -> i32 {
    println!();
    if outcome.interrupted {
        println!("⚠️  Export interrupted. The backend job may still be running.");
        tracing::info!("Export interrupted by user signal");
        return 130;
    }

    match outcome.state.phase {
        Phase::Succeeded => {
            println!("✅ Export completed successfully!");
            0
        }
        Phase::Failed => 1,
        Phase::Idle | Phase::Running => {
            println!("⚠️  Notification stream closed before the job completed");
            1
        }
    }
}

fn report_merge(outcome: &MergeOutcome) -> i32 {
    let summary = &outcome.summary;

    println!();
    println!("📊 Export Summary:");
    println!("  Run: {}", summary.run_id);
    println!("  Units: {}", summary.total_units);
    println!("  Uploaded: {}", summary.uploaded);
    println!("  Not attempted: {}", summary.remaining());
    println!("  Files without content: {}", summary.files_without_content);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.path_collisions.is_empty() {
        println!("⚠️  Output paths written more than once (last unit wins):");
        for path in &summary.path_collisions {
            println!("  - {path}");
        }
        println!();
    }

    if let Some(failed) = summary.failure() {
        if let UnitStatus::Failed { stage, reason } = &failed.status {
            println!("⚠️  Unit {} failed during {stage:?}:", failed.index);
            println!("  Path: {}", failed.output_path);
            println!("  Reason: {reason}");
            println!();
        }
    }

    if summary.interrupted {
        println!("⚠️  Export interrupted after the current document.");
        tracing::info!("Export interrupted by user signal");
        return 130;
    }

    match outcome.status.phase {
        Phase::Succeeded => {
            println!("✅ {}", outcome.status.message);
            0
        }
        _ => {
            if let Some(error) = &outcome.status.error_message {
                println!("❌ {error}");
            }
            1
        }
    }
}

fn exit_code_for(err: &GeodocError) -> i32 {
    match err {
        GeodocError::InvalidInput(_)
        | GeodocError::Configuration(_)
        | GeodocError::Validation(_) => 2,
        GeodocError::Backend(BackendError::ConnectionFailed(_)) => 4,
        GeodocError::Backend(_) => 1,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ExportArgs {
        ExportArgs {
            company_id: "9".to_string(),
            custom_path: None,
            start_range: "1".to_string(),
            end_range: "50".to_string(),
            folder_view: true,
            merge_annotations: false,
            yes: true,
        }
    }

    #[test]
    fn test_form_uses_configured_custom_path() {
        let form = args().form(Some("D:/exports"));
        assert_eq!(form.custom_path, "D:/exports");
        assert!(form.is_checked);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_form_cli_custom_path_wins() {
        let mut args = args();
        args.custom_path = Some("E:/other".to_string());
        assert_eq!(args.form(Some("D:/exports")).custom_path, "E:/other");
    }

    #[test]
    fn test_form_without_custom_path_is_invalid() {
        assert!(args().form(None).validate().is_err());
    }

    #[test]
    fn test_status_printer_skips_repeats() {
        let mut printer = StatusPrinter::new("Download successful!".to_string());
        let mut state = StatusState {
            phase: Phase::Running,
            processing: true,
            message: "Export started".to_string(),
            ..StatusState::default()
        };

        let lines = printer.render(&state);
        assert_eq!(lines, vec!["🟡 Export started", "   Progress: 0%"]);
        assert!(printer.render(&state).is_empty());

        state.progress_percent = 40;
        assert_eq!(printer.render(&state), vec!["   Progress: 40%"]);
    }

    #[test]
    fn test_status_printer_shows_error_once() {
        let mut printer = StatusPrinter::new("Download successful!".to_string());
        let state = StatusState {
            phase: Phase::Failed,
            message: "an internal error occurred".to_string(),
            error_message: Some("An error occurred while processing the request.".to_string()),
            ..StatusState::default()
        };

        let lines = printer.render(&state);
        assert!(lines.contains(&"❌ An error occurred while processing the request.".to_string()));
        assert!(printer.render(&state).is_empty());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&GeodocError::InvalidInput("x".to_string())),
            2
        );
        let mut args = args();
        args.start_range = "60".to_string();
        let inverted = args.form(Some("D:/exports")).validate().unwrap_err();
        assert_eq!(exit_code_for(&inverted), 2);
        assert_eq!(
            exit_code_for(&BackendError::ConnectionFailed("refused".to_string()).into()),
            4
        );
        assert_eq!(
            exit_code_for(&BackendError::from_status(500, "boom").into()),
            1
        );
        assert_eq!(exit_code_for(&GeodocError::Other("x".to_string())), 5);
    }
}
