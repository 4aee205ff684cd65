//! Status channel
//!
//! Folds backend job notifications into a small user-facing state: a phase,
//! a percent progress, the latest status line and an error banner.

use super::notification::{JobState, Notification};
use crate::config::ExportConfig;
use std::time::Duration;

/// Job phase as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Colour hint for the status line, derived from its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Started,
    Finished,
    Neutral,
}

/// Snapshot of the user-facing status
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusState {
    pub phase: Phase,

    /// Always within `0..=100`
    pub progress_percent: u8,

    /// Latest status line, stored verbatim
    pub message: String,

    /// Error banner, set on failure
    pub error_message: Option<String>,

    /// Whether a request is in flight
    pub processing: bool,
}

/// Side effect the owner of the channel must carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEffect {
    /// Clear the form and call [`StatusChannel::complete_reset`] after the delay
    ScheduleFormReset(Duration),
}

/// Vocabulary and timing of the status channel
#[derive(Debug, Clone)]
pub struct StatusSettings {
    /// Status messages that mean the job finished
    pub completion_messages: Vec<String>,
    pub success_message: String,
    pub error_message: String,
    pub reset_delay: Duration,
}

impl StatusSettings {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            completion_messages: config.completion_messages.clone(),
            success_message: config.success_message.clone(),
            error_message: config.error_message.clone(),
            reset_delay: Duration::from_millis(config.reset_delay_ms),
        }
    }

    fn is_completion(&self, message: &str) -> bool {
        self.completion_messages.iter().any(|m| m == message)
    }
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

/// Status state machine for one export run
#[derive(Debug)]
pub struct StatusChannel {
    settings: StatusSettings,
    state: StatusState,
    /// A completion was already seen this run; later ones schedule nothing
    completed: bool,
}

impl StatusChannel {
    pub fn new(settings: StatusSettings) -> Self {
        Self {
            settings,
            state: StatusState::default(),
            completed: false,
        }
    }

    /// Start a new run: processing, no error, zero progress
    pub fn begin(&mut self) {
        self.state = StatusState {
            phase: Phase::Running,
            processing: true,
            ..StatusState::default()
        };
        self.completed = false;
    }

    /// Apply one notification
    ///
    /// Returns the reset to schedule when the notification completes the run.
    /// The reset is returned at most once per run.
    pub fn apply(&mut self, notification: Notification) -> Option<StatusEffect> {
        match notification {
            Notification::Status { message } => {
                self.state.message = message;
                if self.settings.is_completion(&self.state.message) {
                    self.succeed()
                } else if self.state.message.contains("error") {
                    let reason = self.state.message.clone();
                    self.fail(&reason);
                    None
                } else {
                    None
                }
            }
            Notification::Progress { percent } => {
                if self.state.phase == Phase::Failed {
                    tracing::debug!(percent, "Ignoring progress after failure");
                } else {
                    self.state.progress_percent = clamp_percent(percent);
                }
                None
            }
            Notification::State { state, message } => {
                if let Some(message) = message {
                    self.state.message = message;
                }
                match state {
                    JobState::Running => {
                        if self.state.phase == Phase::Idle {
                            self.state.phase = Phase::Running;
                            self.state.processing = true;
                        }
                        None
                    }
                    JobState::Succeeded => self.succeed(),
                    JobState::Failed => {
                        let reason = self.state.message.clone();
                        self.fail(&reason);
                        None
                    }
                }
            }
        }
    }

    /// Mark the run failed
    ///
    /// `reason` is logged; the user sees the static error message.
    pub fn fail(&mut self, reason: &str) {
        tracing::warn!(reason = %reason, "Export job failed");
        self.state.phase = Phase::Failed;
        self.state.processing = false;
        self.state.error_message = Some(self.settings.error_message.clone());
    }

    /// Finish a run that produced no completion notification (merge mode)
    pub fn finish(&mut self) {
        self.state.phase = Phase::Succeeded;
        self.state.processing = false;
        self.state.progress_percent = 100;
        self.state.message = self.settings.success_message.clone();
        self.completed = true;
    }

    /// Second half of a completion, once the reset delay elapsed
    pub fn complete_reset(&mut self) {
        self.state.progress_percent = 0;
        self.state.message = self.settings.success_message.clone();
    }

    pub fn state(&self) -> &StatusState {
        &self.state
    }

    pub fn settings(&self) -> &StatusSettings {
        &self.settings
    }

    /// Colour hint for the current status line
    pub fn tone(&self) -> StatusTone {
        tone_of(&self.state.message, &self.settings.success_message)
    }

    fn succeed(&mut self) -> Option<StatusEffect> {
        self.state.phase = Phase::Succeeded;
        self.state.processing = false;
        self.state.progress_percent = 100;

        if self.completed {
            return None;
        }
        self.completed = true;
        Some(StatusEffect::ScheduleFormReset(self.settings.reset_delay))
    }
}

/// Colour hint for a status line
pub fn tone_of(message: &str, success_message: &str) -> StatusTone {
    if message.contains("start") {
        StatusTone::Started
    } else if message.contains("end") || message == success_message {
        StatusTone::Finished
    } else {
        StatusTone::Neutral
    }
}

fn clamp_percent(percent: f64) -> u8 {
    percent.round().clamp(0.0, 100.0) as u8
}
