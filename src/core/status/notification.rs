//! Typed backend job notifications
//!
//! The backend emits named events with a JSON payload. They are parsed here
//! into [`Notification`] variants before reaching the status channel, so the
//! channel never sees raw JSON.

use crate::domain::NotificationParseError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Structured job state reported by the `state` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Running => write!(f, "running"),
            JobState::Succeeded => write!(f, "succeeded"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

/// One notification from the backend job
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Legacy free-text status line (`status {message}`)
    Status { message: String },

    /// Percent progress (`progress {percent}`), not yet clamped
    Progress { percent: f64 },

    /// Structured state (`state {state, message?}`)
    State {
        state: JobState,
        message: Option<String>,
    },
}

impl Notification {
    pub fn status(message: impl Into<String>) -> Self {
        Notification::Status {
            message: message.into(),
        }
    }

    pub fn progress(percent: f64) -> Self {
        Notification::Progress { percent }
    }

    /// Parse a named event and its payload
    ///
    /// Accepted shapes:
    ///
    /// - `status`: `{"message": "..."}` or a bare string
    /// - `progress`: `{"percent": 42}` or a bare number; numeric strings are accepted
    /// - `state`: `{"state": "running"|"succeeded"|"failed", "message"?: "..."}`,
    ///   or `{"state": "progress", "percent": n}` which maps to a progress notification
    ///
    /// # Errors
    ///
    /// [`NotificationParseError`] for unknown events and malformed payloads.
    pub fn parse(event: &str, data: &Value) -> Result<Self, NotificationParseError> {
        match event {
            "status" => {
                let message = match data {
                    Value::String(s) => s.clone(),
                    Value::Object(map) => map
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .ok_or_else(|| invalid(event, "missing string field 'message'"))?,
                    _ => return Err(invalid(event, "expected an object or a string")),
                };
                Ok(Notification::Status { message })
            }
            "progress" => {
                let raw = match data {
                    Value::Object(map) => map
                        .get("percent")
                        .ok_or_else(|| invalid(event, "missing field 'percent'"))?,
                    other => other,
                };
                Ok(Notification::Progress {
                    percent: parse_percent(event, raw)?,
                })
            }
            "state" => {
                let map = data
                    .as_object()
                    .ok_or_else(|| invalid(event, "expected an object"))?;
                let state = map
                    .get("state")
                    .and_then(Value::as_str)
                    .ok_or_else(|| invalid(event, "missing string field 'state'"))?;
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);

                let state = match state {
                    "running" => JobState::Running,
                    "succeeded" => JobState::Succeeded,
                    "failed" => JobState::Failed,
                    "progress" => {
                        let raw = map
                            .get("percent")
                            .ok_or_else(|| invalid(event, "progress state without 'percent'"))?;
                        return Ok(Notification::Progress {
                            percent: parse_percent(event, raw)?,
                        });
                    }
                    other => {
                        return Err(invalid(event, &format!("unknown state '{other}'")));
                    }
                };
                Ok(Notification::State { state, message })
            }
            other => Err(NotificationParseError::UnknownEvent(other.to_string())),
        }
    }

    /// Event name on the wire
    pub fn event_name(&self) -> &'static str {
        match self {
            Notification::Status { .. } => "status",
            Notification::Progress { .. } => "progress",
            Notification::State { .. } => "state",
        }
    }
}

fn parse_percent(event: &str, raw: &Value) -> Result<f64, NotificationParseError> {
    let percent = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid(event, "percent is not a number"))?;

    if !percent.is_finite() {
        return Err(invalid(event, "percent is not finite"));
    }
    Ok(percent)
}

fn invalid(event: &str, reason: &str) -> NotificationParseError {
    NotificationParseError::InvalidPayload {
        event: event.to_string(),
        reason: reason.to_string(),
    }
}
