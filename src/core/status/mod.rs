//! Job status tracking
//!
//! - [`notification`] - typed backend notifications
//! - [`channel`] - the status state machine
//! - [`monitor`] - the async loop feeding the state machine

pub mod channel;
pub mod monitor;
pub mod notification;

pub use channel::{
    tone_of, Phase, StatusChannel, StatusEffect, StatusSettings, StatusState, StatusTone,
};
pub use monitor::{MonitorOutcome, StatusMonitor};
pub use notification::{JobState, Notification};
