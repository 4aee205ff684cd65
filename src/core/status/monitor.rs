//! Status monitor
//!
//! Single state-update loop for a streaming export: notifications arrive on
//! an mpsc channel, are applied to the [`StatusChannel`] one at a time, and
//! every resulting state is published on a watch channel. The monitor also
//! owns the export form so it can clear it when the post-completion reset
//! fires.

use super::channel::{Phase, StatusChannel, StatusEffect, StatusSettings, StatusState};
use super::notification::Notification;
use crate::domain::ExportForm;
use std::future;
use std::pin::Pin;
use tokio::sync::{mpsc, watch};
use tokio::time::Sleep;

/// Final state of a monitored run
#[derive(Debug, Clone)]
pub struct MonitorOutcome {
    pub state: StatusState,

    /// The form as left by the run (blank once the reset fired)
    pub form: ExportForm,

    pub resets_fired: usize,

    /// Stopped by the shutdown signal
    pub interrupted: bool,
}

impl MonitorOutcome {
    pub fn is_successful(&self) -> bool {
        self.state.phase == Phase::Succeeded
    }
}

enum MonitorEvent {
    Notification(Option<Notification>),
    ResetDue,
    Shutdown(bool),
}

/// Drives a [`StatusChannel`] from a notification stream
pub struct StatusMonitor {
    channel: StatusChannel,
    form: ExportForm,
    snapshots: watch::Sender<StatusState>,
}

impl StatusMonitor {
    /// Create a monitor and a receiver that observes every state change
    pub fn new(settings: StatusSettings, form: ExportForm) -> (Self, watch::Receiver<StatusState>) {
        let channel = StatusChannel::new(settings);
        let (snapshots, receiver) = watch::channel(channel.state().clone());
        (
            Self {
                channel,
                form,
                snapshots,
            },
            receiver,
        )
    }

    /// Mark the run as submitted
    pub fn begin(&mut self) {
        self.channel.begin();
        self.publish();
    }

    /// Fail the run without waiting for notifications (request rejected)
    pub fn fail(mut self, reason: &str) -> MonitorOutcome {
        self.channel.fail(reason);
        self.publish();
        MonitorOutcome {
            state: self.channel.state().clone(),
            form: self.form,
            resets_fired: 0,
            interrupted: false,
        }
    }

    pub fn state(&self) -> &StatusState {
        self.channel.state()
    }

    /// Consume notifications until the run is over
    ///
    /// The loop ends when the run failed, when the post-completion reset has
    /// fired, when the stream closed with no reset pending, or on shutdown.
    /// A reset scheduled before a failure still fires; no notification is
    /// consumed after the failure.
    pub async fn run(
        mut self,
        mut notifications: mpsc::Receiver<Notification>,
        mut shutdown: watch::Receiver<bool>,
    ) -> MonitorOutcome {
        let mut reset: Option<Pin<Box<Sleep>>> = None;
        let mut resets_fired = 0usize;
        let mut stream_open = true;
        let mut shutdown_live = true;
        let mut interrupted = *shutdown.borrow();

        while !interrupted {
            let failed = self.channel.state().phase == Phase::Failed;
            if failed && reset.is_none() {
                break;
            }
            if reset.is_none() && (resets_fired > 0 || !stream_open) {
                break;
            }

            let event = tokio::select! {
                notification = notifications.recv(), if stream_open && !failed => {
                    MonitorEvent::Notification(notification)
                }
                _ = wait_reset(&mut reset) => MonitorEvent::ResetDue,
                changed = shutdown.changed(), if shutdown_live => {
                    MonitorEvent::Shutdown(changed.is_ok() && *shutdown.borrow())
                }
            };

            match event {
                MonitorEvent::Notification(Some(notification)) => {
                    tracing::debug!(event = notification.event_name(), "Notification received");
                    if let Some(StatusEffect::ScheduleFormReset(delay)) =
                        self.channel.apply(notification)
                    {
                        tracing::info!(
                            delay_ms = delay.as_millis() as u64,
                            "Export job completed, scheduling form reset"
                        );
                        reset = Some(Box::pin(tokio::time::sleep(delay)));
                    }
                    self.publish();
                }
                MonitorEvent::Notification(None) => {
                    tracing::debug!("Notification stream closed");
                    stream_open = false;
                }
                MonitorEvent::ResetDue => {
                    reset = None;
                    self.form.reset();
                    self.channel.complete_reset();
                    resets_fired += 1;
                    self.publish();
                }
                MonitorEvent::Shutdown(true) => {
                    tracing::info!("Shutdown requested, stopping status monitor");
                    interrupted = true;
                }
                MonitorEvent::Shutdown(false) => {
                    if shutdown.has_changed().is_err() {
                        shutdown_live = false;
                    }
                }
            }
        }

        MonitorOutcome {
            state: self.channel.state().clone(),
            form: self.form,
            resets_fired,
            interrupted,
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.channel.state().clone());
    }
}

async fn wait_reset(reset: &mut Option<Pin<Box<Sleep>>>) {
    match reset {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}
