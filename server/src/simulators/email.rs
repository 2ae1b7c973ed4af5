//! Email axis: unreachable notification endpoint, single shot.

use crate::config::FailureConfig;
use crate::error::SimulatedFailure;
use shared::LogSink;

#[derive(Debug, Clone)]
pub struct EmailSimulator {
    active: bool,
}

impl EmailSimulator {
    pub fn from_config(config: &FailureConfig) -> Self {
        Self {
            active: config.email_failure,
        }
    }

    /// Send a notification email. Never retried; a failure is surfaced to
    /// the caller directly.
    pub fn send(&self, sink: &LogSink, recipient: &str) -> Result<(), SimulatedFailure> {
        sink.info(format!("Sending notification to {recipient}"));

        if self.active {
            sink.error("Email service connectivity problem");
            sink.error(format!("Failed to send notification email to {recipient}"));
            return Err(SimulatedFailure::EmailUnavailable);
        }

        sink.info(format!("Notification sent successfully to {recipient}"));
        Ok(())
    }
}
