//! Authentication axis: bearer tokens are accepted or rejected
//! syntactically. There is no session store; rejection is a function of
//! the switch and the header shape alone.

use crate::config::FailureConfig;
use crate::error::SimulatedFailure;
use shared::LogSink;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AuthSimulator {
    active: bool,
}

impl AuthSimulator {
    pub fn from_config(config: &FailureConfig) -> Self {
        Self {
            active: config.auth_failure,
        }
    }

    /// Issue a bearer token for a login, unless the axis is active
    pub fn issue_token(&self, sink: &LogSink, username: &str) -> Result<String, SimulatedFailure> {
        if self.active {
            sink.error(format!(
                "Authentication failed: invalid credentials for user {username}"
            ));
            return Err(SimulatedFailure::AuthenticationRejected);
        }
        Ok(Uuid::new_v4().to_string())
    }

    /// Validate an `Authorization: Bearer <token>` header value.
    ///
    /// Rejects a missing header, a header not using the Bearer scheme, an
    /// empty token, and — while the axis is active — any token at all.
    pub fn validate_bearer(
        &self,
        sink: &LogSink,
        header: Option<&str>,
    ) -> Result<String, SimulatedFailure> {
        let Some(header) = header else {
            sink.warning("Missing authorization token");
            return Err(SimulatedFailure::AuthenticationRejected);
        };

        let token = header.strip_prefix("Bearer ").unwrap_or("");
        if token.is_empty() {
            sink.error(format!("Invalid token detected: {}...", truncate(header)));
            return Err(SimulatedFailure::AuthenticationRejected);
        }

        if self.active {
            sink.error(format!(
                "Authentication failed: token validation failing, token={}...",
                truncate(token)
            ));
            return Err(SimulatedFailure::AuthenticationRejected);
        }

        Ok(token.to_string())
    }
}

// Tokens never appear in full in the log stream
fn truncate(value: &str) -> String {
    value.chars().take(20).collect()
}
