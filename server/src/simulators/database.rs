//! Database axis: connection failure with bounded retries
//!
//! The retry policy is fixed (3 attempts, fixed delay) so the emitted log
//! shows the escalating WARNING/ERROR pattern the downstream analyzer
//! classifies as a cascading failure. The sequence is a contract, not an
//! accident; change it only together with the analyzer.

use crate::config::FailureConfig;
use crate::error::SimulatedFailure;
use shared::LogSink;
use std::time::Duration;

/// Fixed retry bound for the database axis
pub const DB_RETRY_ATTEMPTS: u32 = 3;

/// Fixed per-attempt delay; the synchronous stall is intentional so log
/// timestamps show realistic latency
pub const DB_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct DatabaseSimulator {
    active: bool,
    url: String,
    retry_delay: Duration,
}

impl DatabaseSimulator {
    pub fn from_config(config: &FailureConfig) -> Self {
        Self {
            active: config.db_failure,
            url: config.database_url.clone(),
            retry_delay: DB_RETRY_DELAY,
        }
    }

    /// Override the fixed retry delay; used by tests
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Attempt the database connection, retrying up to the fixed bound.
    ///
    /// When the axis is active every attempt fails and the full
    /// escalation sequence is emitted before the terminal error is
    /// returned. The retry state lives only for this invocation.
    pub async fn connect(&self, sink: &LogSink) -> Result<(), SimulatedFailure> {
        if !self.active {
            sink.info(format!("Connected to database at {}", self.url));
            return Ok(());
        }

        sink.error("Database connection failed: could not connect to database server");
        for attempt in 1..=DB_RETRY_ATTEMPTS {
            sink.warning(format!(
                "Retrying database connection (attempt {attempt}/{DB_RETRY_ATTEMPTS})"
            ));
            tokio::time::sleep(self.retry_delay).await;
            sink.error("Database connection failed: could not connect to database server");
        }
        sink.critical(format!(
            "Database connection failed after {DB_RETRY_ATTEMPTS} retries"
        ));

        Err(SimulatedFailure::DatabaseUnavailable {
            attempts: DB_RETRY_ATTEMPTS,
        })
    }

    /// Startup-time initialization: same retry policy as `connect`
    pub async fn initialize(&self, sink: &LogSink) -> Result<(), SimulatedFailure> {
        sink.info("Initializing database...");
        self.connect(sink).await?;
        sink.info("Database initialized successfully");
        Ok(())
    }
}
