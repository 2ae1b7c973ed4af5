//! Server-specific error types
//!
//! Two tiers: `SimulatedFailure` for the outcomes the failure simulators
//! surface to request handlers, and `ServerError` for process-level
//! failures. The database axis is the only transient one — it is retried
//! internally up to the fixed bound and then surfaced as a terminal
//! request error. Critical startup failures are never caught; they
//! propagate out of `main` so the pipeline observes a real crash.

use thiserror::Error;

/// Failure outcomes produced by the failure simulators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulatedFailure {
    #[error("Database connection failed after {attempts} attempts")]
    DatabaseUnavailable { attempts: u32 },

    #[error("Payment service timeout")]
    PaymentTimeout,

    #[error("Authentication failed")]
    AuthenticationRejected,

    #[error("Email service unreachable")]
    EmailUnavailable,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Unable to initialize critical service: {service}")]
    CriticalStartup { service: String },

    #[error("Server startup error: {0}")]
    Startup(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log sink error: {0}")]
    Shared(#[from] shared::SharedError),

    #[error(transparent)]
    Simulated(#[from] SimulatedFailure),
}

pub type ServerResult<T> = Result<T, ServerError>;
