//! Shared log contract for the failure-injection demo backend
//!
//! The backend and its tooling share exactly one thing: the analyzer log
//! format. That contract lives here — the record types, the fixed line
//! format, and the append-only sink that writes it.

pub mod errors;
pub mod logging;

pub use errors::{SharedError, SharedResult};
pub use logging::{LogLevel, LogRecord, LogSink};
