//! Shared error types for the log contract

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Malformed log record: {line}")]
    MalformedRecord { line: String },

    #[error("Unknown log level: {token}")]
    UnknownLevel { token: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SharedResult<T> = Result<T, SharedError>;
