//! Demo e-commerce backend with configurable failure injection
//!
//! Five environment switches toggle independent simulated failure axes
//! (database, payment, authentication, email, critical startup). Every
//! handler and simulator action appends to the analyzer log stream
//! defined in the `shared` crate; that file is the handoff artifact the
//! downstream log analyzer consumes.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod server_impl;
pub mod simulators;
pub mod state;
pub mod types;

// Re-export main types
pub use config::FailureConfig;
pub use error::{ServerError, ServerResult, SimulatedFailure};
pub use lifecycle::Phase;
pub use server_impl::Server;
pub use state::AppState;
