//! Failure simulators, one per axis
//!
//! Each simulator is constructed from the immutable `FailureConfig` and
//! emits its log sequence through the sink it is handed. Axes are
//! independent: a handler exercises only the simulators relevant to the
//! operation it implements, and enabling one axis never changes the
//! behavior of another.

pub mod auth;
pub mod database;
pub mod email;
pub mod payment;

#[cfg(test)]
mod tests;

pub use auth::AuthSimulator;
pub use database::{DB_RETRY_ATTEMPTS, DB_RETRY_DELAY, DatabaseSimulator};
pub use email::EmailSimulator;
pub use payment::{PAYMENT_TIMEOUT, PaymentReceipt, PaymentSimulator};
