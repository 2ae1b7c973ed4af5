//! Shared per-process state
//!
//! Everything the request handlers touch concurrently: the immutable
//! configuration snapshot, the append-only log sink, the simulators
//! built from the configuration, and two id counters. Nothing else is
//! mutable, so handlers are safe to run in parallel.

use crate::config::FailureConfig;
use crate::simulators::{AuthSimulator, DatabaseSimulator, EmailSimulator, PaymentSimulator};
use shared::LogSink;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub struct AppState {
    pub config: FailureConfig,
    pub sink: Arc<LogSink>,
    pub database: DatabaseSimulator,
    pub payment: PaymentSimulator,
    pub auth: AuthSimulator,
    pub email: EmailSimulator,
    started_at: Instant,
    next_user_id: AtomicU64,
    next_order_id: AtomicU64,
}

impl AppState {
    pub fn new(config: FailureConfig, sink: Arc<LogSink>) -> Self {
        Self {
            database: DatabaseSimulator::from_config(&config),
            payment: PaymentSimulator::from_config(&config),
            auth: AuthSimulator::from_config(&config),
            email: EmailSimulator::from_config(&config),
            config,
            sink,
            started_at: Instant::now(),
            next_user_id: AtomicU64::new(1),
            next_order_id: AtomicU64::new(1),
        }
    }

    /// Replace the database simulator; tests shorten the retry delay
    pub fn with_database(mut self, database: DatabaseSimulator) -> Self {
        self.database = database;
        self
    }

    /// Replace the payment simulator; tests shorten the timeout
    pub fn with_payment(mut self, payment: PaymentSimulator) -> Self {
        self.payment = payment;
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn allocate_user_id(&self) -> u64 {
        self.next_user_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn allocate_order_id(&self) -> u64 {
        self.next_order_id.fetch_add(1, Ordering::Relaxed)
    }
}
