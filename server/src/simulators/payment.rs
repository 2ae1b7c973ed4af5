//! Payment axis: a call to the payment endpoint that never returns
//! within the fixed bound. Single shot, never retried.

use crate::config::FailureConfig;
use crate::error::SimulatedFailure;
use shared::LogSink;
use std::time::Duration;

/// Fixed bound the simulated payment call blocks for before giving up
pub const PAYMENT_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Clone)]
pub struct PaymentSimulator {
    active: bool,
    api_url: String,
    timeout: Duration,
}

/// Result of a successful payment call
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub transaction_id: String,
}

impl PaymentSimulator {
    pub fn from_config(config: &FailureConfig) -> Self {
        Self {
            active: config.payment_timeout,
            api_url: config.payment_api_url.clone(),
            timeout: PAYMENT_TIMEOUT,
        }
    }

    /// Override the fixed timeout; used by tests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Charge an order. When the axis is active the call stalls for the
    /// full timeout bound and then fails; the caller's latency is part of
    /// the simulated realism.
    pub async fn process(
        &self,
        sink: &LogSink,
        order_id: u64,
        amount: f64,
    ) -> Result<PaymentReceipt, SimulatedFailure> {
        sink.info(format!(
            "Processing payment for order {order_id}: amount=${amount}"
        ));

        if self.active {
            sink.info(format!("Calling payment service: POST {}/process", self.api_url));
            tokio::time::sleep(self.timeout).await;
            sink.error("Service 'payment-service' is not responding");
            return Err(SimulatedFailure::PaymentTimeout);
        }

        sink.info(format!("Payment completed for order {order_id}"));
        Ok(PaymentReceipt {
            transaction_id: format!("txn_{order_id}"),
        })
    }
}
