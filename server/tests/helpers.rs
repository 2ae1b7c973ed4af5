//! Test helpers: run the demo backend in-process on an ephemeral port

use server::simulators::{DatabaseSimulator, PaymentSimulator};
use server::{AppState, FailureConfig, Server};
use shared::{LogLevel, LogRecord, LogSink};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Short fixed delays so failure scenarios finish quickly
pub const TEST_RETRY_DELAY: Duration = Duration::from_millis(20);
pub const TEST_PAYMENT_TIMEOUT: Duration = Duration::from_millis(30);

pub struct TestServer {
    pub addr: SocketAddr,
    pub sink: Arc<LogSink>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Number of log lines emitted so far; scenarios snapshot this to
    /// ignore startup records
    pub fn record_count(&self) -> usize {
        self.sink.captured_lines().len()
    }

    /// Records emitted after the given baseline
    pub fn records_after(&self, baseline: usize) -> Vec<LogRecord> {
        let mut records = self.sink.captured_records();
        records.split_off(baseline.min(records.len()))
    }

    pub fn has_failure_records(&self) -> bool {
        self.sink
            .captured_records()
            .iter()
            .any(|r| r.level >= LogLevel::Error)
    }
}

/// Initialize a server for the given configuration and serve it on an
/// ephemeral port, capturing log lines in memory. Panics if startup
/// aborts; abort scenarios drive `Server::initialize` directly instead.
pub async fn spawn_server(config: FailureConfig) -> TestServer {
    let sink = Arc::new(LogSink::in_memory());
    let database = DatabaseSimulator::from_config(&config).with_retry_delay(TEST_RETRY_DELAY);
    let payment = PaymentSimulator::from_config(&config).with_timeout(TEST_PAYMENT_TIMEOUT);
    let state = AppState::new(config, sink.clone())
        .with_database(database)
        .with_payment(payment);

    let mut server = Server::with_state(state);
    server.initialize().await.expect("startup aborted");
    let router = server.router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        addr,
        sink,
        client: reqwest::Client::new(),
    }
}

/// Log in and return a bearer token; requires the auth axis to be off
pub async fn obtain_token(ts: &TestServer) -> String {
    let response = ts
        .client
        .post(ts.url("/login"))
        .json(&serde_json::json!({"username": "alice", "password": "secret"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}
