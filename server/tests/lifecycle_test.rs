//! Startup sequencing and the critical-failure abort path

use server::simulators::DatabaseSimulator;
use server::{AppState, FailureConfig, Phase, Server, ServerError};
use shared::{LogLevel, LogSink};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

fn critical_config() -> FailureConfig {
    FailureConfig {
        critical_failure: true,
        ..FailureConfig::default()
    }
}

#[tokio::test]
async fn test_startup_reaches_running_when_critical_switch_off() {
    let sink = Arc::new(LogSink::in_memory());
    let mut server = Server::new(FailureConfig::default(), sink.clone());
    assert_eq!(server.phase(), Phase::Created);

    server.initialize().await.unwrap();

    assert_eq!(server.phase(), Phase::Running);
    let records = sink.captured_records();
    assert!(records.iter().all(|r| r.level < LogLevel::Error));
    assert!(
        records
            .iter()
            .any(|r| r.message == "Database initialized successfully")
    );
}

#[tokio::test]
async fn test_critical_failure_aborts_with_exactly_one_critical_record() {
    let sink = Arc::new(LogSink::in_memory());
    let mut server = Server::new(critical_config(), sink.clone());

    let err = server.initialize().await.unwrap_err();

    assert!(matches!(err, ServerError::CriticalStartup { .. }));
    assert_eq!(server.phase(), Phase::Aborted);

    let criticals: Vec<_> = sink
        .captured_records()
        .into_iter()
        .filter(|r| r.level == LogLevel::Critical)
        .collect();
    assert_eq!(criticals.len(), 1);
    assert_eq!(
        criticals[0].message,
        "Unable to initialize critical service: payment-service"
    );
}

#[tokio::test]
async fn test_run_returns_before_binding_on_critical_failure() {
    let sink = Arc::new(LogSink::in_memory());
    let server = Server::new(critical_config(), sink);
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();

    // A live server would keep serving here; an aborted one errors out
    // before the listener is ever bound
    let result = server.run(addr, std::future::pending::<()>()).await;

    assert!(matches!(result, Err(ServerError::CriticalStartup { .. })));
}

#[tokio::test]
async fn test_database_failure_is_logged_before_critical_abort() {
    let config = FailureConfig {
        db_failure: true,
        critical_failure: true,
        ..FailureConfig::default()
    };
    let sink = Arc::new(LogSink::in_memory());
    let database = DatabaseSimulator::from_config(&config).with_retry_delay(Duration::from_millis(5));
    let state = AppState::new(config, sink.clone()).with_database(database);
    let mut server = Server::with_state(state);

    assert!(server.initialize().await.is_err());
    assert_eq!(server.phase(), Phase::Aborted);

    let records = sink.captured_records();
    assert!(
        records
            .iter()
            .any(|r| r.message.contains("Retrying database connection"))
    );
    // The abort record closes the stream
    assert_eq!(
        records.last().unwrap().message,
        "Unable to initialize critical service: payment-service"
    );
}
