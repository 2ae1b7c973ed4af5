//! Demo backend entry point
//!
//! Reads the failure switches from the environment, opens the analyzer
//! log file, and serves until Ctrl+C. A critical-failure abort propagates
//! out of `main` so the process exits nonzero without ever listening.

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

use server::{FailureConfig, Server, ServerError, ServerResult};
use shared::LogSink;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "E-commerce demo backend with configurable failure injection")]
struct Args {
    /// Port for the HTTP server
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Analyzer log file path
    #[arg(long, default_value = "logs/application.log")]
    log_file: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ServerResult<()> {
    let args = Args::parse();

    // Load .env before reading the failure switches
    let _ = dotenv::dotenv();

    shared::logging::init_tracing(&args.log_level);

    let config = FailureConfig::from_env();
    let sink = Arc::new(LogSink::to_file(&args.log_file)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", args.port)
        .parse()
        .map_err(|e| ServerError::Startup(format!("Invalid port: {e}")))?;

    Server::new(config, sink).run(addr, shutdown_signal()).await
}

/// Resolves on Ctrl+C; in-flight handlers finish before the process exits
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => tracing::error!("Signal handling failed: {e}"),
    }
}
