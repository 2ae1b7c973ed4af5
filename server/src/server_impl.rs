//! Main server implementation
//!
//! Owns startup sequencing (the lifecycle controller), the axum router,
//! and the request handlers that compose the failure simulators. Each
//! handler consults only the axes relevant to its operation; failure
//! paths always log before returning.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::config::FailureConfig;
use crate::error::{ServerError, ServerResult};
use crate::lifecycle::Phase;
use crate::state::AppState;
use crate::types::{LoginRequest, NotifyRequest, OrderRequest, RegisterRequest};
use shared::LogSink;

pub struct Server {
    state: Arc<AppState>,
    phase: Phase,
}

impl Server {
    pub fn new(config: FailureConfig, sink: Arc<LogSink>) -> Self {
        Self::with_state(AppState::new(config, sink))
    }

    /// Build from pre-constructed state; tests use this to shorten the
    /// simulator delays
    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            phase: Phase::Created,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    fn transition(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid lifecycle transition {} -> {}",
            self.phase,
            next
        );
        tracing::debug!("Lifecycle transition: {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Run startup sequencing: database initialization, then the
    /// critical-failure check.
    ///
    /// A database-axis failure at startup is logged in full but does not
    /// abort; the process keeps serving so every request surfaces the
    /// same sequence. The critical axis aborts before any listener is
    /// bound, so an external probe sees connection refusal rather than an
    /// error response.
    pub async fn initialize(&mut self) -> ServerResult<()> {
        self.transition(Phase::Initializing);
        let sink = &self.state.sink;

        let _ = self.state.database.initialize(sink).await;

        if self.state.config.critical_failure {
            sink.info("Shutting down gracefully...");
            sink.critical("Unable to initialize critical service: payment-service");
            self.transition(Phase::Aborted);
            return Err(ServerError::CriticalStartup {
                service: "payment-service".to_string(),
            });
        }

        self.transition(Phase::Running);
        Ok(())
    }

    /// Build the axum router over the shared state
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/register", post(register))
            .route("/login", post(login))
            .route("/order", post(place_order))
            .route("/notify", post(send_notification))
            .layer(
                ServiceBuilder::new()
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }

    /// Initialize, bind, and serve until `shutdown` resolves. In-flight
    /// handlers finish before the sink is flushed and the call returns.
    pub async fn run(
        mut self,
        addr: SocketAddr,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> ServerResult<()> {
        self.initialize().await?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Startup(format!("Failed to bind to {addr}: {e}")))?;

        self.state.sink.info(format!(
            "Starting e-commerce backend server on port {}",
            addr.port()
        ));
        tracing::info!("Listening on http://{addr}");

        let router = self.router();
        let state = self.state.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Startup(format!("Server error: {e}")))?;

        state.sink.info("Shutting down gracefully...");
        state.sink.flush();
        Ok(())
    }
}

// HTTP Handlers

/// Health check: healthy whenever this handler is reachable at all. A
/// critically aborted process never binds the listener, so probes fail to
/// connect instead of receiving an unhealthy response.
async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.sink.info("Health check requested");
    state.sink.info("Health check passed");

    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Local::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// User registration: the only handler on the database axis
async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> (StatusCode, Json<Value>) {
    let (Some(username), Some(_email), Some(_password)) =
        (request.username, request.email, request.password)
    else {
        state.sink.warning("Registration failed: missing required fields");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Missing required fields"})),
        );
    };

    state
        .sink
        .info(format!("Registration request received for user: {username}"));

    if let Err(e) = state.database.connect(&state.sink).await {
        tracing::debug!("Registration rejected: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Registration failed"})),
        );
    }

    let user_id = state.allocate_user_id();
    state
        .sink
        .info(format!("User registered successfully: user_id={user_id}"));
    (
        StatusCode::OK,
        Json(json!({"message": "User registered successfully", "user_id": user_id})),
    )
}

/// Login: consults the authentication axis only
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> (StatusCode, Json<Value>) {
    let (Some(username), Some(_password)) = (request.username, request.password) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Missing credentials"})),
        );
    };

    state
        .sink
        .info(format!("Login request received: username={username}"));

    match state.auth.issue_token(&state.sink, &username) {
        Ok(token) => {
            let user_id = state.allocate_user_id();
            state
                .sink
                .info(format!("User logged in successfully: user_id={user_id}"));
            (
                StatusCode::OK,
                Json(json!({"token": token, "user_id": user_id})),
            )
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        ),
    }
}

/// Order placement: authentication axis first, then payment. A rejected
/// token short-circuits before the payment simulator is ever invoked.
async fn place_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<OrderRequest>,
) -> (StatusCode, Json<Value>) {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if state.auth.validate_bearer(&state.sink, auth_header).is_err() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Authentication failed"})),
        );
    }

    let (Some(product_name), Some(amount)) = (request.product_name, request.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Missing order details"})),
        );
    };

    let order_id = state.allocate_order_id();
    state.sink.info(format!(
        "Order creation request: order_id={order_id}, product={product_name}"
    ));

    match state.payment.process(&state.sink, order_id, amount).await {
        Ok(receipt) => {
            state
                .sink
                .info(format!("Order completed successfully: order_id={order_id}"));
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Order created successfully",
                    "order_id": order_id,
                    "payment_status": "completed",
                    "transaction_id": receipt.transaction_id,
                })),
            )
        }
        Err(_) => (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({
                "message": "Order created but payment failed",
                "order_id": order_id,
                "payment_status": "failed",
            })),
        ),
    }
}

/// Notification delivery: authentication axis, then the email axis
async fn send_notification(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<NotifyRequest>,
) -> (StatusCode, Json<Value>) {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if state.auth.validate_bearer(&state.sink, auth_header).is_err() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Authentication failed"})),
        );
    }

    let (Some(email), Some(_message)) = (request.email, request.message) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Missing notification details"})),
        );
    };

    match state.email.send(&state.sink, &email) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"message": "Notification sent successfully"})),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Failed to send notification"})),
        ),
    }
}
