//! Campaign Dashboard API Server
//!
//! REST API for ingesting campaign data points and serving their analysis.

use anyhow::Context;
use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use data_validator::Validator;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::{Repository, SessionStore};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod auth;
pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Application state shared across handlers
pub struct AppState {
    /// Data point and user storage
    pub repository: Repository,
    /// Bearer-token sessions
    pub sessions: SessionStore,
    /// Payload and CSV validation
    pub validator: Validator,
    /// Prometheus handle, when an exporter is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            repository: Repository::new(),
            sessions: SessionStore::new(config.session_ttl()),
            validator: Validator::new(config.validation.clone()),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub counts: StoreCounts,
}

/// Record counts
#[derive(Debug, Serialize)]
pub struct StoreCounts {
    pub data_points: usize,
    pub users: usize,
    pub sessions: usize,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let protected = Router::new()
        .route(
            "/api/data-points",
            get(routes::data_points::list_data_points).post(routes::data_points::create_data_point),
        )
        .route("/api/data-points/csv", post(routes::data_points::upload_csv))
        .route("/api/analysis", get(routes::analysis::get_analysis))
        .route("/api/user", get(routes::account::current_user))
        .route("/api/logout", post(routes::account::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/register", post(routes::account::register))
        .route("/api/login", post(routes::account::login))
        .route("/metrics", get(routes::telemetry::render_metrics))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Router plus the optional rate limiter from config
pub fn build_app(state: SharedState, config: &ServerConfig) -> anyhow::Result<Router> {
    let router = create_router(state);
    match &config.rate_limit {
        Some(limits) => rate_limit::with_rate_limit(router, limits)
            .context("rate_limit.per_second and rate_limit.burst_size must be non-zero"),
        None => Ok(router),
    }
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> ApiResult<Json<HealthResponse>> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        counts: StoreCounts {
            data_points: state.repository.data_point_count()?,
            users: state.repository.user_count()?,
            sessions: state.sessions.len()?,
        },
    }))
}

/// Initialize logging
pub fn init_logging(config: &ServerConfig) -> anyhow::Result<()> {
    let level: Level = config
        .log_level
        .parse()
        .with_context(|| format!("Invalid log_level '{}'", config.log_level))?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let installed = if config.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("Failed to set tracing subscriber")
}

/// Periodically drop expired sessions
fn spawn_session_purger(state: SharedState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match state.sessions.purge_expired() {
                Ok(0) => {}
                Ok(purged) => debug!("Purged {} expired sessions", purged),
                Err(e) => warn!("Session purge failed: {}", e),
            }
        }
    });
}

/// Run the server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let state = Arc::new(AppState::new(&config).with_metrics(metrics));
    spawn_session_purger(state.clone());
    let app = build_app(state, &config)?;

    let addr = config.bind_addr();
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
