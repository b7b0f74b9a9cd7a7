//! HTTP surface of the aggregator
//!
//! ## Endpoints
//!
//! - `GET /check_latency?module=` - Status code and latency per target
//! - `GET /check_availability?module=` - Reachability per target
//! - `GET /render_graph?metric=&module=&period=` - Dashboard series
//! - `GET /health` - Health check of the aggregator itself

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:5000"); port 0 picks a free port
    pub bind_addr: SocketAddr,

    /// Enable CORS for dashboards
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ApiConfig {
    fn from(config: &Config) -> Self {
        Self {
            bind_addr: config.bind_addr,
            enable_cors: config.enable_cors,
        }
    }
}

/// Build the router with all routes
pub fn router(state: ApiState, enable_cors: bool) -> Router {
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/check_latency", get(routes::checks::check_latency))
        .route("/check_availability", get(routes::checks::check_availability))
        .route("/render_graph", get(routes::graph::render_graph))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app.layer(cors)
    } else {
        app
    }
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);
    let targets: Vec<_> = state.aggregator.registry().names().collect();
    info!(?targets, "monitoring {} targets", targets.len());

    let app = router(state, config.enable_cors);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    // Spawn server in background
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
