//! Health check endpoint

use crate::report::HealthResponse;
use axum::Json;

/// GET /health
///
/// The aggregator answers the same contract it probes its targets with
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
