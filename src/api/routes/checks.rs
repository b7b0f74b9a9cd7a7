//! Latency and availability checks

use axum::{
    Json,
    extract::{Query, State},
};

use super::{QueryPairs, first_value};
use crate::aggregator::AggregationReport;
use crate::api::{error::ApiResult, state::ApiState};
use crate::report::{AvailabilityResponse, LatencyResponse};

/// Validate the selector, then run the fan-out
async fn run_checks(
    state: &ApiState,
    endpoint: &str,
    query: &[(String, String)],
) -> ApiResult<AggregationReport> {
    let selector = state
        .validator()
        .module(first_value(query, "module"))
        .inspect_err(|e| state.observer.request_rejected(endpoint, e))?;

    let report = state
        .aggregator
        .aggregate(&selector)
        .await
        .inspect_err(|e| state.observer.aggregation_failed(&selector, e))?;

    Ok(report)
}

/// GET /check_latency
///
/// Status code and latency of every selected target
pub async fn check_latency(
    State(state): State<ApiState>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<LatencyResponse>> {
    let report = run_checks(&state, "check_latency", &query).await?;
    Ok(Json(LatencyResponse::from(&report)))
}

/// GET /check_availability
///
/// Reachability of every selected target
pub async fn check_availability(
    State(state): State<ApiState>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let report = run_checks(&state, "check_availability", &query).await?;
    Ok(Json(AvailabilityResponse::from(&report)))
}
