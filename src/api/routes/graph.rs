//! Graph rendering endpoint

use axum::{
    Json,
    extract::{Query, State},
};

use super::{QueryPairs, first_value};
use crate::api::{error::ApiResult, state::ApiState};
use crate::graph;
use crate::report::GraphResponse;

/// GET /render_graph
///
/// Series for a metric over a period. The module is validated and echoed but
/// does not select a different series.
pub async fn render_graph(
    State(state): State<ApiState>,
    Query(params): Query<QueryPairs>,
) -> ApiResult<Json<GraphResponse>> {
    let query = state
        .validator()
        .graph_query(
            first_value(&params, "metric"),
            first_value(&params, "module"),
            first_value(&params, "period"),
        )
        .inspect_err(|e| state.observer.request_rejected("render_graph", e))?;

    let provider = state.graphs.name();
    let series = graph::render(state.graphs.as_ref(), query)
        .await
        .inspect_err(|e| state.observer.graph_failed(provider, e))?;

    state.observer.graph_rendered(provider, &series);
    Ok(Json(GraphResponse::from(&series)))
}
