//! API error types and conversions

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::aggregator::AggregationError;
use crate::graph::GraphError;
use crate::validator::QueryError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// A query parameter is outside its legal set
    InvalidParameter { field: &'static str, value: String },

    /// Aggregation or graph assembly failed unexpectedly
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidParameter { field, value } => {
                let body = Json(json!({
                    "error": format!("Invalid {field} parameter"),
                    "field": field,
                    "value": value,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(msg) => {
                let body = Json(json!({
                    "error": msg,
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidParameter { field, value } => {
                ApiError::InvalidParameter { field, value }
            }
        }
    }
}

impl From<AggregationError> for ApiError {
    fn from(err: AggregationError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
