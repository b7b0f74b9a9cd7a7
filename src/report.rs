//! Report formatting
//!
//! Wire shapes for the HTTP surface and the pure conversions into them. The
//! internal model can change without touching these types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::aggregator::AggregationReport;
use crate::graph::{GraphSeries, Metric, Period, Sample};
use crate::probe::ErrorKind;

// ============================================================================
// Response types
// ============================================================================

/// Per-target entry of GET /check_latency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyResult {
    /// `null` when no response was received
    pub status_code: Option<u16>,
    pub latency_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

/// Response for GET /check_latency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyResponse {
    pub module: String,
    /// Keyed by target name in registry order
    pub results: IndexMap<String, LatencyResult>,
    pub total_latency_ms: f64,
    pub timestamp: String,
}

/// Response for GET /check_availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub module: String,
    /// Keyed by target name in registry order
    pub availability: IndexMap<String, bool>,
    pub total_latency_ms: f64,
    pub timestamp: String,
}

/// Response for GET /render_graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResponse {
    pub metric: Metric,
    pub module: String,
    pub period: Period,
    pub data: Vec<Sample>,
    pub timestamp: String,
}

/// Response for GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<&AggregationReport> for LatencyResponse {
    fn from(report: &AggregationReport) -> Self {
        let results = report
            .results
            .iter()
            .map(|outcome| {
                (
                    outcome.target_name.clone(),
                    LatencyResult {
                        status_code: outcome.status_code,
                        latency_ms: outcome.latency_ms,
                        error: outcome.error_kind,
                    },
                )
            })
            .collect();

        Self {
            module: report.selector.to_string(),
            results,
            total_latency_ms: report.total_latency_ms,
            timestamp: report.timestamp.to_rfc3339(),
        }
    }
}

impl From<&AggregationReport> for AvailabilityResponse {
    fn from(report: &AggregationReport) -> Self {
        Self {
            module: report.selector.to_string(),
            availability: report.availability().into_iter().collect(),
            total_latency_ms: report.total_latency_ms,
            timestamp: report.timestamp.to_rfc3339(),
        }
    }
}

impl From<&GraphSeries> for GraphResponse {
    fn from(series: &GraphSeries) -> Self {
        Self {
            metric: series.query.metric,
            module: series.query.module.to_string(),
            period: series.query.period,
            data: series.data.clone(),
            timestamp: series.timestamp.to_rfc3339(),
        }
    }
}
