//! Graph data provider
//!
//! Supplies the historical series rendered on dashboards. The only provider
//! today is [`StaticGraphData`], a fixed lookup table; the [`GraphDataProvider`]
//! trait is the seam for a real time-series backend.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::ModuleSelector;

/// Metric a graph is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Latency,
    Availability,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Latency, Metric::Availability];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Latency => "latency",
            Metric::Availability => "availability",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look-back window of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Last5Days,
    Last7Days,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::Last5Days, Period::Last7Days];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Last5Days => "last5days",
            Period::Last7Days => "last7days",
        }
    }

    /// Number of samples a series for this period holds (one per day)
    pub fn sample_count(&self) -> usize {
        match self {
            Period::Last5Days => 5,
            Period::Last7Days => 7,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point of a series; the demo table and the wire format use whole numbers
pub type Sample = u32;

/// A validated graph request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQuery {
    pub metric: Metric,
    pub module: ModuleSelector,
    pub period: Period,
}

/// A rendered series, echoing the query it answers
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSeries {
    pub query: GraphQuery,
    pub data: Vec<Sample>,
    pub timestamp: DateTime<Utc>,
}

impl GraphSeries {
    /// Pair a provider's samples with their query
    ///
    /// Fails if the sample count does not match the period.
    pub fn new(query: GraphQuery, data: Vec<Sample>) -> GraphResult<Self> {
        let expected = query.period.sample_count();
        if data.len() != expected {
            return Err(GraphError::LengthMismatch {
                period: query.period,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            query,
            data,
            timestamp: Utc::now(),
        })
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug)]
pub enum GraphError {
    /// Provider returned the wrong number of samples for the period
    LengthMismatch {
        period: Period,
        expected: usize,
        actual: usize,
    },

    /// Backend-specific failure
    Backend(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::LengthMismatch {
                period,
                expected,
                actual,
            } => write!(
                f,
                "series for {period} has {actual} samples, expected {expected}"
            ),
            GraphError::Backend(msg) => write!(f, "graph backend error: {msg}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Source of historical series
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// request handler.
#[async_trait]
pub trait GraphDataProvider: Send + Sync {
    /// Samples for `metric` over `period`, oldest first
    async fn lookup(&self, metric: Metric, period: Period) -> GraphResult<Vec<Sample>>;

    /// Human-readable name of the provider
    fn name(&self) -> &str;
}

/// Fixed demo table
///
/// The module selector does not take part in the lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGraphData;

impl StaticGraphData {
    pub fn new() -> Self {
        Self
    }

    fn table(metric: Metric, period: Period) -> &'static [Sample] {
        match (metric, period) {
            (Metric::Availability, Period::Last5Days) => &[95, 96, 97, 95, 94],
            (Metric::Availability, Period::Last7Days) => &[94, 95, 96, 95, 93, 94, 92],
            (Metric::Latency, Period::Last5Days) => &[120, 110, 130, 115, 125],
            (Metric::Latency, Period::Last7Days) => &[125, 120, 130, 115, 135, 125, 140],
        }
    }
}

#[async_trait]
impl GraphDataProvider for StaticGraphData {
    async fn lookup(&self, metric: Metric, period: Period) -> GraphResult<Vec<Sample>> {
        Ok(Self::table(metric, period).to_vec())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Look up and assemble the series for a validated query
pub async fn render(provider: &dyn GraphDataProvider, query: GraphQuery) -> GraphResult<GraphSeries> {
    let data = provider.lookup(query.metric, query.period).await?;
    GraphSeries::new(query, data)
}
