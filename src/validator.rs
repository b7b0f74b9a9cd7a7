//! Query validation
//!
//! Every request parameter is checked here against its enumerated legal set
//! before any probe is dispatched. Comparison is case-insensitive: raw values
//! are lower-cased first and the normalized value is what the rest of the
//! system sees.

use std::fmt;

use crate::graph::{GraphQuery, Metric, Period};
use crate::registry::{ALL, ModuleSelector, TargetRegistry};

pub const MODULE_FIELD: &str = "module";
pub const METRIC_FIELD: &str = "metric";
pub const PERIOD_FIELD: &str = "period";

const DEFAULT_PERIOD: &str = "last5days";

pub type QueryResult<T> = Result<T, QueryError>;

/// Rejected request parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidParameter { field: &'static str, value: String },
}

impl QueryError {
    fn invalid(field: &'static str, value: &str) -> Self {
        QueryError::InvalidParameter {
            field,
            value: value.to_string(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            QueryError::InvalidParameter { field, .. } => field,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            QueryError::InvalidParameter { value, .. } => value,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidParameter { field, value } => {
                write!(f, "Invalid {field} parameter: '{value}'")
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Validates raw query strings against the registry and the fixed enums
#[derive(Debug, Clone, Copy)]
pub struct QueryValidator<'a> {
    registry: &'a TargetRegistry,
}

impl<'a> QueryValidator<'a> {
    pub fn new(registry: &'a TargetRegistry) -> Self {
        Self { registry }
    }

    /// `all` or a registered target name; missing means `all`
    pub fn module(&self, raw: Option<&str>) -> QueryResult<ModuleSelector> {
        let raw = raw.unwrap_or(ALL);
        let normalized = raw.to_lowercase();

        if normalized == ALL {
            Ok(ModuleSelector::All)
        } else if self.registry.contains(&normalized) {
            Ok(ModuleSelector::Target(normalized))
        } else {
            Err(QueryError::invalid(MODULE_FIELD, raw))
        }
    }

    /// `latency` or `availability`; there is no default
    pub fn metric(&self, raw: Option<&str>) -> QueryResult<Metric> {
        let raw = raw.unwrap_or_default();
        let normalized = raw.to_lowercase();

        Metric::ALL
            .into_iter()
            .find(|metric| metric.as_str() == normalized)
            .ok_or_else(|| QueryError::invalid(METRIC_FIELD, raw))
    }

    /// `last5days` or `last7days`; missing means `last5days`
    pub fn period(&self, raw: Option<&str>) -> QueryResult<Period> {
        let raw = raw.unwrap_or(DEFAULT_PERIOD);
        let normalized = raw.to_lowercase();

        Period::ALL
            .into_iter()
            .find(|period| period.as_str() == normalized)
            .ok_or_else(|| QueryError::invalid(PERIOD_FIELD, raw))
    }

    /// Validate graph parameters in order metric, module, period
    pub fn graph_query(
        &self,
        metric: Option<&str>,
        module: Option<&str>,
        period: Option<&str>,
    ) -> QueryResult<GraphQuery> {
        Ok(GraphQuery {
            metric: self.metric(metric)?,
            module: self.module(module)?,
            period: self.period(period)?,
        })
    }
}
