//! Injected observability
//!
//! Components report what they do through an [`Observer`] handed to them at
//! construction instead of logging through process-wide state. The default
//! [`TracingObserver`] forwards everything to `tracing`; tests substitute a
//! recording implementation.

use std::sync::Arc;

use tracing::{debug, error, info, trace, warn};

use crate::aggregator::{AggregationError, AggregationReport};
use crate::graph::{GraphError, GraphSeries};
use crate::probe::ProbeOutcome;
use crate::registry::{ModuleSelector, MonitoredTarget};
use crate::validator::QueryError;

/// Shared observer handle
pub type SharedObserver = Arc<dyn Observer>;

/// Sink for component events
///
/// Every method has an empty default so implementations only override what
/// they care about.
pub trait Observer: Send + Sync {
    /// A probe task was dispatched
    fn probe_started(&self, _target: &MonitoredTarget) {}

    /// A probe reached a terminal outcome
    fn probe_finished(&self, _outcome: &ProbeOutcome) {}

    /// A fan-out joined and its report was assembled
    fn aggregation_finished(&self, _report: &AggregationReport) {}

    /// A request parameter failed validation
    fn request_rejected(&self, _endpoint: &str, _error: &QueryError) {}

    /// A graph series was produced
    fn graph_rendered(&self, _provider: &str, _series: &GraphSeries) {}

    /// Aggregation failed unexpectedly
    fn aggregation_failed(&self, _selector: &ModuleSelector, _error: &AggregationError) {}

    /// Graph lookup failed unexpectedly
    fn graph_failed(&self, _provider: &str, _error: &GraphError) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn shared() -> SharedObserver {
        Arc::new(Self)
    }
}

impl Observer for TracingObserver {
    fn probe_started(&self, target: &MonitoredTarget) {
        trace!(module = %target.name, url = %target.health_url(), "dispatching health probe");
    }

    fn probe_finished(&self, outcome: &ProbeOutcome) {
        match outcome.error_kind {
            None => debug!(
                module = %outcome.target_name,
                status = ?outcome.status_code,
                latency_ms = outcome.latency_ms,
                "probe succeeded"
            ),
            Some(kind) => warn!(
                module = %outcome.target_name,
                status = ?outcome.status_code,
                latency_ms = outcome.latency_ms,
                error = %kind,
                "probe failed"
            ),
        }
    }

    fn aggregation_finished(&self, report: &AggregationReport) {
        info!(
            module = %report.selector,
            reachable = report.reachable_count(),
            total = report.results.len(),
            total_latency_ms = report.total_latency_ms,
            "completed health aggregation"
        );
    }

    fn request_rejected(&self, endpoint: &str, error: &QueryError) {
        warn!(endpoint, field = error.field(), value = error.value(), "rejected request");
    }

    fn graph_rendered(&self, provider: &str, series: &GraphSeries) {
        debug!(
            provider,
            metric = %series.query.metric,
            module = %series.query.module,
            period = %series.query.period,
            samples = series.data.len(),
            "rendered graph"
        );
    }

    fn aggregation_failed(&self, selector: &ModuleSelector, error: &AggregationError) {
        error!(module = %selector, "health aggregation failed: {error}");
    }

    fn graph_failed(&self, provider: &str, error: &GraphError) {
        error!(provider, "graph lookup failed: {error}");
    }
}
