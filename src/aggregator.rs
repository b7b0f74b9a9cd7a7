//! Aggregator - concurrent health fan-out
//!
//! Resolves a selector through the registry, spawns one probe task per target
//! and joins them into a single [`AggregationReport`].
//!
//! ## Fan-out
//!
//! ```text
//! selector → registry.resolve → [spawn probe(t1), spawn probe(t2), ...] → join_all → report
//! ```
//!
//! Each task owns its outcome until the join; `join_all` yields the outcomes in
//! dispatch order, which is registry order, regardless of which probe finished
//! first. A slow or dead target only affects its own slot.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::observer::SharedObserver;
use crate::probe::{ProbeExecutor, ProbeOutcome};
use crate::registry::{ModuleSelector, TargetRegistry};
use crate::util::round_ms;

/// Combined result of one fan-out
#[derive(Debug, Clone)]
pub struct AggregationReport {
    pub selector: ModuleSelector,

    /// One outcome per resolved target, in registry order
    pub results: Vec<ProbeOutcome>,

    /// Wall-clock span of the whole fan-out
    pub total_latency_ms: f64,

    pub timestamp: DateTime<Utc>,
}

impl AggregationReport {
    pub fn reachable_count(&self) -> usize {
        self.results.iter().filter(|o| o.reachable).count()
    }

    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|o| o.target_name.as_str())
    }

    /// Per-target reachability, in registry order
    pub fn availability(&self) -> Vec<(String, bool)> {
        self.results
            .iter()
            .map(|o| (o.target_name.clone(), o.reachable))
            .collect()
    }
}

pub type AggregationResult<T> = Result<T, AggregationError>;

/// Unexpected failure while assembling a report
///
/// Probe failures are never errors; they are entries in the report.
#[derive(Debug)]
pub enum AggregationError {
    /// Selector names a target the registry does not know
    UnresolvedSelector(String),

    /// A probe task panicked or was cancelled before producing an outcome
    ProbeTask { target: String, message: String },
}

impl fmt::Display for AggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationError::UnresolvedSelector(selector) => {
                write!(f, "selector '{selector}' does not resolve to any target")
            }
            AggregationError::ProbeTask { target, message } => {
                write!(f, "probe task for '{target}' did not complete: {message}")
            }
        }
    }
}

impl std::error::Error for AggregationError {}

/// Fans health probes out over the registry
pub struct Aggregator {
    registry: Arc<TargetRegistry>,
    executor: ProbeExecutor,
    probe_timeout: Duration,
    observer: SharedObserver,
}

impl Aggregator {
    pub fn new(
        registry: Arc<TargetRegistry>,
        probe_timeout: Duration,
        observer: SharedObserver,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            registry,
            executor: ProbeExecutor::new(observer.clone())?,
            probe_timeout,
            observer,
        })
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Probe every target the selector resolves to and wait for all of them
    pub async fn aggregate(&self, selector: &ModuleSelector) -> AggregationResult<AggregationReport> {
        let targets = self
            .registry
            .resolve(selector)
            .ok_or_else(|| AggregationError::UnresolvedSelector(selector.to_string()))?;

        let start = Instant::now();

        let tasks: Vec<_> = targets
            .into_iter()
            .map(|target| {
                let executor = self.executor.clone();
                let target = target.clone();
                let timeout = self.probe_timeout;
                let name = target.name.clone();
                let handle = tokio::spawn(async move { executor.probe(&target, timeout).await });
                (name, handle)
            })
            .collect();

        let (names, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        let joined = join_all(handles).await;
        let total_latency_ms = round_ms(start.elapsed());

        let results = names
            .into_iter()
            .zip(joined)
            .map(|(target, joined)| {
                joined.map_err(|e| AggregationError::ProbeTask {
                    target,
                    message: e.to_string(),
                })
            })
            .collect::<AggregationResult<Vec<_>>>()?;

        let report = AggregationReport {
            selector: selector.clone(),
            results,
            total_latency_ms,
            timestamp: Utc::now(),
        };

        self.observer.aggregation_finished(&report);
        Ok(report)
    }
}
