//! On-demand health aggregation for a fixed set of backend services.
//!
//! A request names a module selector; the [`aggregator::Aggregator`] probes
//! every target it resolves to concurrently and returns one ordered report.

pub mod aggregator;
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod graph;
pub mod observer;
pub mod probe;
pub mod registry;
pub mod report;
pub mod util;
pub mod validator;

pub use aggregator::{AggregationError, AggregationReport, Aggregator};
pub use graph::{GraphDataProvider, GraphQuery, GraphSeries, Metric, Period, StaticGraphData};
pub use observer::{NoopObserver, Observer, SharedObserver, TracingObserver};
pub use probe::{ErrorKind, ProbeExecutor, ProbeOutcome};
pub use registry::{ModuleSelector, MonitoredTarget, TargetRegistry};
pub use validator::{QueryError, QueryValidator};
