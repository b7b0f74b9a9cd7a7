//! API shared state

use std::sync::Arc;

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::graph::{GraphDataProvider, StaticGraphData};
use crate::observer::SharedObserver;
use crate::registry::TargetRegistry;
use crate::validator::QueryValidator;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Fan-out over the registered targets
    pub aggregator: Arc<Aggregator>,

    /// Source of dashboard series
    pub graphs: Arc<dyn GraphDataProvider>,

    /// Event sink shared with the aggregator
    pub observer: SharedObserver,
}

impl ApiState {
    /// Build state from configuration with the static graph table
    pub fn from_config(config: &Config, observer: SharedObserver) -> anyhow::Result<Self> {
        config.validate()?;
        let registry = Arc::new(TargetRegistry::from_config(&config.targets)?);
        let aggregator = Aggregator::new(registry, config.probe_timeout(), observer.clone())?;

        Ok(Self::new(
            Arc::new(aggregator),
            Arc::new(StaticGraphData::new()),
            observer,
        ))
    }

    pub fn new(
        aggregator: Arc<Aggregator>,
        graphs: Arc<dyn GraphDataProvider>,
        observer: SharedObserver,
    ) -> Self {
        Self {
            aggregator,
            graphs,
            observer,
        }
    }

    /// Swap the graph provider, keeping everything else
    pub fn with_graph_provider(mut self, graphs: Arc<dyn GraphDataProvider>) -> Self {
        self.graphs = graphs;
        self
    }

    pub fn validator(&self) -> QueryValidator<'_> {
        QueryValidator::new(self.aggregator.registry())
    }
}
