//! Target registry
//!
//! Static, ordered mapping from module name to the base address of its
//! `/health` endpoint. Built once at startup and never mutated afterwards.

use std::fmt;

use anyhow::{Context, bail};

use crate::config::TargetConfig;

/// Selector value meaning "every registered target"
pub const ALL: &str = "all";

/// A single monitored backend service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredTarget {
    pub name: String,
    pub base_address: String,
}

impl MonitoredTarget {
    /// Full URL of the target's health endpoint
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_address)
    }
}

/// A validated module selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSelector {
    All,
    Target(String),
}

impl fmt::Display for ModuleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleSelector::All => f.write_str(ALL),
            ModuleSelector::Target(name) => f.write_str(name),
        }
    }
}

/// Read-only registry of monitored targets, in registration order
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: Vec<MonitoredTarget>,
}

impl TargetRegistry {
    /// Build the registry from configuration
    ///
    /// Names must be non-empty, lower-case, unique and must not collide with
    /// the `all` selector. Base addresses must be absolute http(s) URLs.
    pub fn from_config(targets: &[TargetConfig]) -> anyhow::Result<Self> {
        let mut registered: Vec<MonitoredTarget> = Vec::with_capacity(targets.len());

        for target in targets {
            let name = target.name.as_str();
            if name.is_empty() {
                bail!("target name must not be empty");
            }
            if name != name.to_lowercase() {
                bail!("target name '{name}' must be lower-case");
            }
            if name == ALL {
                bail!("target name '{ALL}' is reserved");
            }
            if registered.iter().any(|t| t.name == name) {
                bail!("target '{name}' is registered twice");
            }

            let url = reqwest::Url::parse(&target.url)
                .with_context(|| format!("invalid url for target '{name}': {}", target.url))?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("target '{name}' must use http or https, got {}", url.scheme());
            }

            registered.push(MonitoredTarget {
                name: name.to_string(),
                base_address: target.url.trim_end_matches('/').to_string(),
            });
        }

        Ok(Self {
            targets: registered,
        })
    }

    /// Resolve a selector to its targets in registration order
    ///
    /// Returns `None` for a name that is not registered.
    pub fn resolve(&self, selector: &ModuleSelector) -> Option<Vec<&MonitoredTarget>> {
        match selector {
            ModuleSelector::All => Some(self.targets.iter().collect()),
            ModuleSelector::Target(name) => self.get(name).map(|target| vec![target]),
        }
    }

    pub fn get(&self, name: &str) -> Option<&MonitoredTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Target names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.name.as_str())
    }
}
