use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use tracing::trace;

use crate::util;

/// Aggregator configuration
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Address the HTTP surface binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Per-probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Enable permissive CORS for dashboards
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Monitored targets in registry order
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub url: String,
}

impl TargetConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_probe_timeout_ms() -> u64 {
    5000
}

fn default_enable_cors() -> bool {
    true
}

fn default_targets() -> Vec<TargetConfig> {
    vec![
        TargetConfig::new("poke_api", "http://localhost:5001"),
        TargetConfig::new("poke_stats", "http://localhost:5002"),
        TargetConfig::new("poke_images", "http://localhost:5003"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            probe_timeout_ms: default_probe_timeout_ms(),
            enable_cors: default_enable_cors(),
            targets: default_targets(),
        }
    }
}

/// `MONITOR_ADDR`, `MONITOR_PORT` and `MONITOR_TIMEOUT_MS`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub addr: Option<IpAddr>,
    pub port: Option<u16>,
    pub timeout_ms: Option<u64>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset and unparsable variables are both treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            addr: util::parse_var(&lookup, util::MONITOR_ADDR),
            port: util::parse_var(&lookup, util::MONITOR_PORT),
            timeout_ms: util::parse_var(&lookup, util::MONITOR_TIMEOUT_MS),
        }
    }
}

/// Command line flags that override everything else
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub timeout_ms: Option<u64>,
    pub bind: Option<SocketAddr>,
}

impl Config {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Layer environment and command line values over this config.
    ///
    /// Precedence is CLI, then environment, then the file. The result is validated.
    pub fn layered(mut self, env: &EnvOverrides, cli: &CliOverrides) -> anyhow::Result<Self> {
        if let Some(addr) = env.addr {
            self.bind_addr.set_ip(addr);
        }
        if let Some(port) = env.port {
            self.bind_addr.set_port(port);
        }
        if let Some(timeout_ms) = env.timeout_ms {
            self.probe_timeout_ms = timeout_ms;
        }

        if let Some(timeout_ms) = cli.timeout_ms {
            self.probe_timeout_ms = timeout_ms;
        }
        if let Some(bind) = cli.bind {
            self.bind_addr = bind;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks values the registry does not validate itself
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.probe_timeout_ms == 0 {
            bail!("probe_timeout_ms must be greater than zero");
        }
        if self.targets.is_empty() {
            bail!("at least one target must be configured");
        }
        Ok(())
    }
}

/// Read a configuration file; `.toml` files are parsed as TOML, everything else as JSON.
pub fn read_config_file(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let file_content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&file_content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    } else {
        serde_json::from_str(&file_content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    };

    config.validate()?;
    trace!("loaded config: {config:?}");
    Ok(config)
}
