//! Probe executor
//!
//! Performs a single bounded health check against one target and classifies
//! the result. Probes never fail: every failure mode is represented in the
//! returned [`ProbeOutcome`].
//!
//! ## Classification
//!
//! | what happened                       | reachable | status | error               |
//! |-------------------------------------|-----------|--------|---------------------|
//! | 2xx response                        | true      | yes    | -                   |
//! | other response                      | false     | yes    | `httpError`         |
//! | no response within the timeout      | false     | no     | `timeout`           |
//! | transport failure before timeout    | false     | no     | `connectionFailure` |

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::observer::SharedObserver;
use crate::registry::MonitoredTarget;
use crate::util::round_ms;

/// Why a probe did not find its target healthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Timeout,
    ConnectionFailure,
    HttpError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::ConnectionFailure => "connectionFailure",
            ErrorKind::HttpError => "httpError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one probe
///
/// `reachable` is true iff `status_code` is a 2xx code, and `error_kind` is
/// set iff `reachable` is false. Use the constructors to keep that.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub target_name: String,
    pub reachable: bool,
    pub status_code: Option<u16>,
    pub latency_ms: f64,
    pub error_kind: Option<ErrorKind>,
}

impl ProbeOutcome {
    /// A response arrived; 2xx is healthy, anything else is an HTTP error
    pub fn responded(target_name: impl Into<String>, status_code: u16, elapsed: Duration) -> Self {
        let reachable = (200..300).contains(&status_code);
        Self {
            target_name: target_name.into(),
            reachable,
            status_code: Some(status_code),
            latency_ms: round_ms(elapsed),
            error_kind: (!reachable).then_some(ErrorKind::HttpError),
        }
    }

    /// No response within `bound`; latency is the bound itself
    pub fn timed_out(target_name: impl Into<String>, bound: Duration) -> Self {
        Self {
            target_name: target_name.into(),
            reachable: false,
            status_code: None,
            latency_ms: round_ms(bound),
            error_kind: Some(ErrorKind::Timeout),
        }
    }

    /// Transport failed before the bound was reached
    pub fn transport_failed(target_name: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            target_name: target_name.into(),
            reachable: false,
            status_code: None,
            latency_ms: round_ms(elapsed),
            error_kind: Some(ErrorKind::ConnectionFailure),
        }
    }
}

/// Stateless health prober
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ProbeExecutor {
    client: reqwest::Client,
    observer: SharedObserver,
}

impl ProbeExecutor {
    pub fn new(observer: SharedObserver) -> anyhow::Result<Self> {
        // The per-probe bound is enforced in `probe`, not by the client.
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, observer })
    }

    /// Probe `target`'s health endpoint, giving up after `timeout`
    pub async fn probe(&self, target: &MonitoredTarget, timeout: Duration) -> ProbeOutcome {
        self.observer.probe_started(target);

        let start = Instant::now();
        let request = self.client.get(target.health_url()).send();

        let outcome = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) => {
                ProbeOutcome::responded(&target.name, response.status().as_u16(), start.elapsed())
            }
            Ok(Err(_)) => ProbeOutcome::transport_failed(&target.name, start.elapsed()),
            Err(_) => ProbeOutcome::timed_out(&target.name, timeout),
        };

        self.observer.probe_finished(&outcome);
        outcome
    }
}
