use std::str::FromStr;
use std::time::Duration;

pub const MONITOR_PORT: &str = "MONITOR_PORT";

pub const MONITOR_ADDR: &str = "MONITOR_ADDR";

pub const MONITOR_TIMEOUT_MS: &str = "MONITOR_TIMEOUT_MS";

/// Parse the variable `key` as returned by `lookup`; unset or unparsable values are `None`.
pub fn parse_var<T, F>(lookup: F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)?.parse().ok()
}

/// Milliseconds rounded to two decimal places.
pub fn round_ms(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 100_000.0).round() / 100.0
}
