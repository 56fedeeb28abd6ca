//! Client configuration
//!
//! Process-wide settings the operation engine reads: the store's base URL,
//! a default datacenter, the ACL token appended to every request when
//! present, and the ceiling on a blocking wait. Transport-level middleware
//! and adapters are the transport's own concern and do not appear here.

use std::time::Duration;

/// Default ceiling on a blocking "wait for change" request: 24 hours.
pub const DEFAULT_WAIT_CEILING: Duration = Duration::from_secs(86_400);

/// Store connection settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the store's HTTP API, no trailing slash
    pub base_url: String,
    /// Default target datacenter; per-call options override it
    pub datacenter: Option<String>,
    /// ACL token appended as a query parameter when present
    pub token: Option<String>,
    /// Ceiling on a blocking wait request
    pub wait_ceiling: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://127.0.0.1:8500".to_string(),
            datacenter: None,
            token: None,
            wait_ceiling: DEFAULT_WAIT_CEILING,
        }
    }
}

impl Config {
    /// Configuration for a store at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Config {
            base_url,
            ..Config::default()
        }
    }

    /// Set the default datacenter.
    pub fn with_datacenter(mut self, dc: impl Into<String>) -> Self {
        self.datacenter = Some(dc.into());
        self
    }

    /// Set the ACL token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the blocking-wait ceiling.
    pub fn with_wait_ceiling(mut self, ceiling: Duration) -> Self {
        self.wait_ceiling = ceiling;
        self
    }
}
