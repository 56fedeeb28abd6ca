//! Transport boundary
//!
//! The operation engine never talks HTTP directly; it is handed anything
//! implementing [`Transport`]. Status codes are plain data on the returned
//! [`Response`] - a 404 is a protocol answer, not a transport failure - so
//! one trait covers both the "peek" read and the ordinary calls. A
//! [`TransportError`] means the request itself failed: network trouble, the
//! timeout firing, or a caller-initiated cancellation.
//!
//! [`HttpTransport`] is the blocking ureq implementation used in
//! production; tests script their own double.

use std::time::Duration;
use thiserror::Error;

/// Failure below the protocol level.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request exceeded its timeout
    #[error("request timed out")]
    Timeout,
    /// The request was canceled before completion
    #[error("request canceled")]
    Canceled,
    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),
}

/// One HTTP exchange as the engine sees it.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers, as received
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: String,
}

impl Response {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The change index carried on a read response, when present.
    pub fn change_index(&self) -> Option<u64> {
        self.header("x-consul-index")
            .and_then(|v| v.trim().parse().ok())
    }
}

/// Injected HTTP transport.
///
/// `get_with_timeout` exists for the blocking wait read, which runs with
/// the configured ceiling instead of the transport's default timeout.
pub trait Transport {
    /// GET with the transport's default timeout.
    fn get(&self, url: &str) -> Result<Response, TransportError>;

    /// GET with an explicit timeout (blocking wait reads).
    fn get_with_timeout(&self, url: &str, timeout: Duration)
        -> Result<Response, TransportError>;

    /// PUT with the given body.
    fn put(&self, url: &str, body: &str) -> Result<Response, TransportError>;

    /// DELETE.
    fn delete(&self, url: &str) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<Response, TransportError> {
        (**self).get(url)
    }

    fn get_with_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Response, TransportError> {
        (**self).get_with_timeout(url, timeout)
    }

    fn put(&self, url: &str, body: &str) -> Result<Response, TransportError> {
        (**self).put(url, body)
    }

    fn delete(&self, url: &str) -> Result<Response, TransportError> {
        (**self).delete(url)
    }
}

/// Blocking HTTP transport backed by ureq.
///
/// An agent is built per call so the wait read can carry its own timeout.
/// ureq cannot be canceled mid-flight, so this implementation never yields
/// `TransportError::Canceled`; that variant is for transports that can.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    default_timeout: Duration,
}

impl HttpTransport {
    /// Transport with the default 10 second request timeout.
    pub fn new() -> Self {
        HttpTransport {
            default_timeout: Duration::from_secs(10),
        }
    }

    /// Transport with a custom default request timeout.
    pub fn with_timeout(default_timeout: Duration) -> Self {
        HttpTransport { default_timeout }
    }

    fn agent(&self, timeout: Duration) -> ureq::Agent {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // Non-2xx statuses are protocol answers, not errors
            .http_status_as_error(false)
            .build();
        ureq::Agent::new_with_config(config)
    }

    fn run(
        result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    ) -> Result<Response, TransportError> {
        let mut response = result.map_err(map_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Network(format!("failed to read response: {}", e)))?;
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport::new()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Response, TransportError> {
        self.get_with_timeout(url, self.default_timeout)
    }

    fn get_with_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Response, TransportError> {
        Self::run(self.agent(timeout).get(url).call())
    }

    fn put(&self, url: &str, body: &str) -> Result<Response, TransportError> {
        Self::run(
            self.agent(self.default_timeout)
                .put(url)
                .header("Content-Type", "text/plain")
                .send(body),
        )
    }

    fn delete(&self, url: &str) -> Result<Response, TransportError> {
        Self::run(self.agent(self.default_timeout).delete(url).call())
    }
}

fn map_error(e: ureq::Error) -> TransportError {
    match e {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            TransportError::Timeout
        }
        other => TransportError::Network(other.to_string()),
    }
}
