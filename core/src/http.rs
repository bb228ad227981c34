//! HTTP transport seam.
//!
//! # Design
//! The core never interprets sockets. An `HttpTransport` executes a GET and
//! hands back the status and body as plain data; `UpstreamClient` decides
//! what a status means. This keeps status handling deterministic and lets
//! tests swap the network for canned responses.

use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;

/// Default bound on a single upstream round-trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes a GET request.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status, and `TransportError::Io` only when no response could be obtained.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a ureq agent.
///
/// 4xx/5xx responses are returned as data rather than errors so the provider's
/// error body reaches the normalizer.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpTransport for UreqTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut response = self.agent.get(url).call().map_err(|e| TransportError::Io {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body = match response.body_mut().read_to_string() {
            Ok(body) => body,
            // A truncated success body is unusable; a truncated error body
            // only loses the provider's explanation.
            Err(e) if (200..300).contains(&status) => {
                return Err(TransportError::Io {
                    message: e.to_string(),
                })
            }
            Err(e) => {
                debug!(status, error = %e, "dropping unreadable error body");
                String::new()
            }
        };

        Ok(HttpResponse { status, body })
    }
}
