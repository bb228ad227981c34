//! Upstream client: one GET per call, status interpretation included.
//!
//! # Design
//! `UpstreamClient` holds only its transport and carries no state between
//! calls. No retries and no caching; the transport's timeout bounds the call.

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpResponse, HttpTransport};

/// Fetches raw response bodies from the rate provider.
#[derive(Debug, Clone)]
pub struct UpstreamClient<T> {
    transport: T,
}

impl<T: HttpTransport> UpstreamClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// GET `url` and return the body of a 2xx response.
    ///
    /// Any other status fails with `TransportError::Status`, which keeps the
    /// body so the provider's error payload can still be read.
    pub fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let response = self.transport.get(url)?;
        debug!(url, status = response.status, bytes = response.body.len(), "upstream responded");
        check_status(response)
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }
}

/// Map non-success status codes to `TransportError::Status`.
fn check_status(response: HttpResponse) -> Result<String, TransportError> {
    if response.is_success() {
        return Ok(response.body);
    }
    Err(TransportError::Status {
        status: response.status,
        body: response.body,
    })
}
