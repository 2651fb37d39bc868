//! Blocking HTTP transport for native builds.

use std::future::{self, Future};
use std::time::Duration;

use super::{Transport, TransportError, TransportResponse};

/// `ureq`-backed transport. The request runs to completion inside
/// `post_json`, so the returned future is always ready.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    /// Transport without a timeout; an unresponsive solver blocks indefinitely.
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    fn post_blocking(&self, url: &str, body: &str) -> Result<TransportResponse, TransportError> {
        let response = match self
            .agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_string(body)
        {
            Ok(response) => response,
            // Non-2xx statuses still carry a response; the client decides.
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => return Err(TransportError(e.to_string())),
        };

        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| TransportError(format!("failed to read response body: {e}")))?;
        Ok(TransportResponse { status, body })
    }
}

impl Transport for UreqTransport {
    fn post_json(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> {
        future::ready(self.post_blocking(url, &body))
    }
}
