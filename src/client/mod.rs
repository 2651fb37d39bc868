//! Solver client - Submits one run to the remote solver and parses its result.
//!
//! The HTTP layer sits behind the [`Transport`] trait: `ureq` on native
//! targets, the browser's `fetch` on wasm32.

use std::future::Future;

use serde::Serialize;

use crate::schema::{Catalog, CatalogItem, ResultModel, RunParameters};

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(not(target_arch = "wasm32"))]
pub use native::UreqTransport;

#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
pub use fetch::FetchTransport;

/// Solver base URL, fixed at build time.
pub const SOLVER_BASE_URL: &str = match option_env!("AREA_PLANNER_SOLVER_URL") {
    Some(url) => url,
    None => "https://hymurcia-algoritmos-api.onrender.com",
};

/// Path of the run endpoint under the base URL.
pub const RUN_PATH: &str = "/run";

/// Raw HTTP response from a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends a JSON body to a URL with POST.
pub trait Transport {
    fn post_json(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>>;
}

/// Why a run could not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("unexpected response: {0}")]
    Malformed(serde_json::Error),
    #[error("could not encode request: {0}")]
    Encode(serde_json::Error),
}

/// Solver client errors.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Could not reach the solver at {endpoint}: {cause}")]
    Unavailable {
        endpoint: String,
        cause: FailureCause,
    },
}

impl SolverError {
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Unavailable { endpoint, .. } => endpoint,
        }
    }

    pub fn cause(&self) -> &FailureCause {
        match self {
            Self::Unavailable { cause, .. } => cause,
        }
    }
}

/// Request body: every run parameter at top level plus the catalog.
#[derive(Debug, Serialize)]
pub struct SolverRequest<'a> {
    #[serde(flatten)]
    pub params: &'a RunParameters,
    #[serde(rename = "catalogo")]
    pub catalog: &'a [CatalogItem],
}

impl<'a> SolverRequest<'a> {
    pub fn new(catalog: &'a Catalog, params: &'a RunParameters) -> Self {
        Self {
            params,
            catalog: catalog.items(),
        }
    }
}

/// Client for the remote solver.
#[derive(Debug, Clone)]
pub struct SolverClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> SolverClient<T> {
    /// Client for the build-time solver URL.
    pub fn new(transport: T) -> Self {
        Self::with_base_url(SOLVER_BASE_URL, transport)
    }

    pub fn with_base_url(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the run endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, RUN_PATH)
    }

    /// Submit one run. All-or-nothing: any failure yields `SolverError::Unavailable`.
    pub async fn submit_run(
        &self,
        catalog: &Catalog,
        params: &RunParameters,
    ) -> Result<ResultModel, SolverError> {
        let unavailable = |cause| SolverError::Unavailable {
            endpoint: self.base_url.clone(),
            cause,
        };

        let body = serde_json::to_string(&SolverRequest::new(catalog, params))
            .map_err(|e| unavailable(FailureCause::Encode(e)))?;

        let url = self.endpoint();
        log::info!(
            "Submitting run to {url}: {} items, population {}, {} generations",
            catalog.len(),
            params.population_size,
            params.generations
        );

        let response = self
            .transport
            .post_json(&url, body)
            .await
            .map_err(|e| unavailable(e.into()))?;

        if !response.is_success() {
            return Err(unavailable(FailureCause::Status(response.status)));
        }

        let result: ResultModel = serde_json::from_str(&response.body)
            .map_err(|e| unavailable(FailureCause::Malformed(e)))?;

        log::info!(
            "Run complete: benefit {}, area {} m² ({}%), {} items selected",
            result.best_benefit,
            result.best_area,
            result.area_utilization_percent,
            result.selected.len()
        );
        Ok(result)
    }
}
