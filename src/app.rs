//! Planner state: the editable models, the current result and the run lifecycle.
//!
//! A run is `begin_run` → solver call → `finish_run`. While a run is pending
//! the planner is `Running` and refuses to start another one. A failed run
//! leaves the previous result in place.

use serde::Serialize;

use crate::client::{SolverClient, SolverError, Transport};
use crate::schema::{
    Catalog, CatalogError, CatalogField, EditError, ParamField, ParamsError, ResultModel,
    RunParameters,
};
use crate::view::ResultView;

/// Whether a solver call is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// Snapshot of the models taken when a run starts.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub catalog: Catalog,
    pub params: RunParameters,
}

/// Reasons a run could not be started or completed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("A run is already in progress")]
    AlreadyRunning,
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] ParamsError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Owned planner state.
#[derive(Debug, Clone, Default)]
pub struct PlannerApp {
    catalog: Catalog,
    params: RunParameters,
    result: Option<ResultModel>,
    state: RunState,
    notice: Option<String>,
}

impl PlannerApp {
    pub fn new(catalog: Catalog, params: RunParameters) -> Self {
        Self {
            catalog,
            params,
            ..Default::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn params(&self) -> &RunParameters {
        &self.params
    }

    pub fn result(&self) -> Option<&ResultModel> {
        self.result.as_ref()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Message describing the last failed run, cleared by the next success.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn edit_catalog(
        &mut self,
        index: usize,
        field: CatalogField,
        raw: &str,
    ) -> Result<(), EditError> {
        self.catalog.edit(index, field, raw)
    }

    pub fn edit_param(&mut self, field: ParamField, raw: &str) -> Result<(), EditError> {
        self.params.edit(field, raw)
    }

    pub fn set_params(&mut self, params: RunParameters) {
        self.params = params;
    }

    /// Replace the result directly, e.g. from a saved export.
    pub fn load_result(&mut self, result: ResultModel) {
        self.result = Some(result);
        self.notice = None;
    }

    /// Derived grid, legend and chart for the current result.
    pub fn view(&self) -> Option<ResultView> {
        self.result.as_ref().map(ResultView::derive)
    }

    /// Validate the models and enter `Running`.
    pub fn begin_run(&mut self) -> Result<RunRequest, RunError> {
        if self.is_running() {
            return Err(RunError::AlreadyRunning);
        }
        self.catalog.validate()?;
        self.params.validate()?;

        self.state = RunState::Running;
        Ok(RunRequest {
            catalog: self.catalog.clone(),
            params: self.params.clone(),
        })
    }

    /// Record the outcome of a run and return to `Idle`.
    pub fn finish_run(
        &mut self,
        outcome: Result<ResultModel, SolverError>,
    ) -> Result<(), SolverError> {
        self.state = RunState::Idle;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.notice = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("Run failed: {e}");
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run the solver once and store its result.
    pub async fn run<T: Transport>(&mut self, client: &SolverClient<T>) -> Result<(), RunError> {
        let request = self.begin_run()?;
        let outcome = client.submit_run(&request.catalog, &request.params).await;
        self.finish_run(outcome)?;
        Ok(())
    }
}
