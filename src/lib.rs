//! Area Planner - Client for an area-constrained genetic-algorithm solver.
//!
//! The planner lets a user edit an item catalog and the solver's run
//! parameters, submits one run to a remote solver, and turns the returned
//! allocation into a floor-plan grid, a legend and a convergence chart.
//!
//! # Architecture
//!
//! - `schema`: Catalog, run parameters and result types (solver wire format)
//! - `compute`: Grid packing, color assignment and fitness series
//! - `client`: Solver client and HTTP transports
//! - `app`: Planner state and run lifecycle
//! - `view`: Derived result views and text rendering
//! - `export`: JSON export of results
//!
//! # Example
//!
//! ```rust,no_run
//! use area_planner::{
//!     app::PlannerApp,
//!     client::{SolverClient, UreqTransport},
//!     view::text,
//! };
//!
//! let mut app = PlannerApp::default();
//! let client = SolverClient::new(UreqTransport::new());
//!
//! pollster::block_on(app.run(&client)).expect("solver run failed");
//!
//! if let Some(view) = app.view() {
//!     print!("{}", text::render_view(&view));
//! }
//! ```

pub mod app;
pub mod client;
pub mod compute;
pub mod export;
pub mod schema;
pub mod view;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use app::{PlannerApp, RunState};
pub use compute::{PackedGrid, render_grid};
pub use schema::{Catalog, ResultModel, RunParameters, SelectedAllocation};
