//! Schema module - Catalog, run parameter and result types for the solver.

mod catalog;
mod params;
mod result;

pub use catalog::*;
pub use params::*;
pub use result::*;
