//! Compute module - Derived views of a solver result.

mod grid;
mod history;

pub use grid::*;
pub use history::*;
