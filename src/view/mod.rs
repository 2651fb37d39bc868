//! View module - Everything the presentation layer draws for a result.
//!
//! A [`ResultView`] is derived from scratch from a [`ResultModel`] whenever
//! it is needed. Packing is bounded at 5000 cells, so there is no caching.

pub mod text;

use serde::Serialize;

use crate::compute::{ConvergenceSeries, PackedGrid, render_grid};
use crate::schema::ResultModel;

/// Headline numbers for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub best_benefit: f64,
    pub best_area: f64,
    pub area_utilization_percent: f64,
    pub selected_items: usize,
    pub total_units: i64,
}

/// One line of the selected-items list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationLine {
    pub name: String,
    pub quantity: i64,
    pub total_area: f64,
    pub total_benefit: f64,
}

/// Full derived view of a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub summary: ResultSummary,
    pub allocations: Vec<AllocationLine>,
    pub grid: PackedGrid,
    pub convergence: ConvergenceSeries,
}

impl ResultView {
    pub fn derive(result: &ResultModel) -> Self {
        let summary = ResultSummary {
            best_benefit: result.best_benefit,
            best_area: result.best_area,
            area_utilization_percent: result.area_utilization_percent,
            selected_items: result.selected.len(),
            total_units: result.total_units(),
        };

        let allocations = result
            .selected
            .iter()
            .map(|a| AllocationLine {
                name: a.name.clone(),
                quantity: a.quantity,
                total_area: a.total_area,
                total_benefit: a.total_benefit,
            })
            .collect();

        Self {
            summary,
            allocations,
            grid: render_grid(&result.selected),
            convergence: ConvergenceSeries::from_history(&result.fitness_history),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{PALETTE, TOTAL_CELLS};
    use crate::schema::SelectedAllocation;

    #[test]
    fn test_derive_view() {
        let result = ResultModel {
            best_benefit: 220.0,
            best_area: 0.97,
            area_utilization_percent: 1.94,
            selected: vec![
                SelectedAllocation::new("A", 0.36, 2),
                SelectedAllocation::new("B", 0.25, 1),
            ],
            placements: None,
            fitness_history: vec![1.0, 2.0],
        };

        let view = ResultView::derive(&result);
        assert_eq!(view.summary.selected_items, 2);
        assert_eq!(view.summary.total_units, 3);
        assert_eq!(view.allocations[0].name, "A");
        assert_eq!(view.grid.cells.len(), TOTAL_CELLS);
        assert_eq!(view.grid.legend[1].color, PALETTE[1]);
        assert_eq!(view.convergence.labels, vec![1, 2]);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["grid"]["cells"].as_array().unwrap().len(), TOTAL_CELLS);
        assert_eq!(json["grid"]["legend"][0]["color"], "#3B82F6");
    }

    #[test]
    fn test_derive_with_huge_quantities() {
        let result = ResultModel {
            best_benefit: 0.0,
            best_area: 0.0,
            area_utilization_percent: 0.0,
            selected: vec![
                SelectedAllocation::new("A", 0.01, i64::MAX),
                SelectedAllocation::new("B", 0.01, i64::MAX),
            ],
            placements: None,
            fitness_history: Vec::new(),
        };

        let view = ResultView::derive(&result);
        assert_eq!(view.summary.total_units, i64::MAX);
        assert_eq!(view.grid.filled_cells(), TOTAL_CELLS);
        assert_eq!(view.grid.legend.len(), 2);
    }
}
