//! Solver output: the best allocation found plus its convergence history.

use serde::{Deserialize, Serialize};

/// Result of one solver run.
///
/// Field names follow the solver's response body so that a result can be
/// exported back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultModel {
    /// Total benefit of the best allocation.
    #[serde(rename = "mejor_beneficio")]
    pub best_benefit: f64,
    /// Total floor area used by the best allocation in m².
    #[serde(rename = "mejor_area")]
    pub best_area: f64,
    /// Share of the available floor used (0-100).
    #[serde(rename = "utilizacion_area_percent")]
    pub area_utilization_percent: f64,
    /// Selected items in solver order.
    #[serde(rename = "articulos_seleccionados")]
    pub selected: Vec<SelectedAllocation>,
    /// Coarse row layout computed by the solver, when it sends one.
    /// Absent and empty layouts are kept apart so exports match the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placements: Option<Vec<Placement>>,
    /// Best fitness per generation.
    #[serde(rename = "historial")]
    pub fitness_history: Vec<f64>,
}

impl ResultModel {
    /// Sum of chosen units across all allocations.
    pub fn total_units(&self) -> i64 {
        self.selected
            .iter()
            .fold(0i64, |total, a| total.saturating_add(a.quantity.max(0)))
    }
}

/// One chosen item and its quantity in a solved result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedAllocation {
    /// Catalog item name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Units chosen by the solver. Signed so malformed values still parse.
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    /// Footprint of one unit in m².
    #[serde(rename = "area")]
    pub unit_area: f64,
    /// Benefit of one unit, when the solver echoes it.
    #[serde(rename = "beneficio", default, skip_serializing_if = "Option::is_none")]
    pub unit_benefit: Option<f64>,
    /// `unit_area * quantity` as reported by the solver.
    pub total_area: f64,
    /// Total benefit as reported by the solver.
    #[serde(rename = "total_beneficio")]
    pub total_benefit: f64,
}

impl SelectedAllocation {
    pub fn new(name: impl Into<String>, unit_area: f64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_area,
            unit_benefit: None,
            total_area: unit_area * quantity as f64,
            total_benefit: 0.0,
        }
    }

    /// Area recomputed from unit area and quantity.
    #[inline]
    pub fn packed_area(&self) -> f64 {
        self.unit_area * self.quantity as f64
    }

    /// True when area or quantity cannot describe a real allocation.
    pub fn is_malformed(&self) -> bool {
        self.quantity < 0 || !self.unit_area.is_finite() || self.unit_area < 0.0
    }
}

/// Rectangle from the solver's row layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(rename = "nombre")]
    pub name: String,
}
