//! Fitness history as a chart-ready series.

use serde::Serialize;

use super::Color;

/// Dataset label shown by the line chart.
pub const SERIES_LABEL: &str = "Best fitness per generation";

/// Stroke color of the convergence line.
pub const SERIES_COLOR: Color = Color::rgb(0x4F, 0x46, 0xE5);

/// Line chart data for the best fitness per generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceSeries {
    /// X axis labels, 1-based generation numbers.
    pub labels: Vec<usize>,
    /// Best fitness for each generation.
    pub values: Vec<f64>,
    pub label: &'static str,
    pub color: Color,
    pub summary: Option<ConvergenceSummary>,
}

/// Headline numbers for a fitness history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceSummary {
    pub first: f64,
    pub last: f64,
    pub best: f64,
    /// 1-based generation where `best` was first reached.
    pub best_generation: usize,
    /// `best - first`.
    pub improvement: f64,
}

impl ConvergenceSeries {
    pub fn from_history(history: &[f64]) -> Self {
        Self {
            labels: (1..=history.len()).collect(),
            values: history.to_vec(),
            label: SERIES_LABEL,
            color: SERIES_COLOR,
            summary: ConvergenceSummary::from_history(history),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConvergenceSummary {
    /// Summarize a history. Non-finite samples are ignored when picking the best.
    pub fn from_history(history: &[f64]) -> Option<Self> {
        let first = *history.first()?;
        let last = *history.last()?;

        let mut best = f64::NEG_INFINITY;
        let mut best_generation = 0;
        for (i, &value) in history.iter().enumerate() {
            if value.is_finite() && value > best {
                best = value;
                best_generation = i + 1;
            }
        }
        if best_generation == 0 {
            return None;
        }

        Some(Self {
            first,
            last,
            best,
            best_generation,
            improvement: best - first,
        })
    }
}
