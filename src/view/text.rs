//! Plain-text rendering for terminals.

use std::fmt::Write;

use super::ResultView;
use crate::compute::{Color, ConvergenceSeries, PALETTE, PackedGrid};
use crate::schema::{Catalog, RunParameters};

/// Glyph for cells not covered by any item.
pub const UNFILLED_GLYPH: char = '.';

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;

/// Digit glyph for a palette color, `.` for anything else.
pub fn glyph(color: Color) -> char {
    PALETTE
        .iter()
        .position(|&c| c == color)
        .and_then(|i| char::from_digit(i as u32, 10))
        .unwrap_or(UNFILLED_GLYPH)
}

/// The grid as `GRID_HEIGHT` lines of `GRID_WIDTH` glyphs.
pub fn render_grid(grid: &PackedGrid) -> String {
    let mut out = String::with_capacity(grid.cells.len() + grid.height());
    for row in grid.rows() {
        out.extend(row.iter().map(|&c| glyph(c)));
        out.push('\n');
    }
    out
}

pub fn render_legend(grid: &PackedGrid) -> String {
    let mut out = String::new();
    for entry in &grid.legend {
        let _ = writeln!(
            out,
            "[{}] {} {}: {} units × {:.3} m² each → {:.2} m² total",
            glyph(entry.color),
            entry.color,
            entry.name,
            entry.quantity,
            entry.unit_area,
            entry.total_area
        );
    }
    out
}

pub fn render_sparkline(series: &ConvergenceSeries) -> String {
    let finite: Vec<f64> = series.values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return String::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let step = finite.len().div_ceil(SPARK_WIDTH);
    finite
        .chunks(step)
        .map(|chunk| {
            let v = chunk.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let level = if span > 0.0 {
                (((v - min) / span) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            } else {
                SPARK_LEVELS.len() - 1
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

/// Full report for one result.
pub fn render_view(view: &ResultView) -> String {
    let mut out = String::new();
    let s = &view.summary;

    let _ = writeln!(out, "Results");
    let _ = writeln!(out, "=======");
    let _ = writeln!(out, "Total benefit: ${:.2}", s.best_benefit);
    let _ = writeln!(
        out,
        "Area used:     {} m² ({}%)",
        s.best_area, s.area_utilization_percent
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Selected items ({}, {} units):", s.selected_items, s.total_units);
    for line in &view.allocations {
        let _ = writeln!(
            out,
            "  {} ×{} - total area: {:.2} m² - benefit: ${:.2}",
            line.name, line.quantity, line.total_area, line.total_benefit
        );
    }
    let _ = writeln!(out);

    let series = &view.convergence;
    let _ = writeln!(out, "{} ({} generations):", series.label, series.len());
    if let Some(summary) = &series.summary {
        let _ = writeln!(out, "  {}", render_sparkline(series));
        let _ = writeln!(
            out,
            "  first {:.2}, best {:.2} (generation {}), last {:.2}",
            summary.first, summary.best, summary.best_generation, summary.last
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Floor plan ({}x{}, 1 cell = 0.01 m²):",
        view.grid.width(),
        view.grid.height()
    );
    out.push_str(&render_grid(&view.grid));
    let _ = writeln!(out);
    let _ = writeln!(out, "Legend:");
    out.push_str(&render_legend(&view.grid));
    out
}

pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<20} {:>9} {:>10} {:>6} {:>10}",
        "id", "name", "area m²", "benefit $", "stock", "$/m²"
    );
    for item in catalog.items() {
        let _ = writeln!(
            out,
            "{:>3}  {:<20} {:>9.4} {:>10.2} {:>6} {:>10.1}",
            item.id,
            item.name,
            item.unit_area,
            item.unit_benefit,
            item.stock,
            item.efficiency()
        );
    }
    out
}

pub fn render_params(params: &RunParameters) -> String {
    format!(
        "Population: {}, generations: {}, Pc: {}, Pm: {}, tournament k: {}, elitism: {}, seed: {}, selection: {}\n",
        params.population_size,
        params.generations,
        params.crossover_prob,
        params.mutation_prob,
        params.tournament_size,
        params.elitism,
        params.seed,
        params.selection_method
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{GRID_HEIGHT, GRID_WIDTH, UNFILLED};
    use crate::schema::{ResultModel, SelectedAllocation};

    fn sample_view() -> ResultView {
        ResultView::derive(&ResultModel {
            best_benefit: 220.0,
            best_area: 0.97,
            area_utilization_percent: 1.94,
            selected: vec![
                SelectedAllocation::new("A", 0.36, 2),
                SelectedAllocation::new("B", 0.25, 1),
            ],
            placements: None,
            fitness_history: vec![10.0, 15.0, 20.0],
        })
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(glyph(PALETTE[0]), '0');
        assert_eq!(glyph(PALETTE[9]), '9');
        assert_eq!(glyph(UNFILLED), UNFILLED_GLYPH);
    }

    #[test]
    fn test_render_grid_shape() {
        let view = sample_view();
        let text = render_grid(&view.grid);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), GRID_HEIGHT);
        assert!(lines.iter().all(|l| l.chars().count() == GRID_WIDTH));
        assert!(lines[0].starts_with(&"0".repeat(72)));
        assert_eq!(&lines[0][72..97], "1".repeat(25));
        assert!(lines[1].chars().all(|c| c == UNFILLED_GLYPH));
    }

    #[test]
    fn test_render_legend() {
        let view = sample_view();
        let legend = render_legend(&view.grid);
        let lines: Vec<&str> = legend.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[0] #3B82F6 A: 2 units × 0.360 m² each → 0.72 m² total");
        assert!(lines[1].starts_with("[1] #10B981 B: 1 units"));
    }

    #[test]
    fn test_sparkline() {
        let view = sample_view();
        assert_eq!(render_sparkline(&view.convergence), "▁▅█");

        let flat = ConvergenceSeries::from_history(&[3.0; 200]);
        let line = render_sparkline(&flat);
        assert_eq!(line.chars().count(), 50);
        assert!(line.chars().all(|c| c == '█'));
    }

    #[test]
    fn test_render_view_sections() {
        let text = render_view(&sample_view());
        assert!(text.contains("Total benefit: $220.00"));
        assert!(text.contains("A ×2 - total area: 0.72 m²"));
        assert!(text.contains("Legend:"));
    }

    #[test]
    fn test_render_catalog() {
        let text = render_catalog(&Catalog::default());
        assert_eq!(text.lines().count(), 13);
        assert!(text.contains("Nevera grande"));
    }
}
