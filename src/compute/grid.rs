//! Grid packing: maps a solved allocation onto a fixed occupancy grid.
//!
//! The canvas is a 100×50 grid where every cell stands for 0.01 m². Each
//! selected item gets one palette color, chosen by the order in which the
//! solver listed the items. Cells are then filled largest-area-first with
//! `round(area / 0.01)` cells per item, truncated at the grid size, and the
//! remainder is painted with the neutral color.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::schema::SelectedAllocation;

/// Grid width in cells.
pub const GRID_WIDTH: usize = 100;
/// Grid height in cells.
pub const GRID_HEIGHT: usize = 50;
/// Total number of cells on the canvas.
pub const TOTAL_CELLS: usize = GRID_WIDTH * GRID_HEIGHT;
/// Area represented by one cell in m².
pub const CELL_AREA: f64 = 0.01;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation, e.g. `#3B82F6`.
    pub fn hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fixed item palette, assigned cyclically.
pub const PALETTE: [Color; 10] = [
    Color::rgb(0x3B, 0x82, 0xF6),
    Color::rgb(0x10, 0xB9, 0x81),
    Color::rgb(0xF5, 0x9E, 0x0B),
    Color::rgb(0xEF, 0x44, 0x44),
    Color::rgb(0x8B, 0x5C, 0xF6),
    Color::rgb(0xEC, 0x48, 0x99),
    Color::rgb(0x06, 0xB6, 0xD4),
    Color::rgb(0x84, 0xCC, 0x16),
    Color::rgb(0xF9, 0x73, 0x16),
    Color::rgb(0xF4, 0x3F, 0x5E),
];

/// Color of cells not covered by any item.
pub const UNFILLED: Color = Color::rgb(0xE5, 0xE7, 0xEB);

/// Item name to palette color, fixed by first appearance in the solver's list.
#[derive(Debug, Clone, Default)]
pub struct ColorAssignment {
    colors: HashMap<String, Color>,
}

impl ColorAssignment {
    /// Assign colors in the given (unsorted) order. A repeated name keeps the
    /// color of its first occurrence and does not advance the palette.
    pub fn from_allocations(allocations: &[SelectedAllocation]) -> Self {
        let mut colors = HashMap::with_capacity(allocations.len());
        for allocation in allocations {
            let next = PALETTE[colors.len() % PALETTE.len()];
            colors.entry(allocation.name.clone()).or_insert(next);
        }
        Self { colors }
    }

    pub fn get(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Legend row for one selected item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: Color,
    pub quantity: i64,
    pub unit_area: f64,
    /// `quantity * unit_area`, independent of grid truncation.
    pub total_area: f64,
}

/// Packed grid cells plus the matching legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackedGrid {
    /// Row-major cell colors, always `TOTAL_CELLS` long.
    pub cells: Vec<Color>,
    /// One entry per selected allocation, in solver order.
    pub legend: Vec<LegendEntry>,
    /// Item cells dropped because the canvas was already full.
    pub overflow_cells: usize,
}

impl PackedGrid {
    /// A canvas with nothing on it.
    pub fn empty() -> Self {
        Self {
            cells: vec![UNFILLED; TOTAL_CELLS],
            legend: Vec::new(),
            overflow_cells: 0,
        }
    }

    pub fn width(&self) -> usize {
        GRID_WIDTH
    }

    pub fn height(&self) -> usize {
        GRID_HEIGHT
    }

    /// Color at column `x`, row `y`.
    pub fn cell(&self, x: usize, y: usize) -> Option<Color> {
        if x >= GRID_WIDTH || y >= GRID_HEIGHT {
            return None;
        }
        self.cells.get(y * GRID_WIDTH + x).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.cells.chunks(GRID_WIDTH)
    }

    /// Number of cells painted with an item color.
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c != UNFILLED).count()
    }

    /// Number of cells painted with `color`.
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == color).count()
    }
}

/// Number of cells an allocation should cover. Malformed allocations cover none.
pub fn cell_count(allocation: &SelectedAllocation) -> usize {
    if allocation.is_malformed() {
        return 0;
    }
    let cells = (allocation.packed_area() / CELL_AREA).round();
    if cells.is_finite() && cells > 0.0 {
        cells as usize
    } else {
        0
    }
}

/// Pack selected allocations onto the grid and build the legend.
pub fn render_grid(allocations: &[SelectedAllocation]) -> PackedGrid {
    if allocations.is_empty() {
        return PackedGrid::empty();
    }

    // Colors come from solver order, before any sorting.
    let colors = ColorAssignment::from_allocations(allocations);

    let mut order: Vec<(&SelectedAllocation, usize)> =
        allocations.iter().map(|a| (a, cell_count(a))).collect();
    // Stable: equal areas keep solver order.
    order.sort_by(|a, b| sort_area(b.0).total_cmp(&sort_area(a.0)));

    let mut cells = Vec::with_capacity(TOTAL_CELLS);
    let mut overflow_cells: usize = 0;
    for (allocation, count) in order {
        let color = colors.get(&allocation.name).unwrap_or(UNFILLED);
        let room = TOTAL_CELLS - cells.len();
        let placed = count.min(room);
        overflow_cells = overflow_cells.saturating_add(count - placed);
        cells.extend(std::iter::repeat_n(color, placed));
    }
    cells.resize(TOTAL_CELLS, UNFILLED);

    if overflow_cells > 0 {
        log::debug!("Grid full: {overflow_cells} item cells truncated");
    }

    let legend = allocations
        .iter()
        .map(|a| LegendEntry {
            name: a.name.clone(),
            color: colors.get(&a.name).unwrap_or(UNFILLED),
            quantity: a.quantity,
            unit_area: a.unit_area,
            total_area: a.packed_area(),
        })
        .collect();

    PackedGrid {
        cells,
        legend,
        overflow_cells,
    }
}

fn sort_area(allocation: &SelectedAllocation) -> f64 {
    if allocation.is_malformed() {
        0.0
    } else {
        allocation.packed_area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn alloc(name: &str, unit_area: f64, quantity: i64) -> SelectedAllocation {
        SelectedAllocation::new(name, unit_area, quantity)
    }

    #[test]
    fn test_two_item_example() {
        let grid = render_grid(&[alloc("A", 0.36, 2), alloc("B", 0.25, 1)]);

        assert_eq!(grid.cells.len(), TOTAL_CELLS);
        assert_eq!(grid.count(PALETTE[0]), 72);
        assert_eq!(grid.count(PALETTE[1]), 25);
        assert_eq!(grid.filled_cells(), 97);
        assert_eq!(grid.count(UNFILLED), 4903);
        assert_eq!(grid.overflow_cells, 0);

        // A is larger, so it is packed first.
        assert!(grid.cells[..72].iter().all(|&c| c == PALETTE[0]));
        assert!(grid.cells[72..97].iter().all(|&c| c == PALETTE[1]));

        assert_eq!(grid.legend.len(), 2);
        assert_eq!(grid.legend[0].name, "A");
        assert_eq!(grid.legend[0].color, PALETTE[0]);
        assert!((grid.legend[0].total_area - 0.72).abs() < 1e-9);
        assert_eq!(grid.legend[1].name, "B");
        assert_eq!(grid.legend[1].color, PALETTE[1]);
        assert!((grid.legend[1].total_area - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_allocations() {
        let grid = render_grid(&[]);
        assert_eq!(grid.cells.len(), TOTAL_CELLS);
        assert!(grid.cells.iter().all(|&c| c == UNFILLED));
        assert!(grid.legend.is_empty());
    }

    #[test]
    fn test_colors_follow_solver_order_not_area() {
        // Small item listed first keeps the first palette color.
        let grid = render_grid(&[alloc("small", 0.04, 1), alloc("big", 0.6, 2)]);
        assert_eq!(grid.legend[0].color, PALETTE[0]);
        assert_eq!(grid.legend[1].color, PALETTE[1]);

        // ...but the big item is packed first.
        assert!(grid.cells[..120].iter().all(|&c| c == PALETTE[1]));
        assert!(grid.cells[120..124].iter().all(|&c| c == PALETTE[0]));
        assert_eq!(grid.cells[124], UNFILLED);
    }

    #[test]
    fn test_overflow_truncates_in_area_order() {
        let grid = render_grid(&[
            alloc("mid", 10.0, 2),  // 2000 cells
            alloc("huge", 30.0, 1), // 3000 cells
            alloc("tail", 1.0, 5),  // 500 cells, dropped
        ]);

        assert_eq!(grid.count(UNFILLED), 0);
        assert!(grid.cells[..3000].iter().all(|&c| c == PALETTE[1]));
        assert!(grid.cells[3000..].iter().all(|&c| c == PALETTE[0]));
        assert_eq!(grid.count(PALETTE[2]), 0);
        assert_eq!(grid.overflow_cells, 500);

        // Legend still lists every item.
        assert_eq!(grid.legend.len(), 3);
        assert_eq!(grid.legend[2].name, "tail");
        assert!((grid.legend[2].total_area - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_truncation() {
        let grid = render_grid(&[alloc("a", 40.0, 1), alloc("b", 20.0, 1)]);
        assert_eq!(grid.count(PALETTE[0]), 4000);
        assert_eq!(grid.count(PALETTE[1]), 1000);
        assert_eq!(grid.overflow_cells, 1000);
    }

    #[test]
    fn test_ties_keep_solver_order() {
        let grid = render_grid(&[alloc("x", 0.5, 1), alloc("y", 0.25, 2), alloc("z", 0.1, 5)]);
        assert!(grid.cells[..50].iter().all(|&c| c == PALETTE[0]));
        assert!(grid.cells[50..100].iter().all(|&c| c == PALETTE[1]));
        assert!(grid.cells[100..150].iter().all(|&c| c == PALETTE[2]));
    }

    #[test]
    fn test_palette_cycles() {
        let allocations: Vec<_> = (0..12).map(|i| alloc(&format!("item{i}"), 0.01, 1)).collect();
        let grid = render_grid(&allocations);
        assert_eq!(grid.legend[10].color, PALETTE[0]);
        assert_eq!(grid.legend[11].color, PALETTE[1]);
        assert_eq!(grid.filled_cells(), 12);
    }

    #[test]
    fn test_duplicate_names_share_color() {
        let grid = render_grid(&[alloc("A", 0.1, 1), alloc("B", 0.1, 1), alloc("A", 0.2, 1)]);
        assert_eq!(grid.legend[0].color, PALETTE[0]);
        assert_eq!(grid.legend[2].color, PALETTE[0]);
        assert_eq!(grid.legend[1].color, PALETTE[1]);
        assert_eq!(grid.count(PALETTE[0]), 30);
    }

    #[test]
    fn test_malformed_allocations_are_clamped() {
        let grid = render_grid(&[
            alloc("neg_area", -0.5, 3),
            alloc("neg_qty", 0.5, -3),
            alloc("nan", f64::NAN, 1),
            alloc("ok", 0.5, 1),
        ]);
        assert_eq!(grid.filled_cells(), 50);
        assert_eq!(grid.count(PALETTE[3]), 50);
        assert_eq!(grid.legend.len(), 4);
    }

    #[test]
    fn test_rounding() {
        // 0.0875 * 3 = 0.2625 -> 26.25 cells -> 26
        assert_eq!(cell_count(&alloc("a", 0.0875, 3)), 26);
        // 0.1125 * 1 = 11.25 cells -> 11
        assert_eq!(cell_count(&alloc("b", 0.1125, 1)), 11);
        // 0.456 -> 45.6 cells -> 46
        assert_eq!(cell_count(&alloc("c", 0.456, 1)), 46);
        assert_eq!(cell_count(&alloc("d", 0.3, 0)), 0);
        // 0.005 / 0.01 is exactly 0.5; halves round up
        assert_eq!(cell_count(&alloc("h", 0.005, 1)), 1);
    }

    #[test]
    fn test_huge_areas_saturate_overflow() {
        let grid = render_grid(&[alloc("a", 1e300, 1), alloc("b", 1e300, 1)]);
        assert_eq!(grid.cells.len(), TOTAL_CELLS);
        assert_eq!(grid.count(PALETTE[0]), TOTAL_CELLS);
        assert_eq!(grid.overflow_cells, usize::MAX);
        assert_eq!(grid.legend.len(), 2);
    }

    #[test]
    fn test_grid_accessors() {
        let grid = render_grid(&[alloc("A", 1.5, 1)]);
        assert_eq!(grid.rows().count(), GRID_HEIGHT);
        assert_eq!(grid.cell(99, 0), Some(PALETTE[0]));
        assert_eq!(grid.cell(49, 1), Some(PALETTE[0]));
        assert_eq!(grid.cell(50, 1), Some(UNFILLED));
        assert_eq!(grid.cell(100, 0), None);
        assert_eq!(PALETTE[0].hex(), "#3B82F6");
        assert_eq!(serde_json::to_string(&UNFILLED).unwrap(), "\"#E5E7EB\"");
    }

    fn arb_allocations() -> impl Strategy<Value = Vec<SelectedAllocation>> {
        prop::collection::vec((0usize..15, 0.0f64..2.0, 0i64..40), 0..20).prop_map(|items| {
            items
                .into_iter()
                .map(|(n, area, qty)| alloc(&format!("item{n}"), area, qty))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_grid_has_fixed_size(allocations in arb_allocations()) {
            let grid = render_grid(&allocations);
            prop_assert_eq!(grid.cells.len(), TOTAL_CELLS);
            prop_assert_eq!(grid.legend.len(), allocations.len());
        }

        #[test]
        fn prop_exact_counts_without_overflow(allocations in arb_allocations()) {
            let expected: usize = allocations.iter().map(cell_count).sum();
            let grid = render_grid(&allocations);
            if expected <= TOTAL_CELLS {
                prop_assert_eq!(grid.filled_cells(), expected);
                prop_assert_eq!(grid.overflow_cells, 0);
                let colors = ColorAssignment::from_allocations(&allocations);
                for color in PALETTE {
                    let want: usize = allocations
                        .iter()
                        .filter(|a| colors.get(&a.name) == Some(color))
                        .map(cell_count)
                        .sum();
                    prop_assert_eq!(grid.count(color), want);
                }
            } else {
                prop_assert_eq!(grid.count(UNFILLED), 0);
                prop_assert_eq!(grid.overflow_cells, expected - TOTAL_CELLS);
            }
        }

        #[test]
        fn prop_color_depends_only_on_first_seen_order(allocations in arb_allocations()) {
            let grid = render_grid(&allocations);
            let mut first_seen: Vec<&str> = Vec::new();
            for a in &allocations {
                if !first_seen.contains(&a.name.as_str()) {
                    first_seen.push(&a.name);
                }
            }
            for entry in &grid.legend {
                let index = first_seen.iter().position(|n| *n == entry.name).unwrap();
                prop_assert_eq!(entry.color, PALETTE[index % PALETTE.len()]);
            }
        }
    }
}
