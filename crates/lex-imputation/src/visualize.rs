//! Missingness matrix and the rendering seam.
//!
//! The crate never draws anything itself. Callers that want a heatmap
//! implement [`MissingnessVisualizer`] and pass it to
//! [`crate::MissingnessProfiler::profile_with`] or [`plot_missing`].

use crate::table::Table;
use serde::Serialize;

/// Title handed to visualizers.
pub const HEATMAP_TITLE: &str = "Missing Data Heatmap";

/// Boolean grid with one entry per cell, `true` where the value is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingnessMatrix {
    n_rows: usize,
    column_names: Vec<String>,
    /// Row-major.
    cells: Vec<bool>,
}

impl MissingnessMatrix {
    pub fn from_table(table: &Table) -> Self {
        let n_rows = table.n_rows();
        let columns = table.columns();

        let mut cells = Vec::with_capacity(table.total_cells());
        for row in 0..n_rows {
            cells.extend(columns.iter().map(|c| c.is_missing(row)));
        }

        Self {
            n_rows,
            column_names: table.column_names().into_iter().map(String::from).collect(),
            cells,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Panics if `row` or `col` is out of bounds.
    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        assert!(col < self.n_columns(), "column index out of bounds");
        self.cells[row * self.n_columns() + col]
    }

    /// One row of the grid.
    pub fn row(&self, row: usize) -> &[bool] {
        let width = self.n_columns();
        &self.cells[row * width..(row + 1) * width]
    }

    pub fn any_missing(&self) -> bool {
        self.cells.iter().any(|&m| m)
    }
}

/// Rendering sink for a missingness matrix.
pub trait MissingnessVisualizer {
    fn render(&mut self, matrix: &MissingnessMatrix, title: &str);
}

impl<F> MissingnessVisualizer for F
where
    F: FnMut(&MissingnessMatrix, &str),
{
    fn render(&mut self, matrix: &MissingnessMatrix, title: &str) {
        self(matrix, title)
    }
}

/// Render the missingness heatmap of `table` if it has any missing cell.
///
/// Returns whether the visualizer was invoked.
pub fn plot_missing(table: &Table, visualizer: &mut dyn MissingnessVisualizer) -> bool {
    if !table.has_missing() {
        return false;
    }
    visualizer.render(&MissingnessMatrix::from_table(table), HEATMAP_TITLE);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn table() -> Table {
        Table::new(vec![
            Column::numeric("a", [Some(1.0), None, Some(3.0)]),
            Column::categorical("b", [None, Some("x"), Some("y")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_matrix_covers_every_cell() {
        let matrix = MissingnessMatrix::from_table(&table());
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_columns(), 2);
        assert!(!matrix.is_missing(0, 0));
        assert!(matrix.is_missing(0, 1));
        assert!(matrix.is_missing(1, 0));
        assert_eq!(matrix.row(2), &[false, false]);
        assert!(matrix.any_missing());
    }

    #[test]
    fn test_plot_missing_invokes_visualizer() {
        let mut seen = Vec::new();
        let mut sink = |m: &MissingnessMatrix, title: &str| {
            seen.push((m.n_rows(), title.to_string()));
        };
        assert!(plot_missing(&table(), &mut sink));
        assert_eq!(seen, vec![(3, HEATMAP_TITLE.to_string())]);
    }

    #[test]
    fn test_plot_missing_skips_complete_table() {
        let complete = Table::new(vec![Column::numeric("a", [Some(1.0)])]).unwrap();
        let mut calls = 0;
        let mut sink = |_: &MissingnessMatrix, _: &str| calls += 1;
        assert!(!plot_missing(&complete, &mut sink));
        assert_eq!(calls, 0);
    }
}
