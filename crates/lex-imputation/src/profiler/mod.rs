//! Missingness profiling.
//!
//! [`MissingnessProfiler`] counts missing cells globally and per column and,
//! when long listing is requested, attaches descriptive statistics that help
//! decide how to fill each column. Profiling never mutates the table and
//! never draws random numbers, so profiling the same table twice yields the
//! same report.

pub mod statistics;

use crate::config::ProfileOptions;
use crate::table::{Column, ColumnKind, Table};
use crate::types::{ColumnDetail, ColumnMissingness, MissingnessReport};
use crate::visualize::{HEATMAP_TITLE, MissingnessMatrix, MissingnessVisualizer};
use tracing::debug;

/// Profiler for missing values in a [`Table`].
#[derive(Debug, Clone, Default)]
pub struct MissingnessProfiler {
    options: ProfileOptions,
}

impl MissingnessProfiler {
    pub fn new(options: ProfileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProfileOptions {
        &self.options
    }

    /// Profile the table without rendering anything.
    pub fn profile(&self, table: &Table) -> MissingnessReport {
        let total_cells = table.total_cells();

        let columns: Vec<ColumnMissingness> = table
            .columns()
            .iter()
            .filter_map(|column| self.profile_column(column, table.n_rows()))
            .collect();

        let total_missing = columns.iter().map(|c| c.missing_count).sum();
        let missing_fraction = if total_cells > 0 {
            total_missing as f64 / total_cells as f64
        } else {
            0.0
        };

        debug!(
            "Profiled {} columns: {} of {} cells missing",
            table.n_columns(),
            total_missing,
            total_cells
        );

        MissingnessReport {
            n_rows: table.n_rows(),
            n_columns: table.n_columns(),
            total_cells,
            total_missing,
            missing_fraction,
            columns,
        }
    }

    /// Profile the table and, if plotting is enabled and something is
    /// missing, hand the full missingness matrix to `visualizer`.
    pub fn profile_with(
        &self,
        table: &Table,
        visualizer: Option<&mut dyn MissingnessVisualizer>,
    ) -> MissingnessReport {
        let report = self.profile(table);

        if self.options.plot_missing
            && report.has_missing()
            && let Some(visualizer) = visualizer
        {
            visualizer.render(&MissingnessMatrix::from_table(table), HEATMAP_TITLE);
        }

        report
    }

    /// `None` for columns without missing cells.
    fn profile_column(&self, column: &Column, n_rows: usize) -> Option<ColumnMissingness> {
        let missing_count = column.missing_count();
        if missing_count == 0 {
            return None;
        }

        let detail = if self.options.long_list_missing {
            column_detail(column)
        } else {
            None
        };

        Some(ColumnMissingness {
            name: column.name().to_string(),
            kind: column.kind(),
            missing_count,
            missing_fraction: missing_count as f64 / n_rows as f64,
            detail,
        })
    }
}

/// Statistics for a numeric or categorical column with at least one present
/// value. Mismatched cells are not part of the statistics.
pub(crate) fn column_detail(column: &Column) -> Option<ColumnDetail> {
    match column.kind() {
        ColumnKind::Numeric => column.numeric_summary().map(ColumnDetail::from),
        ColumnKind::Categorical => {
            let present = column.values().iter().filter_map(|v| v.as_str());
            statistics::mode(present).map(|(value, count)| ColumnDetail::Categorical {
                mode_value: value.to_string(),
                mode_count: count,
            })
        }
        ColumnKind::Other => None,
    }
}
