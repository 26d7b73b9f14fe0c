//! Report types produced by the profiler and the imputation engine.
//!
//! These are plain data: presentation (console tables, JSON, UI) is left to
//! the caller. Everything serializes with serde.

use crate::profiler::statistics::NumericSummary;
use crate::table::ColumnKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Profiling
// ============================================================================

/// Missingness profile of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingnessReport {
    pub n_rows: usize,
    pub n_columns: usize,
    pub total_cells: usize,
    pub total_missing: usize,
    /// `total_missing / total_cells`, 0.0 for a table without cells.
    pub missing_fraction: f64,
    /// Columns with at least one missing cell, in table order.
    pub columns: Vec<ColumnMissingness>,
}

static_assertions::assert_impl_all!(MissingnessReport: Send, Sync);

impl MissingnessReport {
    pub fn has_missing(&self) -> bool {
        self.total_missing > 0
    }

    /// Missing count for a column; 0 when the column is complete or unknown.
    pub fn missing_count(&self, column: &str) -> usize {
        self.column(column).map_or(0, |c| c.missing_count)
    }

    pub fn column(&self, column: &str) -> Option<&ColumnMissingness> {
        self.columns.iter().find(|c| c.name == column)
    }
}

/// Missingness of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissingness {
    pub name: String,
    pub kind: ColumnKind,
    pub missing_count: usize,
    pub missing_fraction: f64,
    /// Present only when long listing was requested, the column kind is
    /// numeric or categorical, and the column has at least one present value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ColumnDetail>,
}

/// Descriptive statistics that help choose an imputation strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnDetail {
    Numeric {
        max: f64,
        min: f64,
        mean: f64,
        std: f64,
    },
    Categorical {
        mode_value: String,
        mode_count: usize,
    },
}

impl From<NumericSummary> for ColumnDetail {
    fn from(summary: NumericSummary) -> Self {
        ColumnDetail::Numeric {
            max: summary.max,
            min: summary.min,
            mean: summary.mean,
            std: summary.std,
        }
    }
}

// ============================================================================
// Imputation
// ============================================================================

/// Whether the engine had anything to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationStatus {
    /// The table had no missing cells; nothing was touched.
    NoOp,
    /// At least one column was considered for imputation.
    Completed,
}

/// How a column's missing cells were filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Random draw from the min..max progression stepped by the std.
    Distribution,
    /// Configured sentinel.
    Constant,
    /// Random draw from the observed categories.
    RandomFromObserved,
}

impl fmt::Display for FillMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Distribution => "distribution",
            Self::Constant => "constant",
            Self::RandomFromObserved => "random",
        };
        f.write_str(name)
    }
}

/// Why a column was left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// `missing >= n_rows * max_missing_fraction`.
    TooManyMissing {
        missing: usize,
        n_rows: usize,
        max_fraction: f64,
    },
    /// No present value at all; statistics are undefined.
    EntirelyMissing,
    /// Numeric column whose present cells are all non-numeric.
    NoNumericValues,
    /// More distinct categories than allowed.
    Cardinality { distinct: usize, max: usize },
    /// Column kind is not imputed.
    UnsupportedKind { kind: ColumnKind },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyMissing {
                missing,
                n_rows,
                max_fraction,
            } => write!(
                f,
                "skipped: too many missing ({} of {} rows, limit {:.0}%)",
                missing,
                n_rows,
                max_fraction * 100.0
            ),
            Self::EntirelyMissing => f.write_str("skipped: entirely missing"),
            Self::NoNumericValues => f.write_str("skipped: no numeric values"),
            Self::Cardinality { distinct, max } => write!(
                f,
                "skipped: cardinality ({} distinct > {})",
                distinct, max
            ),
            Self::UnsupportedKind { kind } => write!(f, "skipped: unsupported kind ({})", kind),
        }
    }
}

/// What happened to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ColumnAction {
    Imputed { cells: usize, method: FillMethod },
    Skipped(SkipReason),
    /// Nothing was missing.
    Complete,
}

/// Per-column outcome of an imputation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutcome {
    pub name: String,
    pub kind: ColumnKind,
    pub missing_before: usize,
    pub missing_after: usize,
    /// Cells whose missing check failed on an incomparable value; left as is.
    pub type_mismatches: usize,
    pub action: ColumnAction,
}

impl ColumnOutcome {
    pub fn cells_imputed(&self) -> usize {
        match self.action {
            ColumnAction::Imputed { cells, .. } => cells,
            _ => 0,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.action {
            ColumnAction::Skipped(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Result summary of [`crate::ImputationEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationReport {
    pub status: ImputationStatus,
    pub cells_imputed: usize,
    pub missing_before: usize,
    pub missing_after: usize,
    /// Numeric columns first, then categorical, then the rest; table order
    /// within each group.
    pub columns: Vec<ColumnOutcome>,
}

impl ImputationReport {
    pub(crate) fn no_op() -> Self {
        Self {
            status: ImputationStatus::NoOp,
            cells_imputed: 0,
            missing_before: 0,
            missing_after: 0,
            columns: Vec::new(),
        }
    }

    pub fn is_no_op(&self) -> bool {
        self.status == ImputationStatus::NoOp
    }

    pub fn column(&self, name: &str) -> Option<&ColumnOutcome> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ColumnOutcome> {
        self.columns
            .iter()
            .filter(|c| matches!(c.action, ColumnAction::Skipped(_)))
    }
}

impl fmt::Display for ImputationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ImputationStatus::NoOp => f.write_str("no-op, 0 cells imputed"),
            ImputationStatus::Completed => write!(
                f,
                "imputed {} cells ({} missing before, {} after)",
                self.cells_imputed, self.missing_before, self.missing_after
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::Cardinality {
            distinct: 25,
            max: 20,
        };
        assert_eq!(reason.to_string(), "skipped: cardinality (25 distinct > 20)");

        let reason = SkipReason::TooManyMissing {
            missing: 3,
            n_rows: 5,
            max_fraction: 0.5,
        };
        assert_eq!(
            reason.to_string(),
            "skipped: too many missing (3 of 5 rows, limit 50%)"
        );

        assert_eq!(
            SkipReason::NoNumericValues.to_string(),
            "skipped: no numeric values"
        );
    }

    #[test]
    fn test_no_op_report_display() {
        let report = ImputationReport::no_op();
        assert!(report.is_no_op());
        assert_eq!(report.to_string(), "no-op, 0 cells imputed");
    }

    #[test]
    fn test_column_outcome_serialization() {
        let outcome = ColumnOutcome {
            name: "city".to_string(),
            kind: ColumnKind::Categorical,
            missing_before: 2,
            missing_after: 0,
            type_mismatches: 0,
            action: ColumnAction::Imputed {
                cells: 2,
                method: FillMethod::Constant,
            },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["action"]["action"], "imputed");
        assert_eq!(json["action"]["method"], "constant");
        assert_eq!(json["kind"], "categorical");
        assert_eq!(outcome.cells_imputed(), 2);
    }

    #[test]
    fn test_report_lookup() {
        let report = MissingnessReport {
            n_rows: 4,
            n_columns: 2,
            total_cells: 8,
            total_missing: 1,
            missing_fraction: 0.125,
            columns: vec![ColumnMissingness {
                name: "age".to_string(),
                kind: ColumnKind::Numeric,
                missing_count: 1,
                missing_fraction: 0.25,
                detail: None,
            }],
        };
        assert!(report.has_missing());
        assert_eq!(report.missing_count("age"), 1);
        assert_eq!(report.missing_count("city"), 0);
    }
}
