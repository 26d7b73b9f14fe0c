//! Error types for missingness profiling and imputation.
//!
//! Two layers of failure exist:
//!
//! - [`ImputationError`] covers failures that abort an operation and are
//!   returned to the caller (an empty candidate pool, a malformed table,
//!   invalid configuration, boundary conversions).
//! - [`CellError`] covers failures scoped to a single cell. Imputers recover
//!   from these locally by leaving the cell untouched and counting it.
//!
//! Errors are serializable so that a frontend can display them.

use crate::config::ConfigValidationError;
use crate::table::ColumnKind;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for profiling and imputation.
#[derive(Error, Debug)]
pub enum ImputationError {
    /// An imputer was called on a column with no observed values to draw from.
    #[error("No observed values to draw from in column '{column}'")]
    EmptyCandidateSet { column: String },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Table violates its structural invariants (ragged or duplicate columns).
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Row position outside `0..n_rows`.
    #[error("Row {row} out of bounds for table with {n_rows} rows")]
    RowOutOfBounds { row: usize, n_rows: usize },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ImputationError>,
    },
}

impl ImputationError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ImputationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCandidateSet { .. } => "EMPTY_CANDIDATE_SET",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidTable(_) => "INVALID_TABLE",
            Self::RowOutOfBounds { .. } => "ROW_OUT_OF_BOUNDS",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error was raised by the imputers themselves, as opposed to
    /// the table, configuration or conversions surrounding them.
    pub fn is_imputation_failure(&self) -> bool {
        match self {
            Self::EmptyCandidateSet { .. } => true,
            Self::WithContext { source, .. } => source.is_imputation_failure(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ImputationError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ImputationError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for profiling and imputation operations.
pub type Result<T> = std::result::Result<T, ImputationError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

/// Failure of the missing check on a single cell.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    /// The cell holds a value that cannot be compared under its column's kind.
    #[error("Row {row}: {found} value in {kind} column")]
    TypeMismatch {
        row: usize,
        kind: ColumnKind,
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ImputationError::EmptyCandidateSet {
                column: "city".to_string()
            }
            .error_code(),
            "EMPTY_CANDIDATE_SET"
        );
        assert_eq!(
            ImputationError::ColumnNotFound("test".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_imputation_failure() {
        let err = ImputationError::EmptyCandidateSet {
            column: "city".to_string(),
        };
        assert!(err.is_imputation_failure());
        assert!(err.with_context("While imputing").is_imputation_failure());
        assert!(!ImputationError::InvalidTable("ragged".to_string()).is_imputation_failure());
    }

    #[test]
    fn test_context_keeps_code() {
        let result: Result<()> = Err(ImputationError::from(
            polars::error::PolarsError::ComputeError("bad cast".into()),
        ));
        let err = result.context("converting column 'age'").unwrap_err();

        assert_eq!(err.error_code(), "POLARS_ERROR");
        assert!(err.to_string().starts_with("converting column 'age': "));
        assert!(!err.is_imputation_failure());
    }

    #[test]
    fn test_error_serialization() {
        let error = ImputationError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_with_context() {
        let error =
            ImputationError::ColumnNotFound("test".to_string()).with_context("During profiling");
        assert!(error.to_string().contains("During profiling"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_cell_error_display() {
        let err = CellError::TypeMismatch {
            row: 3,
            kind: ColumnKind::Numeric,
            found: "text",
        };
        assert_eq!(err.to_string(), "Row 3: text value in numeric column");
    }
}
