//! Column imputers.
//!
//! Each imputer fills the missing cells of one column, writing by row
//! position and never touching present cells:
//! - [`numeric`]: random draw from a min..max progression stepped by the
//!   column's standard deviation
//! - [`categorical`]: constant sentinel or random draw from observed categories

pub mod categorical;
pub mod numeric;

pub use categorical::impute_categorical;
pub use numeric::{impute_numeric, numeric_candidates};

use crate::types::SkipReason;

/// Counters for one imputed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillStats {
    /// Missing cells that received a value.
    pub filled: usize,
    /// Cells whose missing check failed and which were left untouched.
    pub type_mismatches: usize,
}

/// Result of running an imputer over a column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFill {
    Filled(FillStats),
    Skipped(SkipReason),
}
