//! Column eligibility rules.

use crate::config::ImputationPolicy;
use crate::table::{Column, ColumnKind};
use crate::types::SkipReason;

/// Verdict for one column, computed before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Eligibility {
    /// No missing cell.
    Complete,
    Eligible,
    Skip(SkipReason),
}

/// Decide whether `column` may be imputed under `policy`.
///
/// A column qualifies when `0 < missing < n_rows * max_fraction`, it has at
/// least one present value, its kind is numeric or categorical, numeric
/// columns hold at least one number, and categorical columns have no more
/// distinct observed values than the cardinality limit.
pub(crate) fn assess(column: &Column, n_rows: usize, policy: &ImputationPolicy) -> Eligibility {
    let missing = column.missing_count();
    if missing == 0 {
        return Eligibility::Complete;
    }

    if column.kind() == ColumnKind::Other {
        return Eligibility::Skip(SkipReason::UnsupportedKind {
            kind: column.kind(),
        });
    }

    if missing == n_rows {
        return Eligibility::Skip(SkipReason::EntirelyMissing);
    }

    let max_fraction = policy.max_missing_fraction_for_eligibility;
    if missing as f64 >= n_rows as f64 * max_fraction {
        return Eligibility::Skip(SkipReason::TooManyMissing {
            missing,
            n_rows,
            max_fraction,
        });
    }

    // Present cells that all failed the numeric check leave nothing to draw from
    if column.kind() == ColumnKind::Numeric && column.observed_numbers().is_empty() {
        return Eligibility::Skip(SkipReason::NoNumericValues);
    }

    if column.kind() == ColumnKind::Categorical {
        let distinct = column.distinct_observed().len();
        if distinct > policy.max_categorical_cardinality {
            return Eligibility::Skip(SkipReason::Cardinality {
                distinct,
                max: policy.max_categorical_cardinality,
            });
        }
    }

    Eligibility::Eligible
}
