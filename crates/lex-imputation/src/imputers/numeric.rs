//! Distribution-preserving imputation for numeric columns.
//!
//! Missing cells are filled with values drawn uniformly from the progression
//! `min, min + std, min + 2*std, ...` that stops strictly before `max`. Each
//! missing cell gets its own draw, so the filled values spread over the
//! column's observed range instead of collapsing onto the mean.
//!
//! The maximum itself is never a candidate.

use crate::error::{ImputationError, Result};
use crate::imputers::FillStats;
use crate::profiler::statistics::NumericSummary;
use crate::table::{Column, Value};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Candidate values for a column with the given summary.
///
/// A zero (or non-finite) std, or a column whose values are all equal,
/// yields the single candidate `min`.
pub fn numeric_candidates(summary: &NumericSummary) -> Vec<f64> {
    let NumericSummary { min, max, std, .. } = *summary;
    let range = max - min;

    if !(std > 0.0 && std.is_finite() && range > 0.0 && range.is_finite()) {
        return vec![min];
    }

    let steps = (range / std).ceil() as usize;
    (0..steps)
        .map(|i| min + i as f64 * std)
        .take_while(|v| *v < max)
        .collect()
}

/// Fill every missing cell of a numeric column with an independent draw
/// from [`numeric_candidates`].
///
/// Cells holding non-numeric values are left untouched and counted in
/// [`FillStats::type_mismatches`]. Fails with
/// [`ImputationError::EmptyCandidateSet`] when the column has no present
/// numeric value.
pub fn impute_numeric<R>(column: &mut Column, rng: &mut R) -> Result<FillStats>
where
    R: Rng + ?Sized,
{
    let summary = column
        .numeric_summary()
        .ok_or_else(|| ImputationError::EmptyCandidateSet {
            column: column.name().to_string(),
        })?;
    let candidates = numeric_candidates(&summary);

    debug!(
        "'{}': {} candidates in [{}, {}) step {:.4}",
        column.name(),
        candidates.len(),
        summary.min,
        summary.max,
        summary.std
    );

    let mut stats = FillStats::default();
    for row in 0..column.len() {
        match column.check_cell(row) {
            Ok(true) => {
                // `candidates` always holds at least `min`.
                if let Some(&value) = candidates.choose(rng) {
                    column.set(row, Value::Number(value));
                    stats.filled += 1;
                }
            }
            Ok(false) => {}
            Err(e) => {
                debug!("'{}': leaving cell as is: {}", column.name(), e);
                stats.type_mismatches += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::statistics::summarize;
    use crate::table::ColumnKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn summary_of(values: &[f64]) -> NumericSummary {
        summarize(values).unwrap()
    }

    // ========================================================================
    // numeric_candidates() tests
    // ========================================================================

    #[test]
    fn test_candidates_progression() {
        // [1, 2, 4]: population std = 1.2472...
        let summary = summary_of(&[1.0, 2.0, 4.0]);
        let candidates = numeric_candidates(&summary);

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0], 1.0);
        assert!((candidates[1] - (1.0 + summary.std)).abs() < 1e-12);
        assert!((candidates[2] - (1.0 + 2.0 * summary.std)).abs() < 1e-12);
    }

    #[test]
    fn test_candidates_exclude_max() {
        // Range 2, std 1 -> [1, 2]; 3 is the maximum and stays out
        let summary = NumericSummary {
            count: 2,
            min: 1.0,
            max: 3.0,
            mean: 2.0,
            std: 1.0,
        };
        assert_eq!(numeric_candidates(&summary), vec![1.0, 2.0]);
    }

    #[test]
    fn test_candidates_zero_std() {
        let summary = summary_of(&[7.0, 7.0, 7.0]);
        assert_eq!(numeric_candidates(&summary), vec![7.0]);
    }

    #[test]
    fn test_candidates_single_value() {
        let summary = summary_of(&[-3.5]);
        assert_eq!(numeric_candidates(&summary), vec![-3.5]);
    }

    #[test]
    fn test_candidates_stay_in_range() {
        let summary = summary_of(&[0.1, 0.2, 0.3, 10.0, 0.7, 5.5]);
        let candidates = numeric_candidates(&summary);
        assert!(!candidates.is_empty());
        assert!(
            candidates
                .iter()
                .all(|v| *v >= summary.min && *v < summary.max)
        );
    }

    // ========================================================================
    // impute_numeric() tests
    // ========================================================================

    #[test]
    fn test_impute_fills_every_missing_cell() {
        let mut column = Column::numeric("x", [Some(1.0), Some(2.0), None, Some(4.0), None]);
        let mut rng = StdRng::seed_from_u64(7);

        let stats = impute_numeric(&mut column, &mut rng).unwrap();

        assert_eq!(stats.filled, 2);
        assert_eq!(stats.type_mismatches, 0);
        assert_eq!(column.missing_count(), 0);
        assert_eq!(column.values()[0], Value::Number(1.0));
        assert_eq!(column.values()[1], Value::Number(2.0));
        assert_eq!(column.values()[3], Value::Number(4.0));
        for row in [2, 4] {
            let v = column.values()[row].as_f64().unwrap();
            assert!((1.0..4.0).contains(&v));
        }
    }

    #[test]
    fn test_impute_nan_counts_as_missing() {
        let mut column = Column::new(
            "x",
            ColumnKind::Numeric,
            vec![Value::Number(f64::NAN), Value::Number(3.0), Value::Number(5.0)],
        );
        let mut rng = StdRng::seed_from_u64(1);

        let stats = impute_numeric(&mut column, &mut rng).unwrap();

        assert_eq!(stats.filled, 1);
        assert!(!column.values()[0].is_missing());
    }

    #[test]
    fn test_impute_is_reproducible_with_seed() {
        let original = Column::numeric(
            "x",
            [Some(0.0), None, Some(10.0), None, Some(3.0), None, Some(8.0)],
        );

        let mut a = original.clone();
        let mut b = original.clone();
        impute_numeric(&mut a, &mut StdRng::seed_from_u64(42)).unwrap();
        impute_numeric(&mut b, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_impute_skips_mismatched_cells() {
        let mut column = Column::new(
            "x",
            ColumnKind::Numeric,
            vec![
                Value::Number(1.0),
                Value::from("n/a?"),
                Value::Missing,
                Value::Number(2.0),
            ],
        );
        let mut rng = StdRng::seed_from_u64(3);

        let stats = impute_numeric(&mut column, &mut rng).unwrap();

        assert_eq!(stats.filled, 1);
        assert_eq!(stats.type_mismatches, 1);
        assert_eq!(column.values()[1], Value::from("n/a?"));
        // Candidates for [1, 2] with std 0.5 are [1.0, 1.5]
        let filled = column.values()[2].as_f64().unwrap();
        assert!(filled == 1.0 || filled == 1.5);
    }

    #[test]
    fn test_impute_constant_column_fills_with_min() {
        let mut column = Column::numeric("x", [Some(2.0), None, Some(2.0), Some(2.0)]);
        let mut rng = StdRng::seed_from_u64(0);

        impute_numeric(&mut column, &mut rng).unwrap();

        assert_eq!(column.values()[1], Value::Number(2.0));
    }

    #[test]
    fn test_impute_all_missing_fails() {
        let mut column = Column::numeric("x", [None, None]);
        let mut rng = StdRng::seed_from_u64(0);

        let err = impute_numeric(&mut column, &mut rng).unwrap_err();

        assert!(matches!(err, ImputationError::EmptyCandidateSet { .. }));
        assert_eq!(column.missing_count(), 2);
    }
}
