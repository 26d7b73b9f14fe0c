//! Imputation for categorical columns.
//!
//! Two methods are available (see [`CategoricalMethod`]):
//! - `Constant` writes the configured sentinel into every missing cell.
//! - `RandomFromObserved` draws each missing cell independently from the
//!   column's distinct present values.
//!
//! Columns with more distinct categories than
//! `max_categorical_cardinality` are left alone: such columns are usually
//! identifiers, and repeating an observed identifier would fabricate a
//! duplicate record.

use crate::config::{CategoricalMethod, ImputationPolicy};
use crate::error::{ImputationError, Result};
use crate::imputers::{ColumnFill, FillStats};
use crate::table::{Column, Value};
use crate::types::SkipReason;
use rand::Rng;
use tracing::{debug, warn};

/// Fill the missing cells of a categorical column according to `policy`.
///
/// Returns [`ColumnFill::Skipped`] when the cardinality gate rejects the
/// column. Fails with [`ImputationError::EmptyCandidateSet`] when the random
/// method finds no observed category; nothing is written in that case.
pub fn impute_categorical<R>(
    column: &mut Column,
    policy: &ImputationPolicy,
    rng: &mut R,
) -> Result<ColumnFill>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<String> = column
        .distinct_observed()
        .into_iter()
        .map(String::from)
        .collect();

    if candidates.len() > policy.max_categorical_cardinality {
        debug!(
            "'{}': {} distinct categories exceed limit {}",
            column.name(),
            candidates.len(),
            policy.max_categorical_cardinality
        );
        return Ok(ColumnFill::Skipped(SkipReason::Cardinality {
            distinct: candidates.len(),
            max: policy.max_categorical_cardinality,
        }));
    }

    let stats = match policy.categorical_method {
        CategoricalMethod::Constant => {
            let sentinel = &policy.categorical_sentinel;
            if candidates.contains(sentinel) {
                warn!(
                    "'{}': sentinel '{}' is also an observed category",
                    column.name(),
                    sentinel
                );
            }
            fill_missing(column, || Value::Text(sentinel.clone()))
        }
        CategoricalMethod::RandomFromObserved => {
            if candidates.is_empty() {
                return Err(ImputationError::EmptyCandidateSet {
                    column: column.name().to_string(),
                });
            }
            fill_missing(column, || {
                Value::Text(candidates[rng.gen_range(0..candidates.len())].clone())
            })
        }
    };

    Ok(ColumnFill::Filled(stats))
}

/// Write `next()` into every missing cell, skipping cells whose missing
/// check fails.
fn fill_missing<F>(column: &mut Column, mut next: F) -> FillStats
where
    F: FnMut() -> Value,
{
    let mut stats = FillStats::default();

    for row in 0..column.len() {
        match column.check_cell(row) {
            Ok(true) => {
                column.set(row, next());
                stats.filled += 1;
            }
            Ok(false) => {}
            Err(e) => {
                debug!("'{}': leaving cell as is: {}", column.name(), e);
                stats.type_mismatches += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn random_policy() -> ImputationPolicy {
        ImputationPolicy::builder()
            .categorical_method(CategoricalMethod::RandomFromObserved)
            .build()
            .unwrap()
    }

    fn filled(result: ColumnFill) -> FillStats {
        match result {
            ColumnFill::Filled(stats) => stats,
            ColumnFill::Skipped(reason) => panic!("unexpected skip: {}", reason),
        }
    }

    // ========================================================================
    // Constant method
    // ========================================================================

    #[test]
    fn test_constant_writes_sentinel() {
        let mut column = Column::categorical("c", [Some("a"), Some("b"), None, Some("a"), None]);
        let mut rng = StdRng::seed_from_u64(0);

        let stats = filled(
            impute_categorical(&mut column, &ImputationPolicy::default(), &mut rng).unwrap(),
        );

        assert_eq!(stats.filled, 2);
        let values: Vec<&str> = column.values().iter().filter_map(Value::as_str).collect();
        assert_eq!(values, vec!["a", "b", "NULL", "a", "NULL"]);
    }

    #[test]
    fn test_constant_custom_sentinel() {
        let mut column = Column::categorical("c", [None, Some("x")]);
        let policy = ImputationPolicy::builder()
            .categorical_sentinel("<missing>")
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        impute_categorical(&mut column, &policy, &mut rng).unwrap();

        assert_eq!(column.values()[0], Value::from("<missing>"));
    }

    #[test]
    fn test_constant_on_entirely_missing_column() {
        let mut column = Column::categorical("c", [None::<&str>, None]);
        let mut rng = StdRng::seed_from_u64(0);

        let stats = filled(
            impute_categorical(&mut column, &ImputationPolicy::default(), &mut rng).unwrap(),
        );

        assert_eq!(stats.filled, 2);
        assert_eq!(column.missing_count(), 0);
    }

    // ========================================================================
    // Random method
    // ========================================================================

    #[test]
    fn test_random_draws_from_observed() {
        let mut column = Column::categorical(
            "c",
            [Some("red"), None, Some("blue"), None, None, Some("red")],
        );
        let mut rng = StdRng::seed_from_u64(11);

        let stats = filled(impute_categorical(&mut column, &random_policy(), &mut rng).unwrap());

        assert_eq!(stats.filled, 3);
        for value in column.values() {
            let s = value.as_str().unwrap();
            assert!(s == "red" || s == "blue", "unexpected category {}", s);
        }
    }

    #[test]
    fn test_random_without_observed_values_fails() {
        let mut column = Column::categorical("c", [None::<&str>, None, None]);
        let mut rng = StdRng::seed_from_u64(0);

        let err = impute_categorical(&mut column, &random_policy(), &mut rng).unwrap_err();

        assert!(matches!(err, ImputationError::EmptyCandidateSet { ref column } if column == "c"));
        // Nothing written, no sentinel substituted
        assert_eq!(column.missing_count(), 3);
    }

    #[test]
    fn test_random_single_category() {
        let mut column = Column::categorical("c", [None, Some("only"), None, Some("only")]);
        let mut rng = StdRng::seed_from_u64(21);

        impute_categorical(&mut column, &random_policy(), &mut rng).unwrap();

        assert!(column.values().iter().all(|v| v == &Value::from("only")));
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let original = Column::categorical(
            "c",
            [Some("a"), None, Some("b"), None, Some("c"), None, None],
        );
        let mut a = original.clone();
        let mut b = original.clone();

        impute_categorical(&mut a, &random_policy(), &mut StdRng::seed_from_u64(5)).unwrap();
        impute_categorical(&mut b, &random_policy(), &mut StdRng::seed_from_u64(5)).unwrap();

        assert_eq!(a, b);
    }

    // ========================================================================
    // Gates and per-cell failures
    // ========================================================================

    #[test]
    fn test_cardinality_gate() {
        let mut values: Vec<Option<String>> = (0..25).map(|i| Some(format!("id-{}", i))).collect();
        values.push(None);
        let mut column = Column::categorical("c", values);
        let before = column.clone();
        let mut rng = StdRng::seed_from_u64(0);

        let result = impute_categorical(&mut column, &random_policy(), &mut rng).unwrap();

        assert_eq!(
            result,
            ColumnFill::Skipped(SkipReason::Cardinality {
                distinct: 25,
                max: 20
            })
        );
        assert_eq!(column, before);
    }

    #[test]
    fn test_cardinality_limit_is_inclusive() {
        let mut values: Vec<Option<String>> = (0..20).map(|i| Some(format!("v{}", i))).collect();
        values.push(None);
        let mut column = Column::categorical("c", values);
        let mut rng = StdRng::seed_from_u64(0);

        let result = impute_categorical(&mut column, &ImputationPolicy::default(), &mut rng);

        assert!(matches!(result, Ok(ColumnFill::Filled(_))));
    }

    #[test]
    fn test_mismatched_cells_left_untouched() {
        let mut column = Column::new(
            "c",
            ColumnKind::Categorical,
            vec![
                Value::from("a"),
                Value::Number(3.0),
                Value::Missing,
                Value::Bool(true),
            ],
        );
        let mut rng = StdRng::seed_from_u64(0);

        let stats = filled(
            impute_categorical(&mut column, &ImputationPolicy::default(), &mut rng).unwrap(),
        );

        assert_eq!(stats.filled, 1);
        assert_eq!(stats.type_mismatches, 2);
        assert_eq!(column.values()[1], Value::Number(3.0));
        assert_eq!(column.values()[2], Value::from("NULL"));
        assert_eq!(column.values()[3], Value::Bool(true));
    }
}
