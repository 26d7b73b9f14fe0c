//! Descriptive statistics for column profiling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary of the present values of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation (divides by `count`).
    pub std: f64,
}

/// Summarize a slice of present values. `None` for an empty slice.
pub fn summarize(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let mean = calculate_mean(values);
    let std = calculate_population_std(values, mean);

    Some(NumericSummary {
        count: values.len(),
        min,
        max,
        mean,
        std,
    })
}

pub(crate) fn calculate_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with divisor `n`.
pub(crate) fn calculate_population_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Most frequent value and its count.
///
/// Ties go to the value encountered first.
pub fn mode<'a, I>(values: I) -> Option<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<&'a str> = Vec::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();

    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    // Strictly greater keeps the earliest value among equal counts.
    let mut best: Option<(&'a str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== summarize tests ====================

    #[test]
    fn test_summarize_basic() {
        // Values: 1, 2, 4 -> mean 7/3, population variance = 14/9
        let summary = summarize(&[1.0, 2.0, 4.0]).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert!((summary.mean - 7.0 / 3.0).abs() < 1e-12);
        assert!((summary.std - 1.247219128924647).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_summarize_single_value() {
        let summary = summarize(&[5.0]).unwrap();
        assert_eq!(summary.min, 5.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.std, 0.0);
    }

    #[test]
    fn test_population_std_not_sample_std() {
        // Sample std of [1, 2, 3, 4, 5] is ~1.58, population std is sqrt(2)
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let std = calculate_population_std(&values, calculate_mean(&values));
        assert!((std - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_identical_values_zero_std() {
        let values = [5.0, 5.0, 5.0, 5.0];
        assert_eq!(calculate_population_std(&values, 5.0), 0.0);
    }

    // ==================== mode tests ====================

    #[test]
    fn test_mode_basic() {
        assert_eq!(mode(["a", "b", "a", "c", "a"]), Some(("a", 3)));
    }

    #[test]
    fn test_mode_tie_keeps_first_encountered() {
        assert_eq!(mode(["b", "a", "a", "b"]), Some(("b", 2)));
        assert_eq!(mode(["x", "y", "z"]), Some(("x", 1)));
    }

    #[test]
    fn test_mode_empty() {
        assert_eq!(mode(std::iter::empty()), None);
    }
}
