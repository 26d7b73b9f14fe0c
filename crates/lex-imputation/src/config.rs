//! Configuration types for profiling and imputation.
//!
//! [`ImputationPolicy`] controls the engine and is built with a fluent
//! builder that validates on `build()`. [`ProfileOptions`] replaces the
//! interactive questions a profiling session would otherwise ask.

use serde::{Deserialize, Serialize};

/// Default placeholder written by [`CategoricalMethod::Constant`].
pub const DEFAULT_SENTINEL: &str = "NULL";

/// Default upper bound (inclusive) on distinct observed categories.
pub const DEFAULT_MAX_CATEGORICAL_CARDINALITY: usize = 20;

/// Default missing fraction at or above which a column is left alone.
pub const DEFAULT_MAX_MISSING_FRACTION: f64 = 0.5;

/// Whether the engine writes into the caller's table or into a copy of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MutationMode {
    /// Mutate the supplied table.
    InPlace,
    /// Clone the table first and mutate the clone.
    #[default]
    Copy,
}

/// Strategy for filling missing categorical cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalMethod {
    /// Write the configured sentinel into every missing cell.
    #[default]
    Constant,
    /// Draw each missing cell uniformly from the observed categories.
    RandomFromObserved,
}

/// Configuration for the imputation engine.
///
/// # Example
///
/// ```rust,ignore
/// use lex_imputation::config::{CategoricalMethod, ImputationPolicy, MutationMode};
///
/// let policy = ImputationPolicy::builder()
///     .mutation(MutationMode::InPlace)
///     .categorical_method(CategoricalMethod::RandomFromObserved)
///     .seed(7)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationPolicy {
    /// In-place or copy-then-mutate.
    /// Default: Copy
    pub mutation: MutationMode,

    /// How categorical columns are filled.
    /// Default: Constant
    pub categorical_method: CategoricalMethod,

    /// Placeholder used by [`CategoricalMethod::Constant`].
    /// Default: "NULL"
    pub categorical_sentinel: String,

    /// Categorical columns with more distinct observed values are skipped.
    /// Default: 20
    pub max_categorical_cardinality: usize,

    /// Columns are eligible only while `missing < n_rows * fraction`.
    /// Default: 0.5
    pub max_missing_fraction_for_eligibility: f64,

    /// Seed for [`crate::ImputationEngine::impute_seeded`]. `None` draws from OS entropy.
    /// Default: None
    pub seed: Option<u64>,
}

impl Default for ImputationPolicy {
    fn default() -> Self {
        Self {
            mutation: MutationMode::default(),
            categorical_method: CategoricalMethod::default(),
            categorical_sentinel: DEFAULT_SENTINEL.to_string(),
            max_categorical_cardinality: DEFAULT_MAX_CATEGORICAL_CARDINALITY,
            max_missing_fraction_for_eligibility: DEFAULT_MAX_MISSING_FRACTION,
            seed: None,
        }
    }
}

impl ImputationPolicy {
    /// Create a new policy builder.
    pub fn builder() -> ImputationPolicyBuilder {
        ImputationPolicyBuilder::default()
    }

    /// Validate the policy and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let fraction = self.max_missing_fraction_for_eligibility;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigValidationError::InvalidFraction {
                field: "max_missing_fraction_for_eligibility".to_string(),
                value: fraction,
            });
        }

        if self.categorical_sentinel.is_empty() {
            return Err(ConfigValidationError::EmptySentinel);
        }

        if self.max_categorical_cardinality == 0 {
            return Err(ConfigValidationError::InvalidCardinality(
                self.max_categorical_cardinality,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid fraction for '{field}': {value} (must be in (0.0, 1.0])")]
    InvalidFraction { field: String, value: f64 },

    #[error("Categorical sentinel must not be empty")]
    EmptySentinel,

    #[error("Invalid categorical cardinality limit: {0} (must be at least 1)")]
    InvalidCardinality(usize),
}

/// Builder for [`ImputationPolicy`] with fluent API.
#[derive(Debug, Default)]
pub struct ImputationPolicyBuilder {
    mutation: Option<MutationMode>,
    categorical_method: Option<CategoricalMethod>,
    categorical_sentinel: Option<String>,
    max_categorical_cardinality: Option<usize>,
    max_missing_fraction_for_eligibility: Option<f64>,
    seed: Option<u64>,
}

impl ImputationPolicyBuilder {
    /// Choose between in-place mutation and copy-then-mutate.
    pub fn mutation(mut self, mode: MutationMode) -> Self {
        self.mutation = Some(mode);
        self
    }

    /// Set the categorical fill method.
    pub fn categorical_method(mut self, method: CategoricalMethod) -> Self {
        self.categorical_method = Some(method);
        self
    }

    /// Set the placeholder written by the constant method.
    pub fn categorical_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.categorical_sentinel = Some(sentinel.into());
        self
    }

    /// Set the largest number of distinct categories a column may have and
    /// still be imputed.
    pub fn max_categorical_cardinality(mut self, max: usize) -> Self {
        self.max_categorical_cardinality = Some(max);
        self
    }

    /// Set the missing fraction at or above which columns are skipped.
    ///
    /// # Arguments
    /// * `fraction` - Value in (0.0, 1.0] (e.g., 0.5 = half the rows)
    pub fn max_missing_fraction(mut self, fraction: f64) -> Self {
        self.max_missing_fraction_for_eligibility = Some(fraction);
        self
    }

    /// Fix the random seed used by `impute_seeded`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the policy.
    ///
    /// Returns a validated `ImputationPolicy` or an error if validation fails.
    pub fn build(self) -> Result<ImputationPolicy, ConfigValidationError> {
        let policy = ImputationPolicy {
            mutation: self.mutation.unwrap_or_default(),
            categorical_method: self.categorical_method.unwrap_or_default(),
            categorical_sentinel: self
                .categorical_sentinel
                .unwrap_or_else(|| DEFAULT_SENTINEL.to_string()),
            max_categorical_cardinality: self
                .max_categorical_cardinality
                .unwrap_or(DEFAULT_MAX_CATEGORICAL_CARDINALITY),
            max_missing_fraction_for_eligibility: self
                .max_missing_fraction_for_eligibility
                .unwrap_or(DEFAULT_MAX_MISSING_FRACTION),
            seed: self.seed,
        };

        policy.validate()?;
        Ok(policy)
    }
}

/// Options for a profiling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOptions {
    /// Compute per-column statistics for every column with missing values.
    /// Default: false
    pub long_list_missing: bool,

    /// Hand the missingness matrix to a visualizer when one is supplied.
    /// Default: true
    pub plot_missing: bool,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            long_list_missing: false,
            plot_missing: true,
        }
    }
}

impl ProfileOptions {
    pub fn long_list_missing(mut self, enable: bool) -> Self {
        self.long_list_missing = enable;
        self
    }

    pub fn plot_missing(mut self, enable: bool) -> Self {
        self.plot_missing = enable;
        self
    }
}
