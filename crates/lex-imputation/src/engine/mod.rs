//! Imputation engine.
//!
//! [`ImputationEngine`] runs the column imputers over a whole table under one
//! [`ImputationPolicy`]: numeric columns first, then categorical columns,
//! each group in table order. Other column kinds pass through untouched.

mod eligibility;

use crate::config::{CategoricalMethod, ImputationPolicy, MutationMode};
use crate::error::Result;
use crate::imputers::{ColumnFill, impute_categorical, impute_numeric};
use crate::table::{Column, ColumnKind, Table};
use crate::types::{
    ColumnAction, ColumnOutcome, FillMethod, ImputationReport, ImputationStatus, SkipReason,
};
use eligibility::{Eligibility, assess};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::{Deref, DerefMut};
use tracing::{debug, info, warn};

/// Fills eligible columns of a [`Table`].
///
/// # Example
///
/// ```rust,ignore
/// use lex_imputation::{ImputationEngine, ImputationPolicy, MutationMode};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let engine = ImputationEngine::new(
///     ImputationPolicy::builder().mutation(MutationMode::InPlace).build()?,
/// )?;
/// let mut rng = StdRng::seed_from_u64(7);
/// let result = engine.impute(&mut table, &mut rng)?;
/// println!("{}", result.report);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImputationEngine {
    policy: ImputationPolicy,
}

static_assertions::assert_impl_all!(ImputationEngine: Send, Sync);

/// Table returned by [`ImputationEngine::impute`].
#[derive(Debug)]
pub enum ImputedTable<'a> {
    /// The caller's table, mutated.
    InPlace(&'a mut Table),
    /// A copy; the caller's table is unchanged.
    Copied(Table),
}

impl ImputedTable<'_> {
    pub fn is_in_place(&self) -> bool {
        matches!(self, ImputedTable::InPlace(_))
    }

    /// Take ownership of the result, cloning when it is the caller's table.
    pub fn into_owned(self) -> Table {
        match self {
            ImputedTable::InPlace(table) => table.clone(),
            ImputedTable::Copied(table) => table,
        }
    }
}

impl Deref for ImputedTable<'_> {
    type Target = Table;

    fn deref(&self) -> &Table {
        match self {
            ImputedTable::InPlace(table) => table,
            ImputedTable::Copied(table) => table,
        }
    }
}

impl DerefMut for ImputedTable<'_> {
    fn deref_mut(&mut self) -> &mut Table {
        match self {
            ImputedTable::InPlace(table) => table,
            ImputedTable::Copied(table) => table,
        }
    }
}

/// Output of [`ImputationEngine::impute`].
#[derive(Debug)]
pub struct Imputation<'a> {
    pub table: ImputedTable<'a>,
    pub report: ImputationReport,
}

impl ImputationEngine {
    /// Create an engine, validating the policy.
    pub fn new(policy: ImputationPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &ImputationPolicy {
        &self.policy
    }

    /// Impute according to `policy.mutation`.
    ///
    /// With [`MutationMode::InPlace`] the returned table is `table` itself;
    /// with [`MutationMode::Copy`] it is a fresh table and `table` is left
    /// as it was.
    pub fn impute<'a, R>(&self, table: &'a mut Table, rng: &mut R) -> Result<Imputation<'a>>
    where
        R: Rng + ?Sized,
    {
        match self.policy.mutation {
            MutationMode::InPlace => {
                let report = self.impute_in_place(table, rng)?;
                Ok(Imputation {
                    table: ImputedTable::InPlace(table),
                    report,
                })
            }
            MutationMode::Copy => {
                let (copy, report) = self.impute_copy(table, rng)?;
                Ok(Imputation {
                    table: ImputedTable::Copied(copy),
                    report,
                })
            }
        }
    }

    /// Like [`impute`](Self::impute), with a generator seeded from
    /// `policy.seed` or, when unset, from OS entropy.
    pub fn impute_seeded<'a>(&self, table: &'a mut Table) -> Result<Imputation<'a>> {
        let mut rng = match self.policy.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.impute(table, &mut rng)
    }

    /// Clone `table` in full, then impute the clone.
    pub fn impute_copy<R>(&self, table: &Table, rng: &mut R) -> Result<(Table, ImputationReport)>
    where
        R: Rng + ?Sized,
    {
        let mut copy = table.clone();
        let report = self.impute_in_place(&mut copy, rng)?;
        Ok((copy, report))
    }

    /// Impute directly into `table`.
    ///
    /// One seed per column is drawn from `rng` up front, in table order, and
    /// each column draws from its own generator. The result therefore
    /// depends only on `rng`'s state, not on the order columns are visited.
    ///
    /// If an imputer fails, the error is returned and columns imputed before
    /// it keep their new values.
    pub fn impute_in_place<R>(&self, table: &mut Table, rng: &mut R) -> Result<ImputationReport>
    where
        R: Rng + ?Sized,
    {
        let missing_before = table.total_missing();
        if missing_before == 0 {
            info!("Table has no missing values; nothing to impute");
            return Ok(ImputationReport::no_op());
        }

        info!(
            "Imputing {} missing values across {} columns...",
            missing_before,
            table.n_columns()
        );

        let seeds: Vec<u64> = (0..table.n_columns()).map(|_| rng.next_u64()).collect();
        let n_rows = table.n_rows();

        let mut columns = Vec::with_capacity(table.n_columns());
        for idx in processing_order(table.columns()) {
            let column = &mut table.columns_mut()[idx];
            let mut column_rng = StdRng::seed_from_u64(seeds[idx]);
            columns.push(self.impute_column(column, n_rows, &mut column_rng)?);
        }

        let cells_imputed = columns.iter().map(ColumnOutcome::cells_imputed).sum();
        let missing_after = table.total_missing();

        info!(
            "Imputation complete: {} cells filled, {} still missing",
            cells_imputed, missing_after
        );

        Ok(ImputationReport {
            status: ImputationStatus::Completed,
            cells_imputed,
            missing_before,
            missing_after,
            columns,
        })
    }

    fn impute_column(
        &self,
        column: &mut Column,
        n_rows: usize,
        rng: &mut StdRng,
    ) -> Result<ColumnOutcome> {
        let missing_before = column.missing_count();
        let mut type_mismatches = 0;

        let action = match assess(column, n_rows, &self.policy) {
            Eligibility::Complete => {
                debug!("'{}': complete", column.name());
                ColumnAction::Complete
            }
            Eligibility::Skip(reason) => {
                warn!("'{}' {}", column.name(), reason);
                ColumnAction::Skipped(reason)
            }
            Eligibility::Eligible => match column.kind() {
                ColumnKind::Numeric => {
                    debug!("'{}': numeric fill, {} missing", column.name(), missing_before);
                    let stats = impute_numeric(column, rng)?;
                    type_mismatches = stats.type_mismatches;
                    ColumnAction::Imputed {
                        cells: stats.filled,
                        method: FillMethod::Distribution,
                    }
                }
                ColumnKind::Categorical => match impute_categorical(column, &self.policy, rng)? {
                    ColumnFill::Filled(stats) => {
                        type_mismatches = stats.type_mismatches;
                        ColumnAction::Imputed {
                            cells: stats.filled,
                            method: categorical_fill_method(&self.policy),
                        }
                    }
                    ColumnFill::Skipped(reason) => {
                        warn!("'{}' {}", column.name(), reason);
                        ColumnAction::Skipped(reason)
                    }
                },
                ColumnKind::Other => ColumnAction::Skipped(SkipReason::UnsupportedKind {
                    kind: ColumnKind::Other,
                }),
            },
        };

        if type_mismatches > 0 {
            debug!(
                "'{}': {} cells left untouched after failed missing checks",
                column.name(),
                type_mismatches
            );
        }

        Ok(ColumnOutcome {
            name: column.name().to_string(),
            kind: column.kind(),
            missing_before,
            missing_after: column.missing_count(),
            type_mismatches,
            action,
        })
    }
}

fn categorical_fill_method(policy: &ImputationPolicy) -> FillMethod {
    match policy.categorical_method {
        CategoricalMethod::Constant => FillMethod::Constant,
        CategoricalMethod::RandomFromObserved => FillMethod::RandomFromObserved,
    }
}

/// Column indices: numeric, then categorical, then the rest; table order
/// within each group.
fn processing_order(columns: &[Column]) -> Vec<usize> {
    let rank = |kind: ColumnKind| match kind {
        ColumnKind::Numeric => 0,
        ColumnKind::Categorical => 1,
        ColumnKind::Other => 2,
    };

    let mut order: Vec<usize> = (0..columns.len()).collect();
    // Stable sort keeps table order inside each kind.
    order.sort_by_key(|&i| rank(columns[i].kind()));
    order
}
