//! Missing Data Profiling and Imputation Library
//!
//! Measures where a table is missing data and fills the gaps in a way that
//! keeps each column's overall shape.
//!
//! # Overview
//!
//! - **Profiling**: Global and per-column missing counts, with optional
//!   descriptive statistics (min/max/mean/std or mode) per column
//! - **Numeric Imputation**: Uniform draws from a grid spanning the observed
//!   range with a step of one standard deviation
//! - **Categorical Imputation**: A constant sentinel, or uniform draws from the
//!   observed categories
//! - **Eligibility Rules**: Columns that are mostly missing, or categorical
//!   columns with too many categories, are left alone and reported as skipped
//! - **Visualization Seam**: The full missingness matrix can be handed to any
//!   renderer through [`MissingnessVisualizer`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_imputation::{
//!     ImputationEngine, ImputationPolicy, MissingnessProfiler, ProfileOptions, Table,
//! };
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//! let mut table = Table::try_from(&df)?;
//!
//! // Profile first
//! let profiler = MissingnessProfiler::new(ProfileOptions::default().long_list_missing(true));
//! let report = profiler.profile(&table);
//! println!("{} of {} cells missing", report.total_missing, report.total_cells);
//!
//! // Then impute, reproducibly
//! let policy = ImputationPolicy::builder().seed(42).build()?;
//! let result = ImputationEngine::new(policy)?.impute_seeded(&mut table)?;
//! println!("{}", result.report);
//!
//! let cleaned: DataFrame = result.table.to_frame()?;
//! ```
//!
//! # Configuration
//!
//! Use [`ImputationPolicy`] to customize imputation:
//!
//! ```rust,ignore
//! use lex_imputation::config::*;
//!
//! let policy = ImputationPolicy::builder()
//!     .mutation(MutationMode::InPlace)                       // Write into the caller's table
//!     .categorical_method(CategoricalMethod::RandomFromObserved)
//!     .max_categorical_cardinality(20)                       // Skip columns with >20 categories
//!     .max_missing_fraction(0.5)                             // Skip columns >=50% missing
//!     .seed(7)
//!     .build()?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod imputers;
pub mod profiler;
pub mod table;
pub mod types;
pub mod visualize;

// Re-exports for convenient access
pub use config::{
    CategoricalMethod, ConfigValidationError, ImputationPolicy, ImputationPolicyBuilder,
    MutationMode, ProfileOptions,
};
pub use engine::{Imputation, ImputationEngine, ImputedTable};
pub use error::{CellError, ImputationError, Result as ImputationResult, ResultExt};
pub use imputers::{impute_categorical, impute_numeric, numeric_candidates};
pub use profiler::MissingnessProfiler;
pub use profiler::statistics::NumericSummary;
pub use table::{Column, ColumnKind, Table, Value};
pub use types::{
    ColumnAction, ColumnDetail, ColumnMissingness, ColumnOutcome, FillMethod, ImputationReport,
    ImputationStatus, MissingnessReport, SkipReason,
};
pub use visualize::{HEATMAP_TITLE, MissingnessMatrix, MissingnessVisualizer, plot_missing};
