//! In-memory table model consumed by the profiler and the imputers.
//!
//! A [`Table`] is an ordered set of named [`Column`]s sharing one row count.
//! Rows are addressed by a dense position `0..n_rows`; nothing in this crate
//! sorts, filters or reorders rows, so a position identifies the same record
//! before and after imputation.
//!
//! Column kinds are declared once, when the column is built (or converted from
//! a polars `DataFrame`, see [`crate::frame`]), and the imputers dispatch on
//! that declaration instead of probing cell values.

use crate::error::{CellError, ImputationError, Result};
use crate::profiler::statistics::{NumericSummary, summarize};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point measurements.
    Numeric,
    /// Text labels drawn from a (usually small) set of categories.
    Categorical,
    /// Anything else (booleans, dates, nested values). Never imputed.
    Other,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A single cell.
///
/// Serializes untagged, so JSON `null` round-trips as [`Value::Missing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// `Missing`, or a number that is NaN.
    #[inline]
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// A named, typed column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Build a numeric column; `None` marks a missing cell.
    pub fn numeric<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values = values.into_iter().map(Value::from).collect();
        Self::new(name, ColumnKind::Numeric, values)
    }

    /// Build a categorical column; `None` marks a missing cell.
    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|v| v.map_or(Value::Missing, |s| Value::Text(s.into())))
            .collect();
        Self::new(name, ColumnKind::Categorical, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Missing check for one cell under this column's kind.
    ///
    /// Returns `Ok(true)` for a missing cell, `Ok(false)` for a present cell
    /// of the expected type, and an error for a present cell that does not
    /// fit the column kind (text in a numeric column, a number in a
    /// categorical one). `Other` columns accept any present value.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`. Use [`Table::value`] for a checked
    /// lookup.
    pub fn check_cell(&self, row: usize) -> std::result::Result<bool, CellError> {
        let value = &self.values[row];
        if value.is_missing() {
            return Ok(true);
        }

        let fits = match (self.kind, value) {
            (ColumnKind::Numeric, Value::Number(_)) => true,
            (ColumnKind::Categorical, Value::Text(_)) => true,
            (ColumnKind::Other, _) => true,
            _ => false,
        };

        if fits {
            Ok(false)
        } else {
            Err(CellError::TypeMismatch {
                row,
                kind: self.kind,
                found: value.type_name(),
            })
        }
    }

    /// # Panics
    ///
    /// Panics if `row >= self.len()`.
    #[inline]
    pub fn is_missing(&self, row: usize) -> bool {
        self.values[row].is_missing()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Row positions of missing cells, ascending.
    pub fn missing_rows(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_missing())
            .map(|(i, _)| i)
            .collect()
    }

    /// Present numeric values in row order.
    pub fn observed_numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    /// Distinct present text values in first-seen order.
    pub fn distinct_observed(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.values
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// min / max / mean / population std over present numbers.
    /// `None` when the column has no present numeric value.
    pub fn numeric_summary(&self) -> Option<NumericSummary> {
        summarize(&self.observed_numbers())
    }

    pub(crate) fn set(&mut self, row: usize, value: Value) {
        self.values[row] = value;
    }
}

/// Ordered collection of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

static_assertions::assert_impl_all!(Table: Send, Sync, Clone);

impl Table {
    /// Build a table, checking that all columns share one length and that
    /// names are unique.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, Column::len);

        let mut names = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.len() != n_rows {
                return Err(ImputationError::InvalidTable(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.len(),
                    n_rows
                )));
            }
            if !names.insert(column.name.as_str()) {
                return Err(ImputationError::InvalidTable(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn total_cells(&self) -> usize {
        self.n_rows * self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ImputationError::ColumnNotFound(name.to_string()))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| ImputationError::ColumnNotFound(name.to_string()))
    }

    /// Read the cell at `row` of column `name`.
    pub fn value(&self, row: usize, name: &str) -> Result<&Value> {
        let n_rows = self.n_rows;
        self.column(name)?
            .values
            .get(row)
            .ok_or(ImputationError::RowOutOfBounds { row, n_rows })
    }

    /// Overwrite the cell at `row` of column `name`.
    pub fn set_value(&mut self, row: usize, name: &str, value: impl Into<Value>) -> Result<()> {
        let n_rows = self.n_rows;
        if row >= n_rows {
            return Err(ImputationError::RowOutOfBounds { row, n_rows });
        }
        self.column_mut(name)?.set(row, value.into());
        Ok(())
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    pub fn has_missing(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.values.iter().any(Value::is_missing))
    }
}

impl TryFrom<Vec<Column>> for Table {
    type Error = ImputationError;

    fn try_from(columns: Vec<Column>) -> Result<Self> {
        Table::new(columns)
    }
}

impl From<Table> for Vec<Column> {
    fn from(table: Table) -> Self {
        table.columns
    }
}
