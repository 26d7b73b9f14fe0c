//! Conversion between polars `DataFrame`s and [`Table`]s.
//!
//! Column kinds follow the frame's dtypes:
//!
//! | polars dtype                    | [`ColumnKind`] | cells           |
//! |---------------------------------|----------------|-----------------|
//! | integers, floats                | `Numeric`      | `Number` (f64)  |
//! | `String`, `Categorical`, `Enum` | `Categorical`  | `Text`          |
//! | `Boolean`                       | `Other`        | `Bool`          |
//! | anything else                   | `Other`        | display text    |
//!
//! Nulls become [`Value::Missing`] in every case.

use crate::error::{ImputationError, Result, ResultExt};
use crate::table::{Column, ColumnKind, Table, Value};
use polars::prelude::{Column as FrameColumn, *};

// =============================================================================
// Data Type Mapping
// =============================================================================

#[inline]
fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Column kind a series of this dtype converts to.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if matches!(
        dtype,
        DataType::String | DataType::Categorical(_, _) | DataType::Enum(_, _)
    ) {
        ColumnKind::Categorical
    } else {
        ColumnKind::Other
    }
}

// =============================================================================
// DataFrame -> Table
// =============================================================================

impl TryFrom<&DataFrame> for Table {
    type Error = ImputationError;

    fn try_from(df: &DataFrame) -> Result<Self> {
        let columns = df
            .get_columns()
            .iter()
            .map(|column| {
                series_to_column(column.as_materialized_series())
                    .context(format!("converting column '{}'", column.name()))
            })
            .collect::<Result<Vec<_>>>()?;

        Table::new(columns)
    }
}

fn series_to_column(series: &Series) -> Result<Column> {
    let name = series.name().to_string();
    let kind = column_kind(series.dtype());

    let values: Vec<Value> = match (kind, series.dtype()) {
        (ColumnKind::Numeric, _) => {
            let cast = series.cast(&DataType::Float64)?;
            cast.f64()?.into_iter().map(Value::from).collect()
        }
        (_, DataType::Boolean) => series.bool()?.into_iter().map(Value::from).collect(),
        _ => {
            let cast = series.cast(&DataType::String)?;
            cast.str()?.into_iter().map(Value::from).collect()
        }
    };

    Ok(Column::new(name, kind, values))
}

// =============================================================================
// Table -> DataFrame
// =============================================================================

impl Table {
    /// Convert back to a polars `DataFrame`.
    ///
    /// A column becomes `Float64` when all its present cells are numbers and
    /// it is not categorical, `Boolean` when all present cells are booleans,
    /// and `String` otherwise. Cells that do not fit the chosen dtype (left
    /// behind by a type mismatch) are written as their display text, so a
    /// numeric column holding text comes out as `String`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns: Vec<FrameColumn> = self
            .columns()
            .iter()
            .map(|column| column_to_series(column).into())
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}

fn column_to_series(column: &Column) -> Series {
    let name: PlSmallStr = column.name().into();
    let values = column.values();
    let present = || values.iter().filter(|v| !v.is_missing());

    if column.kind() != ColumnKind::Categorical
        && present().all(|v| matches!(v, Value::Number(_)))
    {
        let floats: Vec<Option<f64>> = values.iter().map(Value::as_f64).collect();
        return Series::new(name, floats);
    }

    if column.kind() == ColumnKind::Other
        && present().next().is_some()
        && present().all(|v| matches!(v, Value::Bool(_)))
    {
        let bools: Vec<Option<bool>> = values
            .iter()
            .map(|v| match v {
                Value::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Series::new(name, bools);
    }

    let strings: Vec<Option<String>> = values
        .iter()
        .map(|v| match v {
            _ if v.is_missing() => None,
            Value::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect();
    Series::new(name, strings)
}
