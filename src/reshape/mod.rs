// src/reshape/mod.rs
//! Wide → long reshaping.

pub mod long;

pub use long::{LongRecord, LongTable, VALUE_COLUMN, VARIABLE_COLUMN};

use crate::error::{Result, TidyError};
use crate::table::CleanedTable;
use std::collections::HashSet;
use tracing::{info, instrument};

/// Which columns identify a row and which hold measured values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReshapeSpec {
    pub id_columns: Vec<String>,
    pub measure_columns: Vec<String>,
}

impl ReshapeSpec {
    pub fn new<I, M, S, T>(id_columns: I, measure_columns: M) -> Self
    where
        I: IntoIterator<Item = S>,
        M: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        ReshapeSpec {
            id_columns: id_columns.into_iter().map(Into::into).collect(),
            measure_columns: measure_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Shape checks that do not need a table.
    pub fn validate(&self) -> Result<()> {
        if self.id_columns.is_empty() {
            return Err(TidyError::Config("reshape needs at least one id column".into()));
        }
        if self.measure_columns.is_empty() {
            return Err(TidyError::Config("reshape needs at least one measure column".into()));
        }

        let mut seen = HashSet::new();
        for name in self.id_columns.iter().chain(&self.measure_columns) {
            if name == VARIABLE_COLUMN || name == VALUE_COLUMN {
                return Err(TidyError::Config(format!(
                    "`{}` is reserved for the long table and cannot be reshaped",
                    name
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(TidyError::Config(format!(
                    "column `{}` listed more than once across id/measure columns",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// One record per (measure column, row): outer loop over measures in declared
/// order, inner loop over rows in source order. Measure columns must be numeric.
#[instrument(
    level = "info",
    skip(table, spec),
    fields(ids = ?spec.id_columns, measures = ?spec.measure_columns)
)]
pub fn to_long(table: &CleanedTable, spec: &ReshapeSpec) -> Result<LongTable> {
    spec.validate()?;

    for name in spec.id_columns.iter().chain(&spec.measure_columns) {
        table.column_index(name)?;
    }

    let ids: Vec<Vec<Option<String>>> = spec
        .id_columns
        .iter()
        .map(|c| -> Result<Vec<Option<String>>> {
            Ok(table.rendered_column(table.column_index(c)?))
        })
        .collect::<Result<_>>()?;
    let measures: Vec<Vec<Option<f64>>> = spec
        .measure_columns
        .iter()
        .map(|c| table.numeric_column(c))
        .collect::<Result<_>>()?;

    let mut records = Vec::with_capacity(table.num_rows() * measures.len());
    for (variable, values) in spec.measure_columns.iter().zip(&measures) {
        for (row, value) in values.iter().enumerate() {
            records.push(LongRecord {
                ids: ids.iter().map(|col| col[row].clone()).collect(),
                variable: variable.clone(),
                value: *value,
            });
        }
    }

    info!(records = records.len(), "reshaped to long");
    Ok(LongTable::new(
        spec.id_columns.clone(),
        spec.measure_columns.clone(),
        records,
    ))
}
