use crate::clean::utils::parse_number;
use crate::error::Result;
use crate::table::CleanedTable;
use arrow::{
    array::{Array, ArrayRef, Float64Builder},
    datatypes::{DataType, Field},
};
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// Convert a text column to `Float64`. Cells that do not parse become nulls;
/// no row is dropped. A column that is already numeric is returned as-is.
pub fn coerce_numeric(
    table: &CleanedTable,
    column: &str,
    strip: Option<&Regex>,
) -> Result<CleanedTable> {
    let idx = table.column_index(column)?;
    let Some(sarr) = table.text_array(idx) else {
        debug!(column, "already numeric");
        return Ok(table.clone());
    };

    let mut b = Float64Builder::with_capacity(sarr.len());
    let mut degraded = 0usize;
    for opt in sarr.iter() {
        let v = opt.and_then(|s| parse_number(s, strip));
        if opt.is_some() && v.is_none() {
            degraded += 1;
        }
        b.append_option(v);
    }
    if degraded > 0 {
        debug!(column, degraded, "unparsable cells set to missing");
    }

    table.replace_column(
        idx,
        Field::new(column, DataType::Float64, true),
        Arc::new(b.finish()) as ArrayRef,
    )
}
