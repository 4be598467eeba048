use crate::error::Result;
use crate::table::CleanedTable;
use arrow::{array::BooleanArray, compute::filter_record_batch};
use regex::Regex;
use tracing::debug;

/// Condition on a single cell, evaluated against its text rendering.
#[derive(Debug, Clone)]
pub enum RowPredicate {
    Equals(String),
    Contains(String),
    Matches(Regex),
    /// The cell is missing (padding or failed coercion).
    Missing,
}

impl RowPredicate {
    pub fn matches(&self, cell: Option<&str>) -> bool {
        match (self, cell) {
            (RowPredicate::Missing, c) => c.is_none(),
            (_, None) => false,
            (RowPredicate::Equals(v), Some(c)) => c == v,
            (RowPredicate::Contains(v), Some(c)) => c.contains(v.as_str()),
            (RowPredicate::Matches(re), Some(c)) => re.is_match(c),
        }
    }
}

/// Remove every row whose `column` cell satisfies `predicate`.
pub fn drop_rows(
    table: &CleanedTable,
    column: &str,
    predicate: &RowPredicate,
) -> Result<CleanedTable> {
    let idx = table.column_index(column)?;
    let keep: Vec<bool> = table
        .rendered_column(idx)
        .iter()
        .map(|c| !predicate.matches(c.as_deref()))
        .collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped == 0 {
        return Ok(table.clone());
    }

    let batch = filter_record_batch(table.batch(), &BooleanArray::from(keep))?;
    debug!(column, dropped, "dropped rows");
    Ok(CleanedTable::from_batch(batch))
}
