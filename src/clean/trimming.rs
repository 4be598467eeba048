use crate::clean::utils::strip_matches;
use crate::error::{Result, TidyError};
use crate::table::{CleanedTable, ColumnType};
use arrow::array::{ArrayRef, StringArray};
use regex::Regex;
use std::sync::Arc;

/// Remove `pattern` matches from every cell of a text column.
pub fn strip_text(table: &CleanedTable, column: &str, pattern: &Regex) -> Result<CleanedTable> {
    let idx = table.column_index(column)?;
    let sarr = table.text_array(idx).ok_or_else(|| TidyError::ColumnType {
        column: column.to_string(),
        expected: ColumnType::Text.name(),
        found: ColumnType::Numeric.name(),
    })?;

    let stripped: StringArray = sarr
        .iter()
        .map(|opt| opt.map(|s| strip_matches(s, pattern)))
        .collect();

    let field = table.schema().field(idx).clone();
    table.replace_column(idx, field, Arc::new(stripped) as ArrayRef)
}
