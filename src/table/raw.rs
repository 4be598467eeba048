// src/table/raw.rs
use std::collections::HashMap;

/// A grid of text cells read verbatim from one `<table>` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    /// Column names from a structurally marked header row, if the table had one.
    /// Padded with empty names when body rows are wider than the header.
    pub headers: Option<Vec<String>>,
    /// Body rows, top to bottom. Every row holds exactly `width()` cells;
    /// `None` marks a padding cell the source row did not have.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a table, right-padding short rows (and the header) to the widest row.
    pub fn new(headers: Option<Vec<String>>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(headers.iter().map(Vec::len))
            .max()
            .unwrap_or(0);

        let headers = headers.map(|mut h| {
            h.resize(width, String::new());
            h
        });
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, None);
                r
            })
            .collect();

        RawTable { headers, rows }
    }

    /// Widest of the header and every row; shorter rows read as missing trailing cells.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(self.headers.iter().map(Vec::len))
            .max()
            .unwrap_or(0)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.width() == 0
    }

    /// Stable, unique column names.
    ///
    /// Blank or absent header cells become `X1`, `X2`, ... by 1-based position;
    /// repeated names get `_2`, `_3`, ... in order of appearance.
    pub fn column_names(&self) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        (0..self.width())
            .map(|i| {
                let base = self
                    .headers
                    .as_ref()
                    .and_then(|h| h.get(i))
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("X{}", i + 1));

                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                if *count == 1 {
                    base
                } else {
                    format!("{}_{}", base, count)
                }
            })
            .collect()
    }

    /// Cells of column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(idx).and_then(|c| c.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Vec<Option<String>> {
        v.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn short_rows_are_right_padded() {
        let t = RawTable::new(
            Some(vec!["Age".into(), "Male".into(), "Female".into()]),
            vec![cells(&["0-4", "500", "600"]), cells(&["5-9"])],
        );
        assert_eq!(t.width(), 3);
        assert_eq!(t.rows[1], vec![Some("5-9".to_string()), None, None]);
    }

    #[test]
    fn hand_built_table_with_short_first_row_keeps_all_columns() {
        let t = RawTable {
            headers: Some(vec!["Age".into(), "Male".into(), "Female".into()]),
            rows: vec![cells(&["0-4"]), cells(&["5-9", "500", "600"])],
        };
        assert_eq!(t.width(), 3);
        assert_eq!(t.column_names(), vec!["Age", "Male", "Female"]);
        let male: Vec<_> = t.column(1).collect();
        assert_eq!(male, vec![None, Some("500")]);
    }

    #[test]
    fn generated_and_deduplicated_names() {
        let t = RawTable::new(
            Some(vec!["Year".into(), "".into(), "Year".into()]),
            vec![cells(&["2020", "a", "b", "extra"])],
        );
        assert_eq!(t.column_names(), vec!["Year", "X2", "Year_2", "X4"]);

        let headless = RawTable::new(None, vec![cells(&["a", "b"])]);
        assert_eq!(headless.column_names(), vec!["X1", "X2"]);
    }

    #[test]
    fn column_iterates_cells_in_row_order() {
        let t = RawTable::new(None, vec![cells(&["a", "1"]), cells(&["b"])]);
        let col: Vec<_> = t.column(1).collect();
        assert_eq!(col, vec![Some("1"), None]);
    }
}
