// src/clean/mod.rs
//! Rule-driven cleaning of a `RawTable` into a typed `CleanedTable`.

pub mod convert;
pub mod filter;
pub mod trimming;
pub mod utils;

pub use convert::coerce_numeric;
pub use filter::{drop_rows, RowPredicate};
pub use trimming::strip_text;

use crate::error::{Result, TidyError};
use crate::table::{CleanedTable, RawTable};
use regex::Regex;
use tracing::{info, instrument, trace};

/// One cleaning step. Data problems never fail a rule; only references to
/// columns that are absent (or of the wrong type) do.
#[derive(Debug, Clone)]
pub enum CleaningRule {
    DropRows {
        column: String,
        predicate: RowPredicate,
    },
    Rename {
        from: String,
        to: String,
    },
    CoerceNumeric {
        column: String,
        strip: Option<Regex>,
    },
    StripText {
        column: String,
        pattern: Regex,
    },
}

impl CleaningRule {
    pub fn kind(&self) -> &'static str {
        match self {
            CleaningRule::DropRows { .. } => "drop_rows",
            CleaningRule::Rename { .. } => "rename",
            CleaningRule::CoerceNumeric { .. } => "coerce_numeric",
            CleaningRule::StripText { .. } => "strip_text",
        }
    }
}

/// Apply `rules` in order; each rule sees the result of the previous ones.
#[instrument(level = "info", skip(raw, rules), fields(rules = rules.len()))]
pub fn clean_table(raw: &RawTable, rules: &[CleaningRule]) -> Result<CleanedTable> {
    let mut table = CleanedTable::from_raw(raw)?;
    for (step, rule) in rules.iter().enumerate() {
        trace!(step, rule = rule.kind(), "applying");
        table = apply_rule(&table, rule)?;
    }
    info!(rows = table.num_rows(), cols = table.num_columns(), "cleaned");
    Ok(table)
}

pub fn apply_rule(table: &CleanedTable, rule: &CleaningRule) -> Result<CleanedTable> {
    match rule {
        CleaningRule::DropRows { column, predicate } => drop_rows(table, column, predicate),
        CleaningRule::Rename { from, to } => rename_column(table, from, to),
        CleaningRule::CoerceNumeric { column, strip } => {
            coerce_numeric(table, column, strip.as_ref())
        }
        CleaningRule::StripText { column, pattern } => strip_text(table, column, pattern),
    }
}

pub fn rename_column(table: &CleanedTable, from: &str, to: &str) -> Result<CleanedTable> {
    let idx = table.column_index(from)?;
    if from == to {
        return Ok(table.clone());
    }
    if table.column_index(to).is_ok() {
        return Err(TidyError::DuplicateColumn {
            column: to.to_string(),
        });
    }
    let field = table.schema().field(idx).clone().with_name(to);
    table.replace_column(idx, field, table.batch().column(idx).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;

    fn raw(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            Some(vec![
                "Age".into(),
                "Male Population".into(),
                "Female Population".into(),
            ]),
            rows.iter()
                .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
                .collect(),
        )
    }

    fn re(p: &str) -> Regex {
        Regex::new(p).unwrap()
    }

    #[test]
    fn empty_rules_are_identity() {
        let r = raw(&[&["0-4", "1,900,000", "1,800,000"], &["5-9", "2,000,000"]]);
        let cleaned = clean_table(&r, &[]).unwrap();
        assert_eq!(cleaned, CleanedTable::from_raw(&r).unwrap());
        assert_eq!(cleaned.column_names(), r.column_names());
        for (i, name) in r.column_names().iter().enumerate() {
            let expected: Vec<Option<String>> =
                r.column(i).map(|c| c.map(str::to_string)).collect();
            assert_eq!(cleaned.text_column(name).unwrap(), expected);
        }
    }

    #[test]
    fn coerce_strips_and_keeps_bad_rows() {
        let r = raw(&[&["0-4", "1,234", "1"], &["5-9", "N/A", "2"]]);
        let rules = [CleaningRule::CoerceNumeric {
            column: "Male Population".into(),
            strip: Some(re(",")),
        }];
        let t = clean_table(&r, &rules).unwrap();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.column_type("Male Population").unwrap(), ColumnType::Numeric);
        assert_eq!(
            t.numeric_column("Male Population").unwrap(),
            vec![Some(1234.0), None]
        );
    }

    #[test]
    fn rename_then_coerce() {
        let r = raw(&[&["0-4", "8,320,000", "8,000,000"]]);
        let rules = [
            CleaningRule::Rename {
                from: "Male Population".into(),
                to: "Male".into(),
            },
            CleaningRule::CoerceNumeric {
                column: "Male".into(),
                strip: Some(re(",")),
            },
        ];
        let t = clean_table(&r, &rules).unwrap();
        assert_eq!(t.column_names(), vec!["Age", "Male", "Female Population"]);
        assert_eq!(t.numeric_column("Male").unwrap(), vec![Some(8_320_000.0)]);
    }

    #[test]
    fn later_rules_see_earlier_renames() {
        let r = raw(&[&["0-4", "1", "2"]]);
        let rules = [
            CleaningRule::Rename {
                from: "Male Population".into(),
                to: "Male".into(),
            },
            CleaningRule::CoerceNumeric {
                column: "Male Population".into(),
                strip: None,
            },
        ];
        match clean_table(&r, &rules) {
            Err(TidyError::ColumnNotFound { column, .. }) => assert_eq!(column, "Male Population"),
            other => panic!("expected ColumnNotFound, got {:?}", other),
        }
    }

    #[test]
    fn drop_rows_and_strip_text() {
        let r = raw(&[
            &["0-4 [a]", "1", "2"],
            &["5-9", "3", "4"],
            &["Total", "4", "6"],
        ]);
        let rules = [
            CleaningRule::DropRows {
                column: "Age".into(),
                predicate: RowPredicate::Equals("Total".into()),
            },
            CleaningRule::StripText {
                column: "Age".into(),
                pattern: re(r"\[.*?\]"),
            },
        ];
        let t = clean_table(&r, &rules).unwrap();
        assert_eq!(
            t.text_column("Age").unwrap(),
            vec![Some("0-4".to_string()), Some("5-9".to_string())]
        );
        assert_eq!(
            t.text_column("Female Population").unwrap(),
            vec![Some("2".to_string()), Some("4".to_string())]
        );
    }

    #[test]
    fn drop_rows_on_numeric_column_uses_rendered_value() {
        let r = raw(&[&["0-4", "0", "2"], &["5-9", "n/a", "4"], &["10-14", "7", "1"]]);
        let rules = [
            CleaningRule::CoerceNumeric {
                column: "Male Population".into(),
                strip: None,
            },
            CleaningRule::DropRows {
                column: "Male Population".into(),
                predicate: RowPredicate::Missing,
            },
            CleaningRule::DropRows {
                column: "Male Population".into(),
                predicate: RowPredicate::Equals("0".into()),
            },
        ];
        let t = clean_table(&r, &rules).unwrap();
        assert_eq!(t.text_column("Age").unwrap(), vec![Some("10-14".to_string())]);
    }

    #[test]
    fn rename_edge_cases() {
        let t = CleanedTable::from_raw(&raw(&[&["0-4", "1", "2"]])).unwrap();
        assert_eq!(rename_column(&t, "Age", "Age").unwrap(), t);
        assert!(matches!(
            rename_column(&t, "Age", "Male Population"),
            Err(TidyError::DuplicateColumn { .. })
        ));
        assert!(matches!(
            rename_column(&t, "Sex", "Gender"),
            Err(TidyError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn strip_text_rejects_numeric_column_and_coerce_is_idempotent() {
        let r = raw(&[&["0-4", "1", "2"]]);
        let coerce = CleaningRule::CoerceNumeric {
            column: "Male Population".into(),
            strip: None,
        };
        let once = clean_table(&r, &[coerce.clone()]).unwrap();
        let twice = apply_rule(&once, &coerce).unwrap();
        assert_eq!(once, twice);

        let err = apply_rule(
            &once,
            &CleaningRule::StripText {
                column: "Male Population".into(),
                pattern: re("x"),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TidyError::ColumnType { expected: "text", .. }));
    }
}
