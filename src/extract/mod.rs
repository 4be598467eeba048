// src/extract/mod.rs
//! Turn `<table>` elements of a parsed document into `RawTable`s.

mod spans;

pub use spans::MAX_SPAN;

use crate::error::{Result, TidyError};
use crate::table::RawTable;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use spans::{expand_spans, parse_span, SourceCell};
use tracing::{debug, info, instrument};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("selector should parse"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("selector should parse"));

/// Extract tables from `document`, in document order.
///
/// - `selector = None`: every `<table>`, nested ones included as separate tables.
/// - `selector = Some(css)`: one table per matching element. A match that is not
///   a `<table>` stands for its first descendant `<table>`, or an empty table if
///   it has none. Zero matches is `TidyError::NotFound`.
#[instrument(level = "info", skip(document))]
pub fn extract_tables(document: &Html, selector: Option<&str>) -> Result<Vec<RawTable>> {
    let roots: Vec<Option<ElementRef>> = match selector {
        None => document.select(&TABLE).map(Some).collect(),
        Some(css) => {
            let sel = Selector::parse(css).map_err(|e| TidyError::InvalidSelector {
                selector: css.to_string(),
                message: format!("{:?}", e),
            })?;
            let matched: Vec<ElementRef> = document.select(&sel).collect();
            if matched.is_empty() {
                return Err(TidyError::NotFound {
                    selector: css.to_string(),
                });
            }
            matched.into_iter().map(resolve_table).collect()
        }
    };

    let tables: Vec<RawTable> = roots
        .into_iter()
        .enumerate()
        .map(|(i, root)| match root {
            Some(table) => {
                let raw = table_to_raw(table);
                debug!(
                    index = i,
                    rows = raw.num_rows(),
                    cols = raw.width(),
                    header = raw.headers.is_some(),
                    "extracted table"
                );
                raw
            }
            None => {
                debug!(index = i, "matched element holds no <table>; empty table");
                RawTable::default()
            }
        })
        .collect();

    info!("extracted {} table(s)", tables.len());
    Ok(tables)
}

fn resolve_table(el: ElementRef) -> Option<ElementRef> {
    if el.value().name() == "table" {
        Some(el)
    } else {
        el.select(&TABLE).next()
    }
}

fn table_to_raw(table: ElementRef) -> RawTable {
    let mut has_header = false;
    let mut rows: Vec<Vec<SourceCell>> = Vec::new();

    for tr in table
        .select(&ROW)
        .filter(|tr| owning_table(*tr) == Some(table))
    {
        let cells: Vec<ElementRef> = tr
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| matches!(c.value().name(), "td" | "th"))
            .collect();

        if rows.is_empty() {
            has_header = in_thead(tr)
                || (!cells.is_empty() && cells.iter().all(|c| c.value().name() == "th"));
        }
        rows.push(cells.into_iter().map(source_cell).collect());
    }

    let mut grid = expand_spans(rows);
    let headers = if has_header && !grid.is_empty() {
        let first = grid.remove(0);
        Some(first.into_iter().map(Option::unwrap_or_default).collect())
    } else {
        None
    };

    RawTable::new(headers, grid)
}

/// The nearest enclosing `<table>`, so rows of nested tables are not claimed by the outer one.
fn owning_table(tr: ElementRef) -> Option<ElementRef> {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

fn in_thead(tr: ElementRef) -> bool {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .map(|a| a.value().name())
        .find(|n| matches!(*n, "thead" | "tbody" | "tfoot" | "table"))
        == Some("thead")
}

fn source_cell(cell: ElementRef) -> SourceCell {
    let text = cell.text().collect::<String>();
    SourceCell {
        text: text.split_whitespace().collect::<Vec<_>>().join(" "),
        colspan: parse_span(cell.value().attr("colspan")),
        rowspan: parse_span(cell.value().attr("rowspan")),
    }
}
