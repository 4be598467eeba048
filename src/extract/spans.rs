// src/extract/spans.rs

/// Upper bound on `colspan`/`rowspan`; larger values are clamped.
pub const MAX_SPAN: usize = 1000;

/// One `<td>`/`<th>` as read from the markup, before span expansion.
#[derive(Debug, Clone)]
pub(crate) struct SourceCell {
    pub text: String,
    pub colspan: usize,
    pub rowspan: usize,
}

/// Missing, unparsable or zero spans count as 1.
pub(crate) fn parse_span(attr: Option<&str>) -> usize {
    attr.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map(|n| n.min(MAX_SPAN))
        .unwrap_or(1)
}

/// Lay source rows onto a grid: `colspan` repeats a cell's text across the
/// columns it covers, `rowspan` carries it down into the following rows.
/// Rows come back ragged; padding happens in `RawTable::new`.
pub(crate) fn expand_spans(rows: Vec<Vec<SourceCell>>) -> Vec<Vec<Option<String>>> {
    // per column: text still owed to later rows, and how many rows it is owed to
    let mut carried: Vec<Option<(String, usize)>> = Vec::new();
    let mut out = Vec::with_capacity(rows.len());

    for cells in rows {
        let mut line: Vec<Option<String>> = Vec::new();
        let mut col = 0usize;

        for cell in cells {
            // columns still owned by a rowspan from above are skipped, even mid-colspan
            for _ in 0..cell.colspan {
                while let Some(text) = take_carried(&mut carried, col) {
                    place(&mut line, col, text);
                    col += 1;
                }
                place(&mut line, col, cell.text.clone());
                if cell.rowspan > 1 {
                    if carried.len() <= col {
                        carried.resize(col + 1, None);
                    }
                    carried[col] = Some((cell.text.clone(), cell.rowspan - 1));
                }
                col += 1;
            }
        }

        // carried cells right of the last source cell
        while col < carried.len() {
            if let Some(text) = take_carried(&mut carried, col) {
                place(&mut line, col, text);
            }
            col += 1;
        }

        out.push(line);
    }

    out
}

fn take_carried(carried: &mut [Option<(String, usize)>], col: usize) -> Option<String> {
    let slot = carried.get_mut(col)?;
    let (text, done) = {
        let (text, remaining) = slot.as_mut()?;
        *remaining -= 1;
        (text.clone(), *remaining == 0)
    };
    if done {
        *slot = None;
    }
    Some(text)
}

fn place(line: &mut Vec<Option<String>>, idx: usize, text: String) {
    if line.len() <= idx {
        line.resize(idx + 1, None);
    }
    line[idx] = Some(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str, colspan: usize, rowspan: usize) -> SourceCell {
        SourceCell {
            text: text.to_string(),
            colspan,
            rowspan,
        }
    }

    fn strs(row: &[Option<String>]) -> Vec<&str> {
        row.iter().map(|c| c.as_deref().unwrap_or("<none>")).collect()
    }

    #[test]
    fn parse_span_defaults() {
        assert_eq!(parse_span(None), 1);
        assert_eq!(parse_span(Some("0")), 1);
        assert_eq!(parse_span(Some("abc")), 1);
        assert_eq!(parse_span(Some(" 3 ")), 3);
        assert_eq!(parse_span(Some("99999")), MAX_SPAN);
    }

    #[test]
    fn colspan_repeats_across_columns() {
        let grid = expand_spans(vec![vec![cell("Total", 2, 1), cell("3", 1, 1)]]);
        assert_eq!(strs(&grid[0]), vec!["Total", "Total", "3"]);
    }

    #[test]
    fn rowspan_carries_down() {
        let grid = expand_spans(vec![
            vec![cell("North", 1, 2), cell("2020", 1, 1)],
            vec![cell("2021", 1, 1)],
            vec![cell("South", 1, 1), cell("2020", 1, 1)],
        ]);
        assert_eq!(strs(&grid[0]), vec!["North", "2020"]);
        assert_eq!(strs(&grid[1]), vec!["North", "2021"]);
        assert_eq!(strs(&grid[2]), vec!["South", "2020"]);
    }

    #[test]
    fn colspan_skips_columns_held_by_rowspan() {
        let grid = expand_spans(vec![
            vec![cell("X", 1, 1), cell("Y", 1, 2), cell("Z", 1, 1)],
            vec![cell("P", 2, 1), cell("Q", 1, 1)],
        ]);
        assert_eq!(strs(&grid[0]), vec!["X", "Y", "Z"]);
        assert_eq!(strs(&grid[1]), vec!["P", "Y", "P", "Q"]);
    }

    #[test]
    fn trailing_rowspan_fills_short_row() {
        let grid = expand_spans(vec![
            vec![cell("a", 1, 1), cell("b", 1, 1), cell("note", 1, 2)],
            vec![cell("c", 1, 1)],
        ]);
        assert_eq!(strs(&grid[1]), vec!["c", "<none>", "note"]);
    }
}
