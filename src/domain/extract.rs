//! HTML table extraction.
//!
//! Turns report HTML into an ordered list of [`RawTable`]s: one per `<table>`
//! element, one row per `<tr>`, one cell per `<td>` with its text trimmed.

use crate::domain::error::ReportError;
use crate::domain::raw_table::RawTable;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Result<Selector, ReportError> {
    Selector::parse(css).map_err(|e| ReportError::HtmlParse {
        reason: format!("bad selector {css:?}: {e}"),
    })
}

/// Nearest ancestor element named `tag`.
fn closest<'a>(el: &ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == tag)
}

fn cell_text(td: &ElementRef<'_>) -> String {
    td.text().collect::<String>().trim().to_string()
}

/// Extract every table in document order.
///
/// Rows and cells belonging to a nested table are attributed to the nested
/// table only.
pub fn extract_tables(html: &str) -> Result<Vec<RawTable>, ReportError> {
    if html.trim().is_empty() {
        return Ok(Vec::new());
    }

    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let document = Html::parse_document(html);
    let mut tables = Vec::new();

    for table in document.select(&table_sel) {
        let rows: Vec<Vec<String>> = table
            .select(&row_sel)
            .filter(|tr| closest(tr, "table").map(|t| t.id()) == Some(table.id()))
            .map(|tr| {
                tr.select(&cell_sel)
                    .filter(|td| closest(td, "tr").map(|r| r.id()) == Some(tr.id()))
                    .map(|td| cell_text(&td))
                    .collect()
            })
            .collect();
        tracing::debug!(table = tables.len(), rows = rows.len(), "extracted table");
        tables.push(RawTable::new(rows));
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_tables() {
        assert!(extract_tables("").unwrap().is_empty());
        assert!(extract_tables("   \n").unwrap().is_empty());
    }

    #[test]
    fn html_without_tables_yields_no_tables() {
        let tables = extract_tables("<html><body><p>nothing</p></body></html>").unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn cells_are_trimmed_and_ordered() {
        let html = r#"<table>
            <tr><td> a </td><td>
                b</td></tr>
            <tr><td>c</td></tr>
        </table>"#;
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0].rows(),
            &[vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]
        );
    }

    #[test]
    fn inline_markup_contributes_text() {
        let html = "<table><tr><td><b>Buy</b> <i>limit</i></td></tr></table>";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables[0].cell(0, 0), Some("Buy limit"));
    }

    #[test]
    fn multiple_tables_keep_document_order() {
        let html = "<table><tr><td>first</td></tr></table>\
                    <div><table><tr><td>second</td></tr></table></div>";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].cell(0, 0), Some("first"));
        assert_eq!(tables[1].cell(0, 0), Some("second"));
    }

    #[test]
    fn nested_table_rows_stay_with_inner_table() {
        let html = "<table><tr><td>outer</td><td>\
                    <table><tr><td>inner</td></tr></table>\
                    </td></tr></table>";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 1);
        assert_eq!(tables[0].cell(0, 0), Some("outer"));
        assert_eq!(tables[1].len(), 1);
        assert_eq!(tables[1].cell(0, 0), Some("inner"));
    }

    #[test]
    fn non_breaking_space_is_trimmed() {
        let html = "<table><tr><td>&nbsp;1.10500&nbsp;</td></tr></table>";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables[0].cell(0, 0), Some("1.10500"));
    }
}
