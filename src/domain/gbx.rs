//! GBX-style operations table.
//!
//! One row per trade, preceded by four title/summary rows and interleaved
//! with sentinel rows (empty `Order#`). Summary rows that reuse the table
//! layout may follow the last trade.

use crate::domain::error::ReportError;
use crate::domain::raw_table::RawTable;
use crate::domain::table::{Cell, Row, Table};

/// Column names of the raw GBX table. The first one is dropped once the
/// sentinel rows are gone.
pub const GBX_COLUMNS: [&str; 14] = [
    "Order#",
    "OpenTime",
    "Type",
    "Volume",
    "Symbol",
    "OpenPrice",
    "SL",
    "TP",
    "CloseTime",
    "ClosePrice",
    "Commission",
    "Taxes",
    "Swap",
    "Profit",
];

const TITLE_ROWS: usize = 4;
const ORDER_COL: usize = 0;
const TYPE_COL: usize = 2;

/// Prune a GBX table into canonical rows indexed `0..n`.
pub fn extract_gbx_operations(table: &RawTable) -> Result<Table, ReportError> {
    let width = GBX_COLUMNS.len();
    let mut body: Vec<Vec<String>> = Vec::with_capacity(table.len().saturating_sub(TITLE_ROWS));

    for (i, raw) in table.rows().iter().enumerate().skip(TITLE_ROWS) {
        if raw.len() > width {
            return Err(ReportError::RowShape {
                row: i,
                expected: width,
                found: raw.len(),
            });
        }
        let mut cells = raw.clone();
        cells.resize(width, String::new());
        body.push(cells);
    }

    let before = body.len();
    body.retain(|r| !r[ORDER_COL].is_empty());
    tracing::debug!(sentinels = before - body.len(), "dropped gbx sentinel rows");

    let Some(flag) = body.first().map(|r| r[TYPE_COL].clone()) else {
        return Err(ReportError::EmptyReport);
    };
    // first row always matches its own flag
    let last = body
        .iter()
        .rposition(|r| r[TYPE_COL] == flag)
        .unwrap_or(0);
    if last + 1 < body.len() {
        tracing::warn!(
            dropped = body.len() - last - 1,
            %flag,
            "dropping gbx rows after last trade"
        );
        body.truncate(last + 1);
    }

    let rows = body
        .into_iter()
        .enumerate()
        .map(|(i, cells)| {
            Row::new(
                i.to_string(),
                cells.into_iter().skip(1).map(Cell::Text).collect(),
            )
        })
        .collect();

    Table::canonical(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::is_valid;

    fn title_rows() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Genbox backtest"],
            vec!["Strategy", "Sample"],
            vec!["Initial balance", "10000"],
            GBX_COLUMNS.to_vec(),
        ]
    }

    fn trade(order: &'static str, ty: &'static str, profit: &'static str) -> Vec<&'static str> {
        vec![
            order,
            "2020.01.02 10:00",
            ty,
            "0.10",
            "EURUSD",
            "1.10000",
            "0",
            "0",
            "2020.01.02 18:00",
            "1.10200",
            "-0.70",
            "0",
            "0",
            profit,
        ]
    }

    fn sentinel() -> Vec<&'static str> {
        vec![""; GBX_COLUMNS.len()]
    }

    fn build(body: Vec<Vec<&'static str>>) -> RawTable {
        let mut rows = title_rows();
        rows.extend(body);
        RawTable::from(rows)
    }

    #[test]
    fn keeps_genuine_trades_only() {
        let mut footer = sentinel();
        footer[TYPE_COL] = "Buy";
        footer[13] = "40.00";
        let raw = build(vec![
            trade("1", "Buy", "20.00"),
            trade("2", "Buy", "20.00"),
            sentinel(),
            footer,
        ]);

        let ops = extract_gbx_operations(&raw).unwrap();
        assert!(is_valid(&ops));
        assert_eq!(ops.len(), 2);
        assert_eq!(ops.keys().collect::<Vec<_>>(), vec!["0", "1"]);
        assert_eq!(ops.index_name(), "#");
    }

    #[test]
    fn drops_summary_rows_after_last_flagged_row() {
        let mut totals = trade("Total", "", "40.00");
        totals[TYPE_COL] = "Totals";
        let raw = build(vec![
            trade("10", "Sell", "5"),
            trade("11", "Sell", "6"),
            sentinel(),
            totals,
            vec!["Summary", "x", "Net profit", "11"],
        ]);

        let ops = extract_gbx_operations(&raw).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops.get(1, "Profit"), Some(&Cell::text("6")));
    }

    #[test]
    fn single_row_table_keeps_its_row() {
        let raw = build(vec![trade("1", "Sell", "3")]);
        let ops = extract_gbx_operations(&raw).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops.get(0, "Type"), Some(&Cell::text("Sell")));
    }

    #[test]
    fn order_column_is_dropped() {
        let raw = build(vec![trade("77", "Buy", "1")]);
        let ops = extract_gbx_operations(&raw).unwrap();
        assert_eq!(ops.columns()[0], "OpenTime");
        assert!(ops.column_position("Order#").is_none());
        assert_eq!(ops.get(0, "Symbol"), Some(&Cell::text("EURUSD")));
        assert_eq!(ops.get(0, "Commission"), Some(&Cell::text("-0.70")));
    }

    #[test]
    fn only_sentinels_is_empty_report() {
        let raw = build(vec![sentinel(), sentinel()]);
        assert!(matches!(
            extract_gbx_operations(&raw),
            Err(ReportError::EmptyReport)
        ));
    }

    #[test]
    fn title_only_is_empty_report() {
        let raw = RawTable::from(title_rows());
        assert!(matches!(
            extract_gbx_operations(&raw),
            Err(ReportError::EmptyReport)
        ));
    }

    #[test]
    fn wide_row_is_rejected() {
        let mut wide = trade("1", "Buy", "1");
        wide.push("extra");
        let raw = build(vec![wide]);
        assert!(matches!(
            extract_gbx_operations(&raw),
            Err(ReportError::RowShape { row: 4, .. })
        ));
    }

    #[test]
    fn later_rows_of_other_type_before_last_flag_survive() {
        let raw = build(vec![
            trade("1", "Buy", "1"),
            trade("2", "Sell", "2"),
            trade("3", "Buy", "3"),
        ]);
        let ops = extract_gbx_operations(&raw).unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops.get(1, "Type"), Some(&Cell::text("Sell")));
    }
}
