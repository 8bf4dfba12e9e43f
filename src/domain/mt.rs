//! MT-style operations table.
//!
//! Each closed trade appears as two or more legs sharing one `Order#`: the
//! first leg opens the trade, the last one closes it. Legs in between
//! (stop or target modifications) are not folded in.

use crate::domain::error::ReportError;
use crate::domain::raw_table::RawTable;
use crate::domain::table::{Cell, Row, Table};
use std::collections::HashMap;

/// Column names of the raw MT operations table, index column first.
pub const MT_COLUMNS: [&str; 10] = [
    "#", "Time", "Type", "Order#", "Volume", "Price", "SL", "TP", "Profit", "Balance",
];

const TITLE_ROWS: usize = 1;
const ZERO: &str = "0";

/// Drop the title row and name the MT columns, with `#` as the row index.
///
/// Short rows are padded with empty cells; a row wider than the MT column
/// set is rejected.
pub fn extract_mt_operations(table: &RawTable) -> Result<Table, ReportError> {
    let width = MT_COLUMNS.len();
    let mut rows = Vec::with_capacity(table.len().saturating_sub(TITLE_ROWS));

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
        let mut cells = cells.into_iter();
        let key = cells.next().unwrap_or_default();
        rows.push(Row::new(key, cells.map(Cell::Text).collect()));
    }

    tracing::debug!(legs = rows.len(), "extracted mt legs");
    Table::new(
        MT_COLUMNS[0],
        MT_COLUMNS[1..].iter().map(|c| c.to_string()).collect(),
        rows,
    )
}

fn require_columns(table: &Table) -> Result<(), ReportError> {
    if MT_COLUMNS[1..]
        .iter()
        .all(|c| table.column_position(c).is_some())
    {
        Ok(())
    } else {
        Err(ReportError::SchemaMismatch {
            expected: MT_COLUMNS[1..].iter().map(|c| c.to_string()).collect(),
            found: table.columns().to_vec(),
        })
    }
}

/// Fold order legs into one canonical row per `Order#`, in first-seen order.
pub fn aggregate_mt_orders(legs: &Table) -> Result<Table, ReportError> {
    require_columns(legs)?;

    let mut order_ids: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for i in 0..legs.len() {
        let order = legs.text(i, "Order#");
        groups
            .entry(order)
            .or_insert_with(|| {
                order_ids.push(order);
                Vec::new()
            })
            .push(i);
    }

    let mut rows = Vec::with_capacity(order_ids.len());
    for order in order_ids {
        let group = &groups[order];
        let (first, last) = match group.as_slice() {
            [first, .., last] => (*first, *last),
            _ => {
                return Err(ReportError::MalformedOrderGroup {
                    order: order.to_string(),
                    rows: group.len(),
                });
            }
        };
        if group.len() > 2 {
            tracing::debug!(order, legs = group.len(), "intermediate legs ignored");
        }

        let open = |c: &str| Cell::text(legs.text(first, c));
        let close = |c: &str| Cell::text(legs.text(last, c));
        let cells = vec![
            open("Time"),
            open("Type"),
            open("Volume"),
            Cell::text(""),
            open("Price"),
            open("SL"),
            open("TP"),
            close("Time"),
            close("Price"),
            Cell::text(ZERO),
            Cell::text(ZERO),
            Cell::text(ZERO),
            close("Profit"),
        ];
        rows.push(Row::new(order, cells));
    }

    tracing::debug!(orders = rows.len(), "aggregated mt orders");
    Table::canonical(rows)
}
