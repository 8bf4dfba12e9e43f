//! Named-column operations table shared by both report formats.
//!
//! A [`Table`] is built by a format normalizer with every cell as
//! [`Cell::Text`], then typed in place by [`crate::domain::coerce`].

use crate::domain::error::ReportError;
use crate::domain::order_type::OrderType;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt;

/// Name of the row index in every table the normalizers produce.
pub const INDEX_NAME: &str = "#";

/// Column order of a closed-trade table, independent of source format.
pub const CANONICAL_COLUMNS: [&str; 13] = [
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

/// Rendering used for timestamps in reports and in CSV output.
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M";
const DATE_FORMAT: &str = "%Y.%m.%d";

/// Parse `YYYY.MM.DD` (midnight) or `YYYY.MM.DD HH:MM`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.len() > 10 {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
    } else {
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .ok()?
            .and_hms_opt(0, 0, 0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Timestamp(NaiveDateTime),
    Decimal(Decimal),
    OrderType(OrderType),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_order_type(&self) -> Option<OrderType> {
        match self {
            Cell::OrderType(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Timestamp(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
            Cell::Decimal(d) => write!(f, "{d}"),
            Cell::OrderType(t) => write!(f, "{t}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: String,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(key: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            key: key.into(),
            cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index_name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Every row must carry exactly one cell per column, and no two rows may
    /// share a key.
    pub fn new(
        index_name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Row>,
    ) -> Result<Self, ReportError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.cells.len() != columns.len())
        {
            return Err(ReportError::RowShape {
                row: i,
                expected: columns.len(),
                found: row.cells.len(),
            });
        }
        let mut seen = HashSet::with_capacity(rows.len());
        if let Some(row) = rows.iter().find(|r| !seen.insert(r.key.as_str())) {
            return Err(ReportError::DuplicateOrder {
                order: row.key.clone(),
            });
        }
        Ok(Self {
            index_name: index_name.into(),
            columns,
            rows,
        })
    }

    /// Table with the canonical columns, indexed by [`INDEX_NAME`].
    pub fn canonical(rows: Vec<Row>) -> Result<Self, ReportError> {
        Self::new(
            INDEX_NAME,
            CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        )
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.key.as_str())
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell of row `row` (by position) in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let col = self.column_position(name)?;
        self.rows.get(row)?.cells.get(col)
    }

    /// Row whose index value is `key`.
    pub fn row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// Text of `name` in row `row`, empty when the cell is absent or typed.
    pub(crate) fn text(&self, row: usize, name: &str) -> &str {
        self.get(row, name).and_then(Cell::as_text).unwrap_or("")
    }
}
