//! Text-to-type coercion of a canonical operations table.
//!
//! Coercion is all-or-nothing: every cell is parsed, every failure is
//! collected, and the table is only rewritten when none failed. Cells that
//! already hold their target type are left untouched, so coercing twice is
//! the same as coercing once.

use crate::domain::error::{CellFailure, CoercionFailure, ReportError};
use crate::domain::order_type::OrderType;
use crate::domain::schema::ensure_valid;
use crate::domain::table::{parse_timestamp, Cell, Table};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Timestamp,
    Decimal,
    OrderType,
    Text,
}

fn target_of(column: &str) -> Target {
    match column {
        "OpenTime" | "CloseTime" => Target::Timestamp,
        "Volume" | "OpenPrice" | "ClosePrice" | "SL" | "TP" | "Commission" | "Taxes"
        | "Swap" | "Profit" => Target::Decimal,
        "Type" => Target::OrderType,
        _ => Target::Text,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionOptions {
    /// Grouping character removed from numeric cells. Whitespace is always
    /// removed as well.
    pub thousands_separator: char,
}

impl Default for CoercionOptions {
    fn default() -> Self {
        Self {
            thousands_separator: ',',
        }
    }
}

/// Parse an exact decimal.
///
/// The integer part may be grouped in thousands, by `thousands_separator` or
/// by whitespace (one kind per number): a leading group of 1-3 digits, then
/// groups of exactly 3. The fraction after `.` is plain digits. Anything else
/// is rejected rather than reinterpreted.
pub fn parse_decimal(s: &str, thousands_separator: char) -> Option<Decimal> {
    let s = s.trim();
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut digits = ungroup(integer, thousands_separator)?;
    match fraction {
        Some(f) if f.is_empty() || !f.chars().all(|c| c.is_ascii_digit()) => return None,
        Some(f) => {
            if digits.is_empty() {
                digits.push('0');
            }
            digits.push('.');
            digits.push_str(f);
        }
        None if digits.is_empty() => return None,
        None => {}
    }
    Decimal::from_str(&format!("{sign}{digits}")).ok()
}

/// Digits of a possibly grouped integer part, marks removed.
fn ungroup(integer: &str, thousands_separator: char) -> Option<String> {
    let mut marks = integer.chars().filter(|c| !c.is_ascii_digit());
    let Some(mark) = marks.next() else {
        return Some(integer.to_string());
    };
    if !(mark == thousands_separator || mark.is_whitespace()) || marks.any(|c| c != mark) {
        return None;
    }

    let mut groups = integer.split(mark);
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 {
        return None;
    }
    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

fn coerce_cell(cell: &Cell, target: Target, options: &CoercionOptions) -> Option<Cell> {
    match (target, cell) {
        (Target::Text, c) => Some(c.clone()),
        (Target::Timestamp, Cell::Timestamp(_))
        | (Target::Decimal, Cell::Decimal(_))
        | (Target::OrderType, Cell::OrderType(_)) => Some(cell.clone()),
        (Target::Timestamp, Cell::Text(s)) => parse_timestamp(s).map(Cell::Timestamp),
        (Target::Decimal, Cell::Text(s)) => {
            parse_decimal(s, options.thousands_separator).map(Cell::Decimal)
        }
        (Target::OrderType, Cell::Text(s)) => s.parse::<OrderType>().ok().map(Cell::OrderType),
        _ => None,
    }
}

/// Type every cell of a canonical table in place.
///
/// On failure the table is left exactly as it was and the error lists every
/// offending `(row, column)` pair.
pub fn coerce(table: &mut Table, options: &CoercionOptions) -> Result<(), ReportError> {
    ensure_valid(table)?;

    let targets: Vec<Target> = table.columns().iter().map(|c| target_of(c)).collect();
    let mut failures = Vec::new();
    let mut typed: Vec<Vec<Cell>> = Vec::with_capacity(table.len());

    for row in table.rows() {
        let mut cells = Vec::with_capacity(row.cells.len());
        for (col, (cell, target)) in row.cells.iter().zip(&targets).enumerate() {
            match coerce_cell(cell, *target, options) {
                Some(c) => cells.push(c),
                None => {
                    failures.push(CellFailure {
                        row: row.key.clone(),
                        column: table.columns()[col].clone(),
                        value: cell.to_string(),
                    });
                    cells.push(cell.clone());
                }
            }
        }
        typed.push(cells);
    }

    if !failures.is_empty() {
        tracing::debug!(failures = failures.len(), "coercion rejected");
        return Err(CoercionFailure { cells: failures }.into());
    }

    for (row, cells) in table.rows_mut().iter_mut().zip(typed) {
        row.cells = cells;
    }
    tracing::debug!(rows = table.len(), "coerced table");
    Ok(())
}

/// One closed trade with typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub order: String,
    pub open_time: NaiveDateTime,
    pub order_type: OrderType,
    pub volume: Decimal,
    pub symbol: String,
    pub open_price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub close_time: NaiveDateTime,
    pub close_price: Decimal,
    pub commission: Decimal,
    pub taxes: Decimal,
    pub swap: Decimal,
    pub profit: Decimal,
}

fn field<T>(
    table: &Table,
    row: usize,
    column: &str,
    project: impl Fn(&Cell) -> Option<T>,
) -> Result<T, ReportError> {
    let cell = table.get(row, column);
    cell.and_then(project).ok_or_else(|| {
        CoercionFailure {
            cells: vec![CellFailure {
                row: table.rows()[row].key.clone(),
                column: column.to_string(),
                value: cell.map(Cell::to_string).unwrap_or_default(),
            }],
        }
        .into()
    })
}

/// Project a canonical table into typed records, coercing a copy first if
/// needed.
pub fn operations(table: &Table) -> Result<Vec<Operation>, ReportError> {
    let mut typed = table.clone();
    coerce(&mut typed, &CoercionOptions::default())?;

    let mut out = Vec::with_capacity(typed.len());
    for (i, row) in typed.rows().iter().enumerate() {
        let ts = |c: &str| field(&typed, i, c, Cell::as_timestamp);
        let dec = |c: &str| field(&typed, i, c, Cell::as_decimal);
        out.push(Operation {
            order: row.key.clone(),
            open_time: ts("OpenTime")?,
            order_type: field(&typed, i, "Type", Cell::as_order_type)?,
            volume: dec("Volume")?,
            symbol: typed.text(i, "Symbol").to_string(),
            open_price: dec("OpenPrice")?,
            stop_loss: dec("SL")?,
            take_profit: dec("TP")?,
            close_time: ts("CloseTime")?,
            close_price: dec("ClosePrice")?,
            commission: dec("Commission")?,
            taxes: dec("Taxes")?,
            swap: dec("Swap")?,
            profit: dec("Profit")?,
        });
    }
    Ok(out)
}
