//! Header table of an MT-style report.
//!
//! The data sits in the second column: symbol on the first row, timeframe and
//! the history/backtest date ranges on the second, expert-advisor parameters
//! on the fourth.

use crate::domain::error::ReportError;
use crate::domain::raw_table::RawTable;
use crate::domain::table::{parse_timestamp, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Display order of header fields.
pub const HEADER_KEYS: [&str; 7] = [
    "Symbol",
    "TF",
    "HistBeginning",
    "HistEnding",
    "BTBeginning",
    "BTEnding",
    "EAParams",
];

const DATA_COLUMN: usize = 1;
const SYMBOL_ROW: usize = 0;
const PERIOD_ROW: usize = 1;
const PARAMS_ROW: usize = 3;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}\.\d{2}\.\d{2}(?: \d{2}:\d{2})?").expect("valid regex"));
static TIMEFRAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z0-9]{2})\)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestHeader {
    pub symbol: String,
    pub timeframe: String,
    pub history_begin: NaiveDateTime,
    pub history_end: NaiveDateTime,
    pub backtest_begin: NaiveDateTime,
    pub backtest_end: NaiveDateTime,
    pub ea_parameters: BTreeMap<String, String>,
}

impl BacktestHeader {
    /// Field values rendered as text, in [`HEADER_KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let params = self
            .ea_parameters
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(";");
        let values = [
            self.symbol.clone(),
            self.timeframe.clone(),
            self.history_begin.format(TIMESTAMP_FORMAT).to_string(),
            self.history_end.format(TIMESTAMP_FORMAT).to_string(),
            self.backtest_begin.format(TIMESTAMP_FORMAT).to_string(),
            self.backtest_end.format(TIMESTAMP_FORMAT).to_string(),
            params,
        ];
        HEADER_KEYS.into_iter().zip(values).collect()
    }
}

fn malformed(reason: impl Into<String>) -> ReportError {
    ReportError::MalformedHeader {
        reason: reason.into(),
    }
}

fn data_cell<'a>(table: &'a RawTable, row: usize, what: &str) -> Result<&'a str, ReportError> {
    table
        .cell(row, DATA_COLUMN)
        .ok_or_else(|| malformed(format!("no {what} cell at row {row}, column {DATA_COLUMN}")))
}

/// All `YYYY.MM.DD[ HH:MM]` substrings, in order of appearance.
pub fn parse_dates(text: &str) -> Vec<&str> {
    DATE_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// First two-character `(XX)` code, without the parentheses.
pub fn parse_timeframe(text: &str) -> Option<&str> {
    TIMEFRAME_PATTERN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `key=value;key=value;` into a map. Empty fragments are skipped; a
/// fragment without `=` is an error.
pub fn parse_ea_parameters(text: &str) -> Result<BTreeMap<String, String>, ReportError> {
    let mut params = BTreeMap::new();
    for fragment in text.split(';').filter(|f| !f.trim().is_empty()) {
        let (key, value) = fragment
            .split_once('=')
            .ok_or_else(|| malformed(format!("parameter {fragment:?} has no '='")))?;
        params.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(params)
}

pub fn parse_header(table: &RawTable) -> Result<BacktestHeader, ReportError> {
    let symbol_text = data_cell(table, SYMBOL_ROW, "symbol")?;
    let period_text = data_cell(table, PERIOD_ROW, "period")?;
    let params_text = data_cell(table, PARAMS_ROW, "parameters")?;

    let symbol = symbol_text
        .split_whitespace()
        .next()
        .ok_or_else(|| malformed("empty symbol"))?
        .to_string();

    let dates = parse_dates(period_text);
    if dates.len() != 4 {
        return Err(malformed(format!(
            "expected 4 dates, found {} in {period_text:?}",
            dates.len()
        )));
    }
    let mut stamps = Vec::with_capacity(4);
    for d in &dates {
        stamps.push(parse_timestamp(d).ok_or_else(|| malformed(format!("invalid date {d:?}")))?);
    }
    let [history_begin, history_end, backtest_begin, backtest_end] = stamps[..] else {
        return Err(malformed("expected 4 dates"));
    };
    if history_begin > history_end {
        return Err(malformed("history begins after it ends"));
    }
    if backtest_begin > backtest_end {
        return Err(malformed("backtest begins after it ends"));
    }

    let timeframe = parse_timeframe(period_text)
        .ok_or_else(|| malformed(format!("no timeframe in {period_text:?}")))?
        .to_string();

    let ea_parameters = parse_ea_parameters(params_text)?;

    tracing::debug!(%symbol, %timeframe, params = ea_parameters.len(), "parsed header");

    Ok(BacktestHeader {
        symbol,
        timeframe,
        history_begin,
        history_end,
        backtest_begin,
        backtest_end,
        ea_parameters,
    })
}
