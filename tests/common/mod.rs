#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

/// One MT order leg: `(#, time, type, order, size, price, sl, tp, profit, balance)`.
pub type Leg<'a> = [&'a str; 10];

pub const GBX_TITLE: [&str; 14] = [
    "Order#",
    "Open Time",
    "Type",
    "Volume",
    "Symbol",
    "Open Price",
    "S/L",
    "T/P",
    "Close Time",
    "Close Price",
    "Commission",
    "Taxes",
    "Swap",
    "Profit",
];

fn row(cells: &[&str]) -> String {
    let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
    format!("<tr>{tds}</tr>\n")
}

fn table(rows: &[Vec<&str>]) -> String {
    let body: String = rows.iter().map(|r| row(r)).collect();
    format!("<table>\n{body}</table>\n")
}

pub fn mt_header_table(symbol: &str, period: &str, params: &str) -> String {
    table(&[
        vec!["Symbol", symbol],
        vec!["Period", period],
        vec!["Model", "Every tick (the most precise method)"],
        vec!["Parameters", params],
    ])
}

pub fn mt_operations_table(legs: &[Leg]) -> String {
    let mut rows = vec![vec![
        "#", "Time", "Type", "Order", "Size", "Price", "S / L", "T / P", "Profit", "Balance",
    ]];
    rows.extend(legs.iter().map(|l| l.to_vec()));
    table(&rows)
}

pub fn mt_report(symbol: &str, period: &str, params: &str, legs: &[Leg]) -> String {
    format!(
        "<html><body>\n{}<p>Summary</p>\n{}</body></html>",
        mt_header_table(symbol, period, params),
        mt_operations_table(legs)
    )
}

pub const AUDJPY_PERIOD: &str =
    "4 Hours (H4) 2019.01.02 00:00 - 2019.12.31 20:00 (2019.01.01 - 2020.01.01)";
pub const AUDJPY_PARAMS: &str = "Lots=0.1; StopLoss=200; TakeProfit=400; ";

/// Two orders: 7 opens and closes at t/p, 8 opens, is modified, then closes at s/l.
pub fn sample_mt_legs() -> Vec<Leg<'static>> {
    vec![
        ["1", "2019.03.04 08:00", "buy", "7", "0.10", "76.120", "75.120", "78.120", "", ""],
        ["2", "2019.03.05 12:00", "sell", "8", "0.10", "76.900", "77.900", "74.900", "", ""],
        ["3", "2019.03.06 16:00", "t/p", "7", "0.10", "78.120", "75.120", "78.120", "142.30", "10 142.30"],
        ["4", "2019.03.07 04:00", "modify", "8", "0.10", "76.900", "77.400", "74.900", "", ""],
        ["5", "2019.03.08 20:00", "s/l", "8", "0.10", "77.400", "77.400", "74.900", "-35.60", "10 106.70"],
    ]
}

pub fn sample_mt_report() -> String {
    mt_report(
        "AUDJPY (Australian Dollar vs Japanese Yen)",
        AUDJPY_PERIOD,
        AUDJPY_PARAMS,
        &sample_mt_legs(),
    )
}

pub fn gbx_trade<'a>(order: &'a str, ty: &'a str, open: &'a str, profit: &'a str) -> Vec<&'a str> {
    vec![
        order,
        open,
        ty,
        "1.00",
        "EURUSD",
        "1.12000",
        "1.11500",
        "1.13000",
        "2020.02.03 17:00",
        "1.12600",
        "-7.00",
        "0",
        "-1.20",
        profit,
    ]
}

/// A GBX report table: four title rows, then `body` as given.
pub fn gbx_report(body: &[Vec<&str>]) -> String {
    let mut rows = vec![
        vec!["Genbox Backtest Report"],
        vec!["Strategy", "Breakout"],
        vec!["Initial deposit", "10 000.00"],
        GBX_TITLE.to_vec(),
    ];
    rows.extend(body.iter().cloned());
    format!("<html><body>\n{}</body></html>", table(&rows))
}

/// Three buys separated by sentinel rows, followed by a summary row.
pub fn sample_gbx_report() -> String {
    gbx_report(&[
        gbx_trade("101", "Buy", "2020.02.03 09:00", "600.00"),
        vec![""],
        gbx_trade("102", "Buy", "2020.02.04 09:00", "1 250.50"),
        vec!["", "", "", ""],
        gbx_trade("103", "Buy", "2020.02.05 09:00", "-80.00"),
        vec!["Total", "", "Net profit", "", "", "", "", "", "", "", "", "", "", "1770.50"],
    ])
}

pub fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
