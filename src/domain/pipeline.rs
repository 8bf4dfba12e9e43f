//! Report pipeline: HTML text in, typed canonical operations out.
//!
//! Extraction -> (header, MT only) -> format normalizer -> coercion ->
//! schema check. Each call owns everything it builds; nothing is shared
//! between reports.

use crate::domain::coerce::{coerce, CoercionOptions};
use crate::domain::error::ReportError;
use crate::domain::extract::extract_tables;
use crate::domain::format::ReportFormat;
use crate::domain::gbx::extract_gbx_operations;
use crate::domain::header::{parse_header, BacktestHeader};
use crate::domain::mt::{aggregate_mt_orders, extract_mt_operations};
use crate::domain::raw_table::RawTable;
use crate::domain::schema::ensure_valid;
use crate::domain::table::Table;

const MT_HEADER_TABLE: usize = 0;
const MT_OPERATIONS_TABLE: usize = 1;
const GBX_OPERATIONS_TABLE: usize = 0;

/// A fully processed report.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReport {
    pub format: ReportFormat,
    /// Present for MT reports only.
    pub header: Option<BacktestHeader>,
    pub operations: Table,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MtReport {
    pub header: BacktestHeader,
    pub operations: Table,
}

/// Raw tables of a report, for callers that need positional access.
pub fn tables_from_report(content: &str) -> Result<Vec<RawTable>, ReportError> {
    extract_tables(content)
}

fn finish(mut operations: Table, options: &CoercionOptions) -> Result<Table, ReportError> {
    coerce(&mut operations, options)?;
    ensure_valid(&operations)?;
    Ok(operations)
}

fn mt_from_tables(tables: &[RawTable], options: &CoercionOptions) -> Result<MtReport, ReportError> {
    ReportFormat::Mt.ensure_table_count(tables)?;
    let header = parse_header(&tables[MT_HEADER_TABLE])?;
    let legs = extract_mt_operations(&tables[MT_OPERATIONS_TABLE])?;
    let operations = finish(aggregate_mt_orders(&legs)?, options)?;
    tracing::info!(
        symbol = %header.symbol,
        timeframe = %header.timeframe,
        operations = operations.len(),
        "processed mt report"
    );
    Ok(MtReport { header, operations })
}

fn gbx_from_tables(tables: &[RawTable], options: &CoercionOptions) -> Result<Table, ReportError> {
    ReportFormat::Gbx.ensure_table_count(tables)?;
    let operations = finish(
        extract_gbx_operations(&tables[GBX_OPERATIONS_TABLE])?,
        options,
    )?;
    tracing::info!(operations = operations.len(), "processed gbx report");
    Ok(operations)
}

/// Run the pipeline for `format`, or for the detected format when `None`.
pub fn parse_report(
    content: &str,
    format: Option<ReportFormat>,
    options: &CoercionOptions,
) -> Result<ParsedReport, ReportError> {
    let tables = tables_from_report(content)?;
    let format = match format {
        Some(f) => f,
        None => {
            let detected = ReportFormat::detect(&tables)?;
            tracing::debug!(tables = tables.len(), %detected, "detected report format");
            detected
        }
    };
    match format {
        ReportFormat::Mt => {
            let MtReport { header, operations } = mt_from_tables(&tables, options)?;
            Ok(ParsedReport {
                format,
                header: Some(header),
                operations,
            })
        }
        ReportFormat::Gbx => Ok(ParsedReport {
            format,
            header: None,
            operations: gbx_from_tables(&tables, options)?,
        }),
    }
}

/// Header and typed operations of an MT report.
pub fn mt_report(content: &str) -> Result<MtReport, ReportError> {
    let tables = tables_from_report(content)?;
    mt_from_tables(&tables, &CoercionOptions::default())
}

pub fn operations_from_mt_report(content: &str) -> Result<Table, ReportError> {
    mt_report(content).map(|r| r.operations)
}

pub fn operations_from_gbx_report(content: &str) -> Result<Table, ReportError> {
    let tables = tables_from_report(content)?;
    gbx_from_tables(&tables, &CoercionOptions::default())
}
