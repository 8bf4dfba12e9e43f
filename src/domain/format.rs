//! Supported report layouts.

use crate::domain::error::ReportError;
use crate::domain::raw_table::RawTable;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// Header table followed by a two-legs-per-order operations table.
    Mt,
    /// Single table, one row per trade.
    Gbx,
}

impl ReportFormat {
    /// Minimum number of HTML tables a report of this format carries.
    pub fn min_tables(&self) -> usize {
        match self {
            ReportFormat::Mt => 2,
            ReportFormat::Gbx => 1,
        }
    }

    /// Guess the format from the extracted tables.
    pub fn detect(tables: &[RawTable]) -> Result<Self, ReportError> {
        match tables.len() {
            0 => Err(ReportError::EmptyReport),
            1 => Ok(ReportFormat::Gbx),
            _ => Ok(ReportFormat::Mt),
        }
    }

    pub fn ensure_table_count(&self, tables: &[RawTable]) -> Result<(), ReportError> {
        if tables.len() < self.min_tables() {
            return Err(ReportError::UnexpectedTableCount {
                format: self.to_string(),
                expected: self.min_tables(),
                found: tables.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Mt => f.write_str("METATRADER"),
            ReportFormat::Gbx => f.write_str("GENBOX"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown report format: {0:?} (expected mt or gbx)")]
pub struct UnknownFormat(pub String);

impl FromStr for ReportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mt" | "mt4" | "mt5" | "metatrader" => Ok(ReportFormat::Mt),
            "gbx" | "genbox" => Ok(ReportFormat::Gbx),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// `auto` or empty means detect; anything else must name a format.
pub fn parse_format_choice(s: &str) -> Result<Option<ReportFormat>, UnknownFormat> {
    match s.trim().to_lowercase().as_str() {
        "" | "auto" => Ok(None),
        other => other.parse().map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("MT4".parse::<ReportFormat>().unwrap(), ReportFormat::Mt);
        assert_eq!(
            "MetaTrader".parse::<ReportFormat>().unwrap(),
            ReportFormat::Mt
        );
        assert_eq!(" gbx ".parse::<ReportFormat>().unwrap(), ReportFormat::Gbx);
        assert_eq!("GENBOX".parse::<ReportFormat>().unwrap(), ReportFormat::Gbx);
        assert!("statement".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn display_names() {
        assert_eq!(ReportFormat::Mt.to_string(), "METATRADER");
        assert_eq!(ReportFormat::Gbx.to_string(), "GENBOX");
    }

    #[test]
    fn detect_by_table_count() {
        let one = vec![RawTable::default()];
        let two = vec![RawTable::default(), RawTable::default()];
        assert_eq!(ReportFormat::detect(&one).unwrap(), ReportFormat::Gbx);
        assert_eq!(ReportFormat::detect(&two).unwrap(), ReportFormat::Mt);
        assert!(matches!(
            ReportFormat::detect(&[]),
            Err(ReportError::EmptyReport)
        ));
    }

    #[test]
    fn table_count_guard() {
        let one = vec![RawTable::default()];
        assert!(ReportFormat::Gbx.ensure_table_count(&one).is_ok());
        assert!(matches!(
            ReportFormat::Mt.ensure_table_count(&one),
            Err(ReportError::UnexpectedTableCount {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn format_choice() {
        assert_eq!(parse_format_choice("auto").unwrap(), None);
        assert_eq!(parse_format_choice("").unwrap(), None);
        assert_eq!(parse_format_choice("Mt").unwrap(), Some(ReportFormat::Mt));
        assert!(parse_format_choice("xls").is_err());
    }
}
