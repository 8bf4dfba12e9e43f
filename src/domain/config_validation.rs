//! Configuration validation.
//!
//! Validates the `[convert]` and `[coerce]` sections before a report is read,
//! and resolves them into typed settings.

use crate::domain::coerce::CoercionOptions;
use crate::domain::error::ReportError;
use crate::domain::format::{parse_format_choice, ReportFormat};
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

/// Resolved `[convert]`/`[coerce]` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    /// `None` means detect from the report.
    pub format: Option<ReportFormat>,
    /// `None` means stdout.
    pub output: Option<PathBuf>,
    pub delimiter: u8,
    pub include_header: bool,
    pub coercion: CoercionOptions,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: None,
            output: None,
            delimiter: b',',
            include_header: true,
            coercion: CoercionOptions::default(),
        }
    }
}

pub fn validate_convert_config(config: &dyn ConfigPort) -> Result<(), ReportError> {
    validate_format(config)?;
    validate_delimiter(config)?;
    validate_thousands_separator(config)?;
    Ok(())
}

/// Validate, then read every setting with its default.
pub fn build_convert_config(config: &dyn ConfigPort) -> Result<ConvertConfig, ReportError> {
    validate_convert_config(config)?;
    let defaults = ConvertConfig::default();
    Ok(ConvertConfig {
        format: match config.get_string("convert", "format") {
            Some(s) => format_choice(&s)?,
            None => defaults.format,
        },
        output: config
            .get_string("convert", "output")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
        delimiter: match config.get_char("convert", "delimiter") {
            Some(c) => delimiter_byte(c)?,
            None => defaults.delimiter,
        },
        include_header: config.get_bool("convert", "include_header", defaults.include_header),
        coercion: CoercionOptions {
            thousands_separator: config
                .get_char("coerce", "thousands_separator")
                .unwrap_or(defaults.coercion.thousands_separator),
        },
    })
}

fn format_choice(value: &str) -> Result<Option<ReportFormat>, ReportError> {
    parse_format_choice(value).map_err(|e| ReportError::ConfigInvalid {
        section: "convert".to_string(),
        key: "format".to_string(),
        reason: e.to_string(),
    })
}

fn validate_format(config: &dyn ConfigPort) -> Result<(), ReportError> {
    if let Some(value) = config.get_string("convert", "format") {
        format_choice(&value)?;
    }
    Ok(())
}

fn invalid_delimiter() -> ReportError {
    ReportError::ConfigInvalid {
        section: "convert".to_string(),
        key: "delimiter".to_string(),
        reason: "delimiter must be one ASCII punctuation or whitespace character other than '\"'"
            .to_string(),
    }
}

/// CSV delimiter byte for `c`, whether it came from the file or a flag.
pub fn delimiter_byte(c: char) -> Result<u8, ReportError> {
    if c.is_ascii() && !c.is_ascii_alphanumeric() && c != '"' {
        Ok(c as u8)
    } else {
        Err(invalid_delimiter())
    }
}

fn validate_delimiter(config: &dyn ConfigPort) -> Result<(), ReportError> {
    if config.get_string("convert", "delimiter").is_none() {
        return Ok(());
    }
    let c = config
        .get_char("convert", "delimiter")
        .ok_or_else(invalid_delimiter)?;
    delimiter_byte(c).map(|_| ())
}

fn validate_thousands_separator(config: &dyn ConfigPort) -> Result<(), ReportError> {
    if config.get_string("coerce", "thousands_separator").is_none() {
        return Ok(());
    }
    match config.get_char("coerce", "thousands_separator") {
        Some(c) if c != '.' && c != '-' && !c.is_ascii_digit() => Ok(()),
        _ => Err(ReportError::ConfigInvalid {
            section: "coerce".to_string(),
            key: "thousands_separator".to_string(),
            reason: "thousands_separator must be one character other than '.', '-' or a digit"
                .to_string(),
        }),
    }
}
