//! Domain error types for the report pipeline.

use std::fmt;

/// One cell that could not be parsed into its column's target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFailure {
    pub row: String,
    pub column: String,
    pub value: String,
}

impl fmt::Display for CellFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] = {:?}", self.row, self.column, self.value)
    }
}

/// Every cell that failed coercion in one pass over a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionFailure {
    pub cells: Vec<CellFailure>,
}

impl fmt::Display for CoercionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cell(s) could not be coerced:", self.cells.len())?;
        for cell in &self.cells {
            write!(f, " {cell}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CoercionFailure {}

/// Top-level error type for btreport.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report not found: {path}")]
    SourceNotFound { path: String },

    #[error("failed to parse html: {reason}")]
    HtmlParse { reason: String },

    #[error("{format} report needs {expected} table(s), found {found}")]
    UnexpectedTableCount {
        format: String,
        expected: usize,
        found: usize,
    },

    #[error("row {row} has {found} cells, expected at most {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },

    #[error("order {order} has {rows} row(s), need at least 2")]
    MalformedOrderGroup { order: String, rows: usize },

    #[error("report has no operations")]
    EmptyReport,

    #[error(transparent)]
    Coercion(#[from] CoercionFailure),

    #[error("schema mismatch: expected [{}], found [{}]", expected.join(", "), found.join(", "))]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("duplicate order #{order}")]
    DuplicateOrder { order: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ReportError> for std::process::ExitCode {
    fn from(err: &ReportError) -> Self {
        let code: u8 = match err {
            ReportError::Io(_) | ReportError::SourceNotFound { .. } => 1,
            ReportError::ConfigParse { .. } | ReportError::ConfigInvalid { .. } => 2,
            ReportError::HtmlParse { .. }
            | ReportError::UnexpectedTableCount { .. }
            | ReportError::RowShape { .. } => 3,
            ReportError::MalformedHeader { .. }
            | ReportError::MalformedOrderGroup { .. }
            | ReportError::EmptyReport => 4,
            ReportError::Coercion(_)
            | ReportError::SchemaMismatch { .. }
            | ReportError::DuplicateOrder { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
