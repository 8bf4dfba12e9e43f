//! Filesystem report source.

use crate::domain::error::ReportError;
use crate::ports::report_source::ReportSource;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub struct FileReportSource;

impl FileReportSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileReportSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSource for FileReportSource {
    fn read_report(&self, path: &Path) -> Result<String, ReportError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReportError::SourceNotFound {
                path: path.display().to_string(),
            },
            _ => ReportError::Io(e),
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read report");
        // MT exports are sometimes written in a legacy single-byte codepage.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
