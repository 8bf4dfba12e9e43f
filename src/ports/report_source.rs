//! Report input port trait.

use crate::domain::error::ReportError;
use std::path::Path;

pub trait ReportSource {
    /// Whole report text. A missing report is `SourceNotFound`.
    fn read_report(&self, path: &Path) -> Result<String, ReportError>;
}
