//! Operations output port trait.

use crate::domain::error::ReportError;
use crate::domain::table::Table;
use std::io::Write;

/// Port for writing a canonical operations table.
pub trait OperationsSink {
    fn write(&self, operations: &Table, out: &mut dyn Write) -> Result<(), ReportError>;
}
