//! CSV output adapter for canonical operations tables.

use crate::domain::error::ReportError;
use crate::domain::schema::ensure_valid;
use crate::domain::table::Table;
use crate::ports::operations_sink::OperationsSink;
use std::io::Write;

pub struct CsvOperationsWriter {
    delimiter: u8,
}

impl CsvOperationsWriter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvOperationsWriter {
    fn default() -> Self {
        Self::new(b',')
    }
}

fn csv_error(e: csv::Error) -> ReportError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => ReportError::Io(io),
        other => ReportError::Io(std::io::Error::other(format!("CSV write error: {other:?}"))),
    }
}

impl OperationsSink for CsvOperationsWriter {
    fn write(&self, operations: &Table, out: &mut dyn Write) -> Result<(), ReportError> {
        ensure_valid(operations)?;

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(out);

        let mut header = vec![operations.index_name().to_string()];
        header.extend(operations.columns().iter().cloned());
        wtr.write_record(&header).map_err(csv_error)?;

        for row in operations.rows() {
            let mut record = Vec::with_capacity(row.cells.len() + 1);
            record.push(row.key.clone());
            record.extend(row.cells.iter().map(|c| c.to_string()));
            wtr.write_record(&record).map_err(csv_error)?;
        }

        wtr.flush()?;
        tracing::debug!(rows = operations.len(), "wrote operations csv");
        Ok(())
    }
}
