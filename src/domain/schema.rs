//! Canonical schema checks and table combination.

use crate::domain::error::ReportError;
use crate::domain::table::{Table, CANONICAL_COLUMNS};

/// True iff the columns are exactly the canonical sequence, in order.
pub fn is_valid(table: &Table) -> bool {
    table.columns().len() == CANONICAL_COLUMNS.len()
        && table
            .columns()
            .iter()
            .zip(CANONICAL_COLUMNS)
            .all(|(have, want)| have == want)
}

pub fn ensure_valid(table: &Table) -> Result<(), ReportError> {
    if is_valid(table) {
        Ok(())
    } else {
        Err(ReportError::SchemaMismatch {
            expected: CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            found: table.columns().to_vec(),
        })
    }
}

/// Append canonical tables in order.
///
/// Every input must pass [`is_valid`], and `#` values must stay unique across
/// the result.
pub fn concat(tables: Vec<Table>) -> Result<Table, ReportError> {
    let mut rows = Vec::new();
    for table in &tables {
        ensure_valid(table)?;
        rows.extend_from_slice(table.rows());
    }
    Table::canonical(rows)
}
