//! Table source and sink traits.
//!
//! File formats implement [`TableSource`] and [`TableSink`]; the services only
//! see [`Table`]s.

use crate::Result;
use crate::models::Table;

/// Reads one whole table.
pub trait TableSource {
    /// Reads all remaining rows, headers first.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read or a row has
    /// the wrong number of fields.
    fn read_table(&mut self) -> Result<Table>;
}

/// Writes one whole table.
pub trait TableSink {
    /// Writes the header and every row of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table(&mut self, table: &Table) -> Result<()>;

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
