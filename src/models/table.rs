//! In-memory tabular representation.

use super::schema::Schema;
use super::value::Value;
use crate::{Error, Result};

/// Headers that mark a leading pandas-style index column.
const INDEX_HEADERS: &[&str] = &["", "index", "Unnamed: 0"];

/// Ordered named columns with one value per row in each.
///
/// This is the exchange form between CSV files and the record converter.
/// Rows are stored row-major; every row has exactly one value per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a table from columns and rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any row has the wrong width.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Appends a row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the row width differs from the
    /// column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::InvalidInput(format!(
                "row {} has {} values, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the values of one column, or `None` if it does not exist.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Returns true if the first column looks like a written index.
    #[must_use]
    pub fn has_index_column(&self) -> bool {
        self.columns
            .first()
            .is_some_and(|first| INDEX_HEADERS.contains(&first.trim()))
    }

    /// Drops a leading index column when what remains has `expected` columns.
    ///
    /// Returns true if a column was dropped.
    pub fn strip_index_column(&mut self, expected: usize) -> bool {
        if !self.has_index_column() || self.columns.len() != expected + 1 {
            return false;
        }
        self.columns.remove(0);
        for row in &mut self.rows {
            row.remove(0);
        }
        true
    }

    /// Casts every cell to the type of the schema column at the same position.
    ///
    /// Column names are taken from the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMismatch`] if the column counts differ, and
    /// [`Error::TypeCoercion`] for the first cell that cannot be cast.
    pub fn cast(&self, schema: &Schema) -> Result<Self> {
        if self.columns.len() != schema.len() {
            return Err(Error::SchemaMismatch {
                element: String::new(),
                table_columns: self.columns.clone(),
                schema_columns: schema.names(),
            });
        }
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                row.iter()
                    .zip(schema)
                    .map(|(value, column)| {
                        column
                            .column_type
                            .coerce(value)
                            .ok_or_else(|| Error::TypeCoercion {
                                column: column.name.clone(),
                                row: row_idx,
                                value: value.to_cell(),
                                expected: column.column_type.to_string(),
                            })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            columns: schema.names(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;

    #[test]
    fn test_push_row_checks_width() {
        let mut table = Table::new(["a", "b"]);
        assert!(table.push_row(vec![Value::UInt(1), Value::UInt(2)]).is_ok());
        assert!(table.push_row(vec![Value::UInt(1)]).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_column_lookup() {
        let table = Table::from_rows(
            ["a", "b"],
            vec![
                vec![Value::UInt(1), Value::text("x")],
                vec![Value::UInt(2), Value::text("y")],
            ],
        )
        .unwrap();
        assert_eq!(
            table.column("b").unwrap(),
            vec![&Value::text("x"), &Value::text("y")]
        );
        assert!(table.column("c").is_none());
    }

    #[test]
    fn test_strip_index_column() {
        let mut table = Table::from_rows(
            ["", "eventId", "X"],
            vec![vec![Value::text("0"), Value::text("1"), Value::text("2.5")]],
        )
        .unwrap();
        assert!(!table.clone().strip_index_column(3));
        assert!(table.strip_index_column(2));
        assert_eq!(table.columns(), &["eventId".to_string(), "X".to_string()]);
        assert_eq!(table.rows()[0], vec![Value::text("1"), Value::text("2.5")]);
    }

    #[test]
    fn test_strip_index_column_requires_index_header() {
        let mut table = Table::new(["eventId", "X", "Y"]);
        assert!(!table.strip_index_column(2));
        assert_eq!(table.columns().len(), 3);
    }

    #[test]
    fn test_cast() {
        let schema = Schema::from_pairs(&[("id", ColumnType::UInt32), ("v", ColumnType::Float64)]);
        let table = Table::from_rows(["id", "v"], vec![vec![Value::text("4"), Value::text("1.5")]])
            .unwrap();
        let cast = table.cast(&schema).unwrap();
        assert_eq!(cast.rows()[0], vec![Value::UInt(4), Value::Float(1.5)]);

        let bad = Table::from_rows(["id", "v"], vec![vec![Value::text("x"), Value::text("1")]])
            .unwrap();
        assert!(matches!(
            bad.cast(&schema),
            Err(Error::TypeCoercion { row: 0, .. })
        ));
    }
}
