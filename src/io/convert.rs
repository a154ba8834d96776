//! Conversion between tables and fixed-layout record sets.
//!
//! One generic converter serves every element; the schema passed in decides
//! the layout.

use crate::models::{ColumnType, ElementKind, Field, RecordSet, Schema, Table, Value};
use crate::{Error, Result};
use tracing::{debug, warn};

/// Converts a table into the store-native record set for `element`.
///
/// The table columns must equal the schema names, in order. Each cell is
/// coerced to its column type; text wider than its column is cut at a
/// character boundary and logged.
///
/// # Errors
///
/// - [`Error::SchemaMismatch`] if the column lists differ
/// - [`Error::TypeCoercion`] for the first cell that cannot be converted
pub fn to_record_set(table: &Table, element: ElementKind, schema: &Schema) -> Result<RecordSet> {
    if !schema.matches_names(table.columns()) {
        return Err(Error::SchemaMismatch {
            element: element.to_string(),
            table_columns: table.columns().to_vec(),
            schema_columns: schema.names(),
        });
    }

    let cast = table.cast(schema)?;
    let mut set = RecordSet::empty(schema.clone());
    for (row_idx, row) in cast.rows().iter().enumerate() {
        let record = row
            .iter()
            .zip(schema)
            .map(|(value, column)| {
                if let (ColumnType::Text(width), Value::Text(text)) = (column.column_type, value)
                    && text.len() > width
                {
                    warn!(
                        element = %element,
                        column = %column.name,
                        row = row_idx,
                        width,
                        "Truncating text to fit column"
                    );
                }
                Field::from_value(column.column_type, value).ok_or_else(|| Error::TypeCoercion {
                    column: column.name.clone(),
                    row: row_idx,
                    value: value.to_cell(),
                    expected: column.column_type.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        set.push(record)?;
    }

    debug!(element = %element, rows = set.len(), "Converted table to records");
    Ok(set)
}

/// Converts a record set back into a table with the schema's column names.
///
/// Every field is cast to its declared type and byte strings are decoded, so
/// the result holds no [`Value::Bytes`].
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if a record is narrower or wider than
/// `schema`.
pub fn to_table(set: &RecordSet, schema: &Schema) -> Result<Table> {
    let rows = set
        .records()
        .iter()
        .map(|record| {
            record
                .iter()
                .zip(schema)
                .map(|(field, column)| {
                    let raw = field.to_value();
                    column.column_type.coerce(&raw).unwrap_or(raw)
                })
                .collect()
        })
        .collect();
    Table::from_rows(schema.names(), rows)
}
