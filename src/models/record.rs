//! Fixed-layout record sets, the store-native form of an element.

use super::schema::{ColumnType, Schema};
use super::value::Value;
use crate::{Error, Result};

/// One typed field of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// `u1` field.
    UInt8(u8),
    /// `u4` field.
    UInt32(u32),
    /// `i4` field.
    Int32(i32),
    /// `f8` field.
    Float64(f64),
    /// `S<n>` field, at most `n` bytes, without padding.
    Bytes(Vec<u8>),
}

impl Field {
    /// Builds a field from an already-coerced value.
    ///
    /// Returns `None` if the value variant does not fit the column type.
    /// Text longer than the column width is cut at the last UTF-8 character
    /// boundary that fits.
    #[must_use]
    pub fn from_value(column_type: ColumnType, value: &Value) -> Option<Self> {
        match (column_type, value) {
            (ColumnType::UInt8, Value::UInt(v)) => u8::try_from(*v).ok().map(Self::UInt8),
            (ColumnType::UInt32, Value::UInt(v)) => u32::try_from(*v).ok().map(Self::UInt32),
            (ColumnType::Int32, Value::Int(v)) => i32::try_from(*v).ok().map(Self::Int32),
            (ColumnType::Float64, Value::Float(v)) => Some(Self::Float64(*v)),
            (ColumnType::Text(width), Value::Text(s)) => {
                Some(Self::Bytes(truncate_utf8(s, width).as_bytes().to_vec()))
            },
            _ => None,
        }
    }

    /// Returns true if this field can be stored in a column of `column_type`.
    #[must_use]
    pub fn fits(&self, column_type: ColumnType) -> bool {
        match (self, column_type) {
            (Self::UInt8(_), ColumnType::UInt8)
            | (Self::UInt32(_), ColumnType::UInt32)
            | (Self::Int32(_), ColumnType::Int32)
            | (Self::Float64(_), ColumnType::Float64) => true,
            (Self::Bytes(b), ColumnType::Text(width)) => b.len() <= width,
            _ => false,
        }
    }

    /// Returns the raw value of the field; byte strings stay bytes.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::UInt8(v) => Value::UInt(u64::from(*v)),
            Self::UInt32(v) => Value::UInt(u64::from(*v)),
            Self::Int32(v) => Value::Int(i64::from(*v)),
            Self::Float64(v) => Value::Float(*v),
            Self::Bytes(b) => Value::Bytes(b.clone()),
        }
    }
}

/// Returns the longest prefix of `s` that is at most `width` bytes and ends
/// on a character boundary.
#[must_use]
pub fn truncate_utf8(s: &str, width: usize) -> &str {
    if s.len() <= width {
        return s;
    }
    let mut end = width;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// The records of one element together with their layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    schema: Schema,
    records: Vec<Vec<Field>>,
}

impl RecordSet {
    /// Creates an empty record set with the given layout.
    #[must_use]
    pub const fn empty(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Creates a record set, checking every record against the layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a record has the wrong width or a
    /// field does not fit its column.
    pub fn new(schema: Schema, records: Vec<Vec<Field>>) -> Result<Self> {
        let mut set = Self::empty(schema);
        for record in records {
            set.push(record)?;
        }
        Ok(set)
    }

    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the record does not fit the layout.
    pub fn push(&mut self, record: Vec<Field>) -> Result<()> {
        if record.len() != self.schema.len() {
            return Err(Error::InvalidInput(format!(
                "record has {} fields, layout has {}",
                record.len(),
                self.schema.len()
            )));
        }
        if let Some(column) = record
            .iter()
            .zip(&self.schema)
            .find_map(|(field, column)| (!field.fits(column.column_type)).then_some(column))
        {
            return Err(Error::InvalidInput(format!(
                "field '{}' does not fit {}",
                column.name, column.column_type
            )));
        }
        self.records.push(record);
        Ok(())
    }

    /// Returns the layout.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the records.
    #[must_use]
    pub fn records(&self) -> &[Vec<Field>] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
