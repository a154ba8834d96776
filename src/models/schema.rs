//! Column types and element schemas.

use super::value::{Value, decode_bytes};
use crate::{Error, Result};
use std::fmt;

/// Storage type of one schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Unsigned byte, used for flags.
    UInt8,
    /// Unsigned 32-bit integer, used for ids, ranks, and type codes.
    UInt32,
    /// Signed 32-bit integer.
    Int32,
    /// 64-bit float.
    Float64,
    /// Fixed-width byte string of the given length.
    Text(usize),
}

impl ColumnType {
    /// Returns the packed width of one field in bytes.
    #[must_use]
    pub const fn width(&self) -> usize {
        match self {
            Self::UInt8 => 1,
            Self::UInt32 | Self::Int32 => 4,
            Self::Float64 => 8,
            Self::Text(len) => *len,
        }
    }

    /// Returns the compact layout code (`u1`, `u4`, `i4`, `f8`, `S<n>`).
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::UInt8 => "u1".to_string(),
            Self::UInt32 => "u4".to_string(),
            Self::Int32 => "i4".to_string(),
            Self::Float64 => "f8".to_string(),
            Self::Text(len) => format!("S{len}"),
        }
    }

    /// Parses a layout code produced by [`ColumnType::code`].
    #[must_use]
    pub fn parse_code(code: &str) -> Option<Self> {
        match code {
            "u1" => Some(Self::UInt8),
            "u4" => Some(Self::UInt32),
            "i4" => Some(Self::Int32),
            "f8" => Some(Self::Float64),
            _ => code
                .strip_prefix('S')
                .and_then(|len| len.parse::<usize>().ok())
                .filter(|len| *len > 0)
                .map(Self::Text),
        }
    }

    /// Returns true for fixed-width text columns.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Casts a value to this column type.
    ///
    /// Integer columns yield [`Value::UInt`] or [`Value::Int`], float columns
    /// [`Value::Float`], and text columns [`Value::Text`]; byte strings are
    /// decoded on the way. Returns `None` when the value cannot represent the
    /// type (non-numeric text, out of range, negative for unsigned).
    /// Text is not truncated here.
    #[must_use]
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match self {
            Self::UInt8 => coerce_flag(value)
                .or_else(|| value.as_i64())
                .and_then(|v| u8::try_from(v).ok())
                .map(|v| Value::UInt(u64::from(v))),
            Self::UInt32 => value
                .as_i64()
                .and_then(|v| u32::try_from(v).ok())
                .map(|v| Value::UInt(u64::from(v))),
            Self::Int32 => value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(|v| Value::Int(i64::from(v))),
            Self::Float64 => value.as_f64().map(Value::Float),
            Self::Text(_) => Some(Value::Text(match value {
                Value::Bytes(b) => decode_bytes(b),
                other => other.to_cell(),
            })),
        }
    }
}

fn coerce_flag(value: &Value) -> Option<i64> {
    let Value::Text(s) = value else {
        return None;
    };
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => Some(1),
        "false" => Some(0),
        _ => None,
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UInt8 => write!(f, "u8"),
            Self::UInt32 => write!(f, "u32"),
            Self::Int32 => write!(f, "i32"),
            Self::Float64 => write!(f, "f64"),
            Self::Text(len) => write!(f, "text({len})"),
        }
    }
}

/// One named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    /// Column name, as written in CSV headers.
    pub name: String,
    /// Storage type.
    pub column_type: ColumnType,
}

impl Column {
    /// Creates a column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered, typed column layout of one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Creates a schema from its columns.
    #[must_use]
    pub const fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Creates a schema from `(name, type)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, ColumnType)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(name, column_type)| Column::new(*name, *column_type))
                .collect(),
        )
    }

    /// Returns the columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the packed width of one record in bytes.
    #[must_use]
    pub fn record_width(&self) -> usize {
        self.columns.iter().map(|c| c.column_type.width()).sum()
    }

    /// Returns true if `names` equals the schema column names, in order.
    #[must_use]
    pub fn matches_names<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.len() == self.columns.len()
            && names
                .iter()
                .zip(&self.columns)
                .all(|(name, column)| name.as_ref() == column.name)
    }

    /// Returns the layout descriptor, e.g. `eventId:u4,name:S30`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{}:{}", c.name, c.column_type.code()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parses a layout descriptor produced by [`Schema::descriptor`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for malformed entries.
    pub fn parse_descriptor(descriptor: &str) -> Result<Self> {
        descriptor
            .split(',')
            .map(|entry| {
                let (name, code) = entry
                    .rsplit_once(':')
                    .ok_or_else(|| Error::InvalidInput(format!("bad layout entry: {entry}")))?;
                let column_type = ColumnType::parse_code(code)
                    .ok_or_else(|| Error::InvalidInput(format!("bad column type: {code}")))?;
                Ok(Column::new(name, column_type))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::from_pairs(&[
            ("eventId", ColumnType::UInt32),
            ("name", ColumnType::Text(30)),
            ("enabled", ColumnType::UInt8),
            ("minAge", ColumnType::Float64),
        ])
    }

    #[test]
    fn test_descriptor_roundtrip() {
        let schema = sample();
        assert_eq!(schema.descriptor(), "eventId:u4,name:S30,enabled:u1,minAge:f8");
        assert_eq!(Schema::parse_descriptor(&schema.descriptor()).unwrap(), schema);
        assert!(Schema::parse_descriptor("eventId:u9").is_err());
        assert!(Schema::parse_descriptor("eventId").is_err());
    }

    #[test]
    fn test_record_width() {
        assert_eq!(sample().record_width(), 4 + 30 + 1 + 8);
    }

    #[test]
    fn test_matches_names() {
        let schema = sample();
        assert!(schema.matches_names(&["eventId", "name", "enabled", "minAge"]));
        assert!(!schema.matches_names(&["eventId", "enabled", "name", "minAge"]));
        assert!(!schema.matches_names(&["eventId"]));
    }

    #[test]
    fn test_coerce_integers() {
        assert_eq!(
            ColumnType::UInt32.coerce(&Value::text("12")),
            Some(Value::UInt(12))
        );
        assert_eq!(
            ColumnType::UInt32.coerce(&Value::text("12.0")),
            Some(Value::UInt(12))
        );
        assert_eq!(ColumnType::UInt32.coerce(&Value::text("-1")), None);
        assert_eq!(ColumnType::UInt8.coerce(&Value::text("256")), None);
        assert_eq!(
            ColumnType::UInt8.coerce(&Value::text("True")),
            Some(Value::UInt(1))
        );
        assert_eq!(
            ColumnType::Int32.coerce(&Value::text("-33")),
            Some(Value::Int(-33))
        );
        assert_eq!(ColumnType::Int32.coerce(&Value::text("x")), None);
    }

    #[test]
    fn test_coerce_float_and_text() {
        assert_eq!(
            ColumnType::Float64.coerce(&Value::UInt(3)),
            Some(Value::Float(3.0))
        );
        assert!(matches!(
            ColumnType::Float64.coerce(&Value::text("")),
            Some(Value::Float(v)) if v.is_nan()
        ));
        assert_eq!(
            ColumnType::Text(7).coerce(&Value::Bytes(b"#00ff00".to_vec())),
            Some(Value::text("#00ff00"))
        );
        assert_eq!(
            ColumnType::Text(7).coerce(&Value::UInt(5)),
            Some(Value::text("5"))
        );
    }
}
