//! Packed fixed-layout record encoding.
//!
//! Each record is the concatenation of its fields in schema order with no
//! padding between them: `u1` as one byte, `u4`/`i4`/`f8` little-endian,
//! `S<n>` as exactly `n` bytes with trailing NUL padding.

use crate::models::{ColumnType, ElementKind, Extents, Field, RecordSet, Schema, Value};
use crate::{Error, Result};

/// Verifies that a stored layout descriptor describes `schema`.
///
/// # Errors
///
/// Returns [`Error::Store`] if the descriptor is unreadable or names other
/// columns or types.
pub fn check_layout(element: ElementKind, stored: &str, schema: &Schema) -> Result<()> {
    let layout = Schema::parse_descriptor(stored)
        .map_err(|e| Error::Store(format!("{element} has an unreadable layout: {e}")))?;
    if layout == *schema {
        return Ok(());
    }
    Err(Error::Store(format!(
        "{element} is stored with layout '{stored}', expected '{}'",
        schema.descriptor()
    )))
}

/// Encodes a record set into its packed byte form.
#[must_use]
pub fn encode_records(set: &RecordSet) -> Vec<u8> {
    let schema = set.schema();
    let mut out = Vec::with_capacity(set.len() * schema.record_width());
    for record in set.records() {
        for (field, column) in record.iter().zip(schema) {
            match field {
                Field::UInt8(v) => out.push(*v),
                Field::UInt32(v) => out.extend_from_slice(&v.to_le_bytes()),
                Field::Int32(v) => out.extend_from_slice(&v.to_le_bytes()),
                Field::Float64(v) => out.extend_from_slice(&v.to_le_bytes()),
                Field::Bytes(b) => {
                    out.extend_from_slice(b);
                    let pad = column.column_type.width().saturating_sub(b.len());
                    out.resize(out.len() + pad, 0);
                },
            }
        }
    }
    out
}

/// Decodes packed records laid out by `schema`.
///
/// # Errors
///
/// Returns [`Error::Store`] if the byte length is not a whole number of
/// records.
pub fn decode_records(bytes: &[u8], schema: &Schema) -> Result<RecordSet> {
    let width = schema.record_width();
    if width == 0 || bytes.len() % width != 0 {
        return Err(Error::Store(format!(
            "record data of {} bytes does not divide into records of {width} bytes",
            bytes.len()
        )));
    }

    let mut set = RecordSet::empty(schema.clone());
    for chunk in bytes.chunks_exact(width) {
        let mut offset = 0;
        let mut record = Vec::with_capacity(schema.len());
        for column in schema {
            let size = column.column_type.width();
            let raw = &chunk[offset..offset + size];
            offset += size;
            record.push(decode_field(column.column_type, raw)?);
        }
        set.push(record)?;
    }
    Ok(set)
}

fn decode_field(column_type: ColumnType, raw: &[u8]) -> Result<Field> {
    let field = match column_type {
        ColumnType::UInt8 => Field::UInt8(raw[0]),
        ColumnType::UInt32 => Field::UInt32(u32::from_le_bytes(fixed(raw)?)),
        ColumnType::Int32 => Field::Int32(i32::from_le_bytes(fixed(raw)?)),
        ColumnType::Float64 => Field::Float64(f64::from_le_bytes(fixed(raw)?)),
        ColumnType::Text(_) => {
            let end = raw.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
            Field::Bytes(raw[..end].to_vec())
        },
    };
    Ok(field)
}

fn fixed<const N: usize>(raw: &[u8]) -> Result<[u8; N]> {
    raw.try_into()
        .map_err(|_| Error::Store(format!("expected {N} bytes, found {}", raw.len())))
}

/// Serializes one extents group for attribute storage.
///
/// Fields are stored as their cell text so NaN and infinities survive.
///
/// # Errors
///
/// Returns [`Error::Store`] if serialization fails.
pub fn encode_group(values: &[Value]) -> Result<String> {
    let cells: Vec<String> = values.iter().map(Value::to_cell).collect();
    serde_json::to_string(&cells).map_err(|e| Error::Store(e.to_string()))
}

/// Parses one extents group from attribute storage.
///
/// # Errors
///
/// Returns [`Error::Store`] if the attribute is not a JSON string array.
pub fn decode_group(raw: &str) -> Result<Vec<Value>> {
    let cells: Vec<String> = serde_json::from_str(raw).map_err(|e| Error::Store(e.to_string()))?;
    Ok(cells.into_iter().map(Value::Text).collect())
}

/// Rebuilds extents from stored groups, casting every field with `schema`.
///
/// # Errors
///
/// Returns [`Error::Store`] if a group has the wrong size or a field does
/// not fit its column.
pub fn extents_from_groups(
    geodesic: Vec<Value>,
    utm: Vec<Value>,
    depth: Vec<Value>,
    spacing: Vec<Value>,
    schema: &Schema,
) -> Result<Extents> {
    let raw = Extents::from_groups(geodesic, utm, depth, spacing)
        .map_err(|e| Error::Store(e.to_string()))?;
    let row = raw
        .to_row()
        .iter()
        .zip(schema)
        .map(|(value, column)| {
            column.column_type.coerce(value).ok_or_else(|| {
                Error::Store(format!(
                    "extents field '{}' holds {value:?}, expected {}",
                    column.name, column.column_type
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Extents::from_row(&row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::from_pairs(&[
            ("eventId", ColumnType::UInt32),
            ("name", ColumnType::Text(6)),
            ("enabled", ColumnType::UInt8),
            ("offset", ColumnType::Int32),
            ("dip", ColumnType::Float64),
        ])
    }

    #[test]
    fn test_check_layout() {
        let schema = schema();
        assert!(check_layout(ElementKind::Contacts, &schema.descriptor(), &schema).is_ok());

        let other = "eventId:u4,name:S8,enabled:u1,offset:i4,dip:f8";
        assert!(matches!(
            check_layout(ElementKind::Contacts, other, &schema),
            Err(Error::Store(_))
        ));
        assert!(matches!(
            check_layout(ElementKind::Contacts, "garbage", &schema),
            Err(Error::Store(_))
        ));
    }

    #[test]
    fn test_packed_layout() {
        let set = RecordSet::new(
            schema(),
            vec![vec![
                Field::UInt32(258),
                Field::Bytes(b"F1".to_vec()),
                Field::UInt8(1),
                Field::Int32(-1),
                Field::Float64(0.5),
            ]],
        )
        .unwrap();
        let bytes = encode_records(&set);
        assert_eq!(bytes.len(), 4 + 6 + 1 + 4 + 8);
        assert_eq!(&bytes[..4], &[2, 1, 0, 0]);
        assert_eq!(&bytes[4..10], b"F1\0\0\0\0");
        assert_eq!(bytes[10], 1);
        assert_eq!(&bytes[11..15], &[0xff; 4]);
        assert_eq!(decode_records(&bytes, &schema()).unwrap(), set);
    }

    #[test]
    fn test_empty_set() {
        let set = RecordSet::empty(schema());
        let bytes = encode_records(&set);
        assert!(bytes.is_empty());
        assert!(decode_records(&bytes, &schema()).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_data_rejected() {
        assert!(matches!(
            decode_records(&[0u8; 7], &schema()),
            Err(Error::Store(_))
        ));
    }

    #[test]
    fn test_group_json() {
        let group = vec![Value::Int(55), Value::Float(1.5), Value::Float(f64::NAN)];
        let raw = encode_group(&group).unwrap();
        assert_eq!(raw, r#"["55","1.5",""]"#);
        assert_eq!(
            decode_group(&raw).unwrap(),
            vec![Value::text("55"), Value::text("1.5"), Value::text("")]
        );
    }
}
