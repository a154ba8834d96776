//! Property-based tests for conversion invariants.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Extents partition and reassembly reproduce the flat row
//! - Integer coercion accepts exactly the in-range values
//! - Float cells survive formatting and parsing
//! - Text truncation stays on character boundaries
//! - Record sets survive the packed codec

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use loopcsv::models::{ColumnType, Field, format_float, parse_float, truncate_utf8};
use loopcsv::storage::codec::{decode_records, encode_records};
use loopcsv::{ElementKind, Extents, RecordSet, SchemaRegistry, Value};
use proptest::prelude::*;

proptest! {
    /// Property: partitioning a 15-value row and flattening it is lossless.
    #[test]
    fn prop_extents_partition_roundtrip(values in prop::collection::vec(-1.0e7f64..1.0e7, 15)) {
        let row: Vec<Value> = values.into_iter().map(Value::Float).collect();
        let extents = Extents::from_row(&row).unwrap();
        prop_assert_eq!(extents.geodesic().len(), 4);
        prop_assert_eq!(extents.utm().len(), 6);
        prop_assert_eq!(extents.depth().len(), 2);
        prop_assert_eq!(extents.spacing().len(), 3);
        prop_assert_eq!(extents.to_row(), row);
    }

    /// Property: rows of any other width are rejected.
    #[test]
    fn prop_extents_wrong_width_rejected(len in 0usize..40) {
        prop_assume!(len != 15);
        let row = vec![Value::Float(0.0); len];
        prop_assert!(Extents::from_row(&row).is_err());
    }

    /// Property: u32 columns accept every u32, written plainly or as an integral float.
    #[test]
    fn prop_u32_coercion(n in any::<u32>()) {
        let expected = Some(Value::UInt(u64::from(n)));
        prop_assert_eq!(ColumnType::UInt32.coerce(&Value::text(n.to_string())), expected.clone());
        prop_assert_eq!(ColumnType::UInt32.coerce(&Value::text(format!("{n}.0"))), expected);
    }

    /// Property: unsigned columns reject negative values.
    #[test]
    fn prop_unsigned_rejects_negative(n in i64::MIN..0) {
        prop_assert!(ColumnType::UInt32.coerce(&Value::text(n.to_string())).is_none());
        prop_assert!(ColumnType::UInt8.coerce(&Value::Int(n)).is_none());
    }

    /// Property: u8 columns reject values above 255.
    #[test]
    fn prop_u8_range(n in 256u64..100_000) {
        prop_assert!(ColumnType::UInt8.coerce(&Value::UInt(n)).is_none());
    }

    /// Property: finite floats survive the CSV cell format.
    #[test]
    fn prop_float_cell_roundtrip(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let cell = format_float(v);
        prop_assert_eq!(parse_float(&cell), Some(v));
    }

    /// Property: truncation yields a valid prefix no wider than the column.
    #[test]
    fn prop_truncate_utf8(s in "\\PC{0,40}", width in 0usize..40) {
        let cut = truncate_utf8(&s, width);
        prop_assert!(cut.len() <= width);
        prop_assert!(s.starts_with(cut));
        if s.len() <= width {
            prop_assert_eq!(cut, s.as_str());
        }
    }

    /// Property: contacts records survive the packed codec.
    #[test]
    fn prop_contacts_codec_roundtrip(
        rows in prop::collection::vec((any::<u32>(), -1.0e6f64..1.0e6, -1.0e6f64..1.0e6), 0..20)
    ) {
        let registry = SchemaRegistry::standard();
        let schema = registry.schema(ElementKind::Contacts).clone();
        let records = rows
            .into_iter()
            .map(|(id, x, y)| vec![
                Field::UInt32(id),
                Field::Float64(x),
                Field::Float64(y),
                Field::Float64(0.0),
                Field::Float64(1.0),
            ])
            .collect();
        let set = RecordSet::new(schema.clone(), records).unwrap();
        let bytes = encode_records(&set);
        prop_assert_eq!(bytes.len(), set.len() * schema.record_width());
        prop_assert_eq!(decode_records(&bytes, &schema).unwrap(), set);
    }
}
