//! Schema registry.
//!
//! Holds the column layout of every project file element. The registry is
//! built once with [`SchemaRegistry::standard`] and handed to the services;
//! schemas never change at runtime.
//!
//! | Element | Columns |
//! |---------|---------|
//! | `contacts` | 5 |
//! | `faultLog` | 13 |
//! | `faultObservations` | 11 |
//! | `foldLog` | 14 |
//! | `foldObservations` | 10 |
//! | `foliationLog` | 9 |
//! | `foliationObservations` | 7 |
//! | `discontinuityLog` | 8 |
//! | `discontinuityObservations` | 6 |
//! | `stratigraphicLog` | 15 |
//! | `stratigraphicObservations` | 9 |
//! | `eventRelationships` | 3 |
//! | `extents` | 15 |

use crate::models::{ColumnType, EXTENTS_COLUMNS, ElementKind, Schema};
use crate::models::ColumnType::{Float64, Int32, Text, UInt8, UInt32};

/// Width of event and layer name fields.
const NAME_WIDTH: usize = 30;
/// Width of `#rrggbb` colour fields.
const COLOUR_WIDTH: usize = 7;

/// Immutable table of element schemas.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    /// One schema per element, indexed by [`ElementKind`] discriminant.
    schemas: Vec<Schema>,
}

impl SchemaRegistry {
    /// Builds the registry for the current project file format.
    #[must_use]
    pub fn standard() -> Self {
        let schemas = ElementKind::all()
            .iter()
            .map(|kind| standard_schema(*kind))
            .collect();
        Self { schemas }
    }

    /// Returns the schema bound to `kind`.
    #[must_use]
    pub fn schema(&self, kind: ElementKind) -> &Schema {
        &self.schemas[kind as usize]
    }

    /// Iterates over `(element, schema)` pairs, extents first.
    pub fn iter(&self) -> impl Iterator<Item = (ElementKind, &Schema)> {
        ElementKind::all().iter().copied().zip(&self.schemas)
    }

    /// Iterates over the row-collection elements in batch order.
    pub fn row_elements(&self) -> impl Iterator<Item = (ElementKind, &Schema)> {
        ElementKind::row_elements()
            .iter()
            .map(|kind| (*kind, self.schema(*kind)))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Columns shared by every event log.
const EVENT_HEADER: [(&str, ColumnType); 7] = [
    ("eventId", UInt32),
    ("minAge", Float64),
    ("maxAge", Float64),
    ("name", Text(NAME_WIDTH)),
    ("enabled", UInt8),
    ("rank", UInt32),
    ("type", UInt32),
];

/// Columns shared by every located observation.
const LOCATION: [(&str, ColumnType); 4] = [
    ("eventId", UInt32),
    ("easting", Float64),
    ("northing", Float64),
    ("altitude", Float64),
];

fn event_log(extra: &[(&'static str, ColumnType)]) -> Schema {
    Schema::from_pairs(&[EVENT_HEADER.as_slice(), extra].concat())
}

fn observation(extra: &[(&'static str, ColumnType)]) -> Schema {
    Schema::from_pairs(&[LOCATION.as_slice(), extra].concat())
}

fn standard_schema(kind: ElementKind) -> Schema {
    match kind {
        ElementKind::Extents => Schema::from_pairs(
            &EXTENTS_COLUMNS
                .iter()
                .map(|name| match *name {
                    "utmZone" | "isUtmZoneNorth" => (*name, Int32),
                    _ => (*name, Float64),
                })
                .collect::<Vec<_>>(),
        ),
        ElementKind::Contacts => Schema::from_pairs(&[
            ("eventId", UInt32),
            ("X", Float64),
            ("Y", Float64),
            ("Z", Float64),
            ("val", Float64),
        ]),
        ElementKind::FaultLog => event_log(&[
            ("avgDisplacement", Float64),
            ("avgDownthrowDir", Float64),
            ("influenceDistance", Float64),
            ("verticalRadius", Float64),
            ("horizontalRadius", Float64),
            ("colour", Text(COLOUR_WIDTH)),
        ]),
        ElementKind::FaultObservations => observation(&[
            ("type", UInt32),
            ("dipDir", Float64),
            ("dip", Float64),
            ("dipPolarity", Float64),
            ("val", Float64),
            ("displacement", Float64),
            ("posOnly", UInt8),
        ]),
        ElementKind::FoldLog => event_log(&[
            ("periodic", UInt8),
            ("wavelength", Float64),
            ("amplitude", Float64),
            ("asymmetry", UInt8),
            ("asymmetryShift", Float64),
            ("secondaryWavelength", Float64),
            ("secondaryAmplitude", Float64),
        ]),
        ElementKind::FoldObservations => observation(&[
            ("type", UInt32),
            ("axisX", Float64),
            ("axisY", Float64),
            ("axisZ", Float64),
            ("foliation", Text(NAME_WIDTH)),
            ("whatIsFolded", Text(NAME_WIDTH)),
        ]),
        ElementKind::FoliationLog => event_log(&[
            ("lowerScalarValue", Float64),
            ("upperScalarValue", Float64),
        ]),
        ElementKind::FoliationObservations => {
            observation(&[("type", UInt32), ("dipDir", Float64), ("dip", Float64)])
        },
        ElementKind::DiscontinuityLog => event_log(&[("scalarValue", Float64)]),
        ElementKind::DiscontinuityObservations => {
            observation(&[("dipDir", Float64), ("dip", Float64)])
        },
        ElementKind::StratigraphicLog => Schema::from_pairs(&[
            ("layerId", UInt32),
            ("minAge", Float64),
            ("maxAge", Float64),
            ("name", Text(NAME_WIDTH)),
            ("supergroup", Text(NAME_WIDTH)),
            ("enabled", UInt8),
            ("rank", UInt32),
            ("type", UInt32),
            ("thickness", Float64),
            ("colour1Red", UInt8),
            ("colour1Green", UInt8),
            ("colour1Blue", UInt8),
            ("colour2Red", UInt8),
            ("colour2Green", UInt8),
            ("colour2Blue", UInt8),
        ]),
        ElementKind::StratigraphicObservations => Schema::from_pairs(&[
            ("layerId", UInt32),
            ("easting", Float64),
            ("northing", Float64),
            ("altitude", Float64),
            ("type", UInt32),
            ("dipDir", Float64),
            ("dip", Float64),
            ("dipPolarity", Float64),
            ("layer", Text(NAME_WIDTH)),
        ]),
        ElementKind::EventRelationships => Schema::from_pairs(&[
            ("eventId1", UInt32),
            ("eventId2", UInt32),
            ("bidirectional", UInt8),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_one_schema_per_element() {
        let registry = SchemaRegistry::standard();
        assert_eq!(registry.iter().count(), ElementKind::all().len());
        assert_eq!(registry.row_elements().count(), 12);
        for (kind, schema) in registry.iter() {
            assert!(!schema.is_empty(), "{kind} has no columns");
        }
    }

    #[test_case(ElementKind::Contacts, 5)]
    #[test_case(ElementKind::FaultLog, 13)]
    #[test_case(ElementKind::FaultObservations, 11)]
    #[test_case(ElementKind::FoldLog, 14)]
    #[test_case(ElementKind::FoldObservations, 10)]
    #[test_case(ElementKind::FoliationLog, 9)]
    #[test_case(ElementKind::FoliationObservations, 7)]
    #[test_case(ElementKind::DiscontinuityLog, 8)]
    #[test_case(ElementKind::DiscontinuityObservations, 6)]
    #[test_case(ElementKind::StratigraphicLog, 15)]
    #[test_case(ElementKind::StratigraphicObservations, 9)]
    #[test_case(ElementKind::EventRelationships, 3)]
    #[test_case(ElementKind::Extents, 15)]
    fn test_column_counts(kind: ElementKind, expected: usize) {
        assert_eq!(SchemaRegistry::standard().schema(kind).len(), expected);
    }

    #[test]
    fn test_contacts_layout() {
        let registry = SchemaRegistry::standard();
        assert_eq!(
            registry.schema(ElementKind::Contacts).names(),
            vec!["eventId", "X", "Y", "Z", "val"]
        );
    }

    #[test]
    fn test_extents_layout() {
        let registry = SchemaRegistry::standard();
        let schema = registry.schema(ElementKind::Extents);
        assert!(schema.matches_names(&EXTENTS_COLUMNS));
        assert_eq!(schema.columns()[4].column_type, Int32);
        assert_eq!(schema.columns()[5].column_type, Int32);
        assert_eq!(schema.columns()[6].column_type, Float64);
    }

    #[test]
    fn test_column_names_unique_within_schema() {
        for (kind, schema) in SchemaRegistry::standard().iter() {
            let mut names = schema.names();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), schema.len(), "duplicate column in {kind}");
        }
    }
}
