//! Project extents: the flat spatial and sampling bounds record.

use super::value::Value;
use crate::{Error, Result};
use std::fmt;

/// Column names of the extents row, in storage order.
pub const EXTENTS_COLUMNS: [&str; 15] = [
    "minLong",
    "maxLong",
    "minLat",
    "maxLat",
    "utmZone",
    "isUtmZoneNorth",
    "minEasting",
    "maxEasting",
    "minNorthing",
    "maxNorthing",
    "lowerBound",
    "upperBound",
    "spacingEastWest",
    "spacingNorthSouth",
    "spacingDepth",
];

const GEODESIC: std::ops::Range<usize> = 0..4;
const UTM: std::ops::Range<usize> = 4..10;
const DEPTH: std::ops::Range<usize> = 10..12;
const SPACING: std::ops::Range<usize> = 12..15;

/// Spatial extents of a project, split into the four stored groups.
///
/// | Group | Fields |
/// |-------|--------|
/// | `geodesic` | minLong, maxLong, minLat, maxLat |
/// | `utm` | utmZone, isUtmZoneNorth, minEasting, maxEasting, minNorthing, maxNorthing |
/// | `depth` | lowerBound, upperBound |
/// | `spacing` | spacingEastWest, spacingNorthSouth, spacingDepth |
#[derive(Debug, Clone, PartialEq)]
pub struct Extents {
    geodesic: Vec<Value>,
    utm: Vec<Value>,
    depth: Vec<Value>,
    spacing: Vec<Value>,
}

impl Extents {
    /// Partitions a 15-value row into the four groups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless the row has exactly 15 values.
    pub fn from_row(row: &[Value]) -> Result<Self> {
        if row.len() != EXTENTS_COLUMNS.len() {
            return Err(Error::InvalidInput(format!(
                "extents row has {} values, expected {}",
                row.len(),
                EXTENTS_COLUMNS.len()
            )));
        }
        Ok(Self {
            geodesic: row[GEODESIC].to_vec(),
            utm: row[UTM].to_vec(),
            depth: row[DEPTH].to_vec(),
            spacing: row[SPACING].to_vec(),
        })
    }

    /// Builds extents from the four groups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a group has the wrong length.
    pub fn from_groups(
        geodesic: Vec<Value>,
        utm: Vec<Value>,
        depth: Vec<Value>,
        spacing: Vec<Value>,
    ) -> Result<Self> {
        for (name, group, expected) in [
            ("geodesic", &geodesic, GEODESIC.len()),
            ("utm", &utm, UTM.len()),
            ("depth", &depth, DEPTH.len()),
            ("spacing", &spacing, SPACING.len()),
        ] {
            if group.len() != expected {
                return Err(Error::InvalidInput(format!(
                    "extents group '{name}' has {} values, expected {expected}",
                    group.len()
                )));
            }
        }
        Ok(Self {
            geodesic,
            utm,
            depth,
            spacing,
        })
    }

    /// Reassembles the 15-value row, groups in storage order.
    #[must_use]
    pub fn to_row(&self) -> Vec<Value> {
        self.geodesic
            .iter()
            .chain(&self.utm)
            .chain(&self.depth)
            .chain(&self.spacing)
            .cloned()
            .collect()
    }

    /// Returns the geodesic group.
    #[must_use]
    pub fn geodesic(&self) -> &[Value] {
        &self.geodesic
    }

    /// Returns the utm group.
    #[must_use]
    pub fn utm(&self) -> &[Value] {
        &self.utm
    }

    /// Returns the depth group.
    #[must_use]
    pub fn depth(&self) -> &[Value] {
        &self.depth
    }

    /// Returns the spacing group.
    #[must_use]
    pub fn spacing(&self) -> &[Value] {
        &self.spacing
    }

    /// Returns the UTM zone number.
    #[must_use]
    pub fn utm_zone(&self) -> Option<i64> {
        self.utm[0].as_i64()
    }

    /// Returns true if the UTM zone is in the northern hemisphere.
    #[must_use]
    pub fn is_north(&self) -> bool {
        self.utm[1].as_i64().is_some_and(|flag| flag != 0)
    }

    /// Returns a printable summary of the projected bounds.
    #[must_use]
    pub const fn summary(&self) -> ExtentsSummary<'_> {
        ExtentsSummary(self)
    }
}

/// Human-readable summary of [`Extents`].
pub struct ExtentsSummary<'a>(&'a Extents);

impl fmt::Display for ExtentsSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.0;
        let hemisphere = if e.is_north() { 'N' } else { 'S' };
        writeln!(f, "utm zone: {}{hemisphere}", e.utm[0])?;
        writeln!(f, "easting:  {} - {}", e.utm[2], e.utm[3])?;
        writeln!(f, "northing: {} - {}", e.utm[4], e.utm[5])?;
        write!(f, "altitude: {} - {}", e.depth[0], e.depth[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn row() -> Vec<Value> {
        (0..15u64)
            .map(|i| match i {
                4 => Value::Int(55),
                5 => Value::Int(0),
                _ => Value::Float(i as f64 * 10.0),
            })
            .collect()
    }

    #[test]
    fn test_partition() {
        let extents = Extents::from_row(&row()).unwrap();
        assert_eq!(extents.geodesic().len(), 4);
        assert_eq!(extents.utm().len(), 6);
        assert_eq!(extents.depth().len(), 2);
        assert_eq!(extents.spacing().len(), 3);
        assert_eq!(extents.utm()[0], Value::Int(55));
        assert_eq!(extents.depth()[0], Value::Float(100.0));
        assert_eq!(extents.spacing()[2], Value::Float(140.0));
        assert_eq!(extents.to_row(), row());
    }

    #[test]
    fn test_wrong_width() {
        assert!(Extents::from_row(&row()[..14]).is_err());
        assert!(Extents::from_groups(vec![], vec![], vec![], vec![]).is_err());
    }

    #[test]
    fn test_summary() {
        let extents = Extents::from_row(&row()).unwrap();
        assert_eq!(extents.utm_zone(), Some(55));
        assert!(!extents.is_north());
        let text = extents.summary().to_string();
        assert!(text.contains("utm zone: 55S"));
        assert!(text.contains("easting:  60.0 - 70.0"));
        assert!(text.contains("altitude: 100.0 - 110.0"));
    }
}
