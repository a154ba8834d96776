//! Project file element kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named record type stored in a project file.
///
/// Every element except [`ElementKind::Extents`] is a collection of
/// fixed-layout rows. Extents is a flat set of scalar bounds and is handled
/// separately by the store and the batch drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// Spatial, depth, and sampling bounds of the project.
    Extents,
    /// Contact observations between units.
    Contacts,
    /// Fault event log.
    FaultLog,
    /// Fault observations.
    FaultObservations,
    /// Fold event log.
    FoldLog,
    /// Fold observations.
    FoldObservations,
    /// Foliation event log.
    FoliationLog,
    /// Foliation observations.
    FoliationObservations,
    /// Discontinuity event log.
    DiscontinuityLog,
    /// Discontinuity observations.
    DiscontinuityObservations,
    /// Stratigraphic layer log.
    StratigraphicLog,
    /// Stratigraphic observations.
    StratigraphicObservations,
    /// Relationships between events.
    EventRelationships,
}

impl ElementKind {
    /// Returns every element, extents first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Extents,
            Self::Contacts,
            Self::FaultLog,
            Self::FaultObservations,
            Self::FoldLog,
            Self::FoldObservations,
            Self::FoliationLog,
            Self::FoliationObservations,
            Self::DiscontinuityLog,
            Self::DiscontinuityObservations,
            Self::StratigraphicLog,
            Self::StratigraphicObservations,
            Self::EventRelationships,
        ]
    }

    /// Returns the row-collection elements in batch processing order.
    ///
    /// Import and export both walk this list so that a round trip touches
    /// elements in the same sequence.
    #[must_use]
    pub const fn row_elements() -> &'static [Self] {
        &[
            Self::Contacts,
            Self::FaultLog,
            Self::FaultObservations,
            Self::FoldLog,
            Self::FoldObservations,
            Self::FoliationLog,
            Self::FoliationObservations,
            Self::DiscontinuityLog,
            Self::DiscontinuityObservations,
            Self::StratigraphicLog,
            Self::StratigraphicObservations,
            Self::EventRelationships,
        ]
    }

    /// Returns the element name as used inside the project file.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Extents => "extents",
            Self::Contacts => "contacts",
            Self::FaultLog => "faultLog",
            Self::FaultObservations => "faultObservations",
            Self::FoldLog => "foldLog",
            Self::FoldObservations => "foldObservations",
            Self::FoliationLog => "foliationLog",
            Self::FoliationObservations => "foliationObservations",
            Self::DiscontinuityLog => "discontinuityLog",
            Self::DiscontinuityObservations => "discontinuityObservations",
            Self::StratigraphicLog => "stratigraphicLog",
            Self::StratigraphicObservations => "stratigraphicObservations",
            Self::EventRelationships => "eventRelationships",
        }
    }

    /// Returns the CSV file stem used by batch import and export.
    #[must_use]
    pub const fn file_stem(&self) -> &'static str {
        match self {
            Self::FaultObservations => "faultObs",
            Self::FoldObservations => "foldObs",
            Self::FoliationObservations => "foliationObs",
            Self::DiscontinuityObservations => "discontinuityObs",
            Self::StratigraphicObservations => "stratigraphicObs",
            Self::EventRelationships => "eventRel",
            other => other.as_str(),
        }
    }

    /// Returns the CSV file name used by batch import and export.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.file_stem())
    }

    /// Returns the group path of the element inside the project file.
    #[must_use]
    pub const fn store_path(&self) -> &'static str {
        match self {
            Self::Extents => "extents",
            Self::Contacts => "DataCollection/Contacts",
            Self::FaultObservations => "DataCollection/Observations/FaultObservations",
            Self::FoldObservations => "DataCollection/Observations/FoldObservations",
            Self::FoliationObservations => "DataCollection/Observations/FoliationObservations",
            Self::DiscontinuityObservations => {
                "DataCollection/Observations/DiscontinuityObservations"
            },
            Self::StratigraphicObservations => {
                "DataCollection/Observations/StratigraphicObservations"
            },
            Self::FaultLog => "ExtractedInformation/EventLog/Faults",
            Self::FoldLog => "ExtractedInformation/EventLog/Folds",
            Self::FoliationLog => "ExtractedInformation/EventLog/Foliations",
            Self::DiscontinuityLog => "ExtractedInformation/EventLog/Discontinuities",
            Self::EventRelationships => "ExtractedInformation/EventLog/EventRelationships",
            Self::StratigraphicLog => "ExtractedInformation/StratigraphicInformation/Log",
        }
    }

    /// Returns true if the element is a collection of rows.
    #[must_use]
    pub const fn is_row_collection(&self) -> bool {
        !matches!(self, Self::Extents)
    }

    /// Returns a short human label for progress output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Extents => "extents",
            Self::Contacts => "contacts",
            Self::FaultLog => "fault event log",
            Self::FaultObservations => "fault observations",
            Self::FoldLog => "fold event log",
            Self::FoldObservations => "fold observations",
            Self::FoliationLog => "foliation event log",
            Self::FoliationObservations => "foliation observations",
            Self::DiscontinuityLog => "discontinuity event log",
            Self::DiscontinuityObservations => "discontinuity observations",
            Self::StratigraphicLog => "stratigraphic event log",
            Self::StratigraphicObservations => "stratigraphic observations",
            Self::EventRelationships => "event relationships",
        }
    }

    /// Parses an element from its project-file name or CSV file stem.
    ///
    /// Matching is case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let name = s.trim();
        Self::all().iter().copied().find(|kind| {
            kind.as_str().eq_ignore_ascii_case(name) || kind.file_stem().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ElementKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s).ok_or_else(|| crate::Error::InvalidInput(format!("unknown element: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_elements_order() {
        let names: Vec<_> = ElementKind::row_elements()
            .iter()
            .map(ElementKind::as_str)
            .collect();
        assert_eq!(
            names,
            vec![
                "contacts",
                "faultLog",
                "faultObservations",
                "foldLog",
                "foldObservations",
                "foliationLog",
                "foliationObservations",
                "discontinuityLog",
                "discontinuityObservations",
                "stratigraphicLog",
                "stratigraphicObservations",
                "eventRelationships",
            ]
        );
        assert!(!ElementKind::row_elements().contains(&ElementKind::Extents));
    }

    #[test]
    fn test_parse_name_and_stem() {
        assert_eq!(ElementKind::parse("faultLog"), Some(ElementKind::FaultLog));
        assert_eq!(ElementKind::parse("FAULTLOG"), Some(ElementKind::FaultLog));
        assert_eq!(
            ElementKind::parse("faultObs"),
            Some(ElementKind::FaultObservations)
        );
        assert_eq!(
            ElementKind::parse("eventRel"),
            Some(ElementKind::EventRelationships)
        );
        assert_eq!(ElementKind::parse("magnetics"), None);
        assert!("magnetics".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(ElementKind::Contacts.file_name(), "contacts.csv");
        assert_eq!(ElementKind::FoldObservations.file_name(), "foldObs.csv");
        assert_eq!(ElementKind::Extents.file_name(), "extents.csv");
    }

    #[test]
    fn test_store_paths_unique() {
        let mut paths: Vec<_> = ElementKind::all()
            .iter()
            .map(ElementKind::store_path)
            .collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), ElementKind::all().len());
    }
}
