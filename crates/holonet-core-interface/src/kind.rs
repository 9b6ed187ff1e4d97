//! Resource kinds exposed by the catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six collections published by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Film,
    Person,
    Planet,
    Species,
    Starship,
    Vehicle,
}

impl ResourceKind {
    /// Every kind, in catalog order
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Film,
        ResourceKind::Person,
        ResourceKind::Planet,
        ResourceKind::Species,
        ResourceKind::Starship,
        ResourceKind::Vehicle,
    ];

    /// Plural path segment used by the catalog (`/api/<segment>/<id>/`)
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::Film => "films",
            ResourceKind::Person => "people",
            ResourceKind::Planet => "planets",
            ResourceKind::Species => "species",
            ResourceKind::Starship => "starships",
            ResourceKind::Vehicle => "vehicles",
        }
    }

    /// Reverse lookup from a plural path segment
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.path_segment() == segment)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Film => "film",
            ResourceKind::Person => "person",
            ResourceKind::Planet => "planet",
            ResourceKind::Species => "species",
            ResourceKind::Starship => "starship",
            ResourceKind::Vehicle => "vehicle",
        };
        f.write_str(name)
    }
}

/// Accepts both the singular name and the plural path segment,
/// e.g. `person` or `people`.
impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if let Some(kind) = Self::from_path_segment(&lowered) {
            return Ok(kind);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == lowered)
            .ok_or_else(|| format!("Unknown resource kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_path_segment(kind.path_segment()), Some(kind));
        }
        assert_eq!(ResourceKind::from_path_segment("droids"), None);
    }

    #[test]
    fn test_parse_singular_and_plural() {
        assert_eq!("people".parse::<ResourceKind>().unwrap(), ResourceKind::Person);
        assert_eq!("Person".parse::<ResourceKind>().unwrap(), ResourceKind::Person);
        assert_eq!("species".parse::<ResourceKind>().unwrap(), ResourceKind::Species);
        assert!("droid".parse::<ResourceKind>().is_err());
    }
}
