//! Nominatim search result records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

impl OsmType {
    /// Single-letter tag used in Nominatim's compact `osm_ids` syntax.
    pub fn letter(&self) -> char {
        match self {
            OsmType::Node => 'N',
            OsmType::Way => 'W',
            OsmType::Relation => 'R',
        }
    }
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmType::Node => write!(f, "node"),
            OsmType::Way => write!(f, "way"),
            OsmType::Relation => write!(f, "relation"),
        }
    }
}

/// Reference to one OSM object by kind and numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsmRef {
    pub osm_type: OsmType,
    pub osm_id: i64,
}

impl OsmRef {
    /// Compact `{letter}{id}` reference, e.g. `R62422`, as accepted by the
    /// lookup endpoint's `osm_ids` parameter.
    pub fn compact(&self) -> String {
        format!("{}{}", self.osm_type.letter(), self.osm_id)
    }
}

/// One geocoder search result awaiting disambiguation.
///
/// Mirrors the fields of a Nominatim `jsonv2` record that selection and
/// the artifact care about; the raw JSON record is carried separately for
/// the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Top-level category, `boundary` for administrative polygons.
    /// `format=json` responses call this field `class`.
    #[serde(default, alias = "class")]
    pub category: Option<String>,

    /// Subtype within the category, `administrative` for governed areas.
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,

    /// Nominatim rank hint; higher is more specific.
    #[serde(default)]
    pub place_rank: Option<i64>,

    pub osm_type: OsmType,
    pub osm_id: i64,

    #[serde(default)]
    pub display_name: Option<String>,

    /// Provider bounding box in `[south, north, west, east]` order.
    /// Nominatim emits the values as strings.
    #[serde(default)]
    pub boundingbox: Option<Vec<Value>>,
}

impl Candidate {
    /// True when the record is an administrative boundary polygon.
    pub fn is_admin_boundary(&self) -> bool {
        self.category.as_deref() == Some("boundary")
            && self.place_type.as_deref() == Some("administrative")
    }

    pub fn osm_ref(&self) -> OsmRef {
        OsmRef {
            osm_type: self.osm_type,
            osm_id: self.osm_id,
        }
    }
}
