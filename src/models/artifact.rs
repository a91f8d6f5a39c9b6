//! The persisted `region.json` artifact.
//!
//! Written once per resolver run and never mutated afterwards; downstream
//! map-rendering and statistics stages read only `bbox.final` and `meta.*`
//! but the full audit trail is kept alongside.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BboxDiff, BboxSource, BoundingBox, Thresholds};

/// Provenance block for one resolver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionMeta {
    pub region_query: String,
    pub region_slug: String,
    pub year: i32,
    pub timezone: String,
    /// Fixed to `"nominatim"`; recorded so the artifact stays
    /// self-describing if another boundary source is ever added.
    pub boundary_source: String,
    pub selection_reason: String,
    pub bbox_source: BboxSource,
    pub generated_at: DateTime<Utc>,
}

/// Raw request/response audit trail from the two geocoder calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimAudit {
    pub search_params: Value,
    pub candidate_count: usize,
    #[serde(rename = "candidates_topN")]
    pub candidates_top_n: Vec<Value>,
    /// The selected candidate's raw record.
    pub chosen: Value,
    pub lookup_params: Value,
}

/// Identity of the resolved OSM object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChosenOsmObject {
    /// Single uppercase letter (`N`/`W`/`R`).
    pub osm_type: String,
    pub osm_id: i64,
    pub display_name: Option<String>,
}

/// The three candidate boxes plus the decision record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BboxReport {
    #[serde(rename = "final")]
    pub final_box: BoundingBox,
    pub lookup: Option<BoundingBox>,
    pub geometry_computed: BoundingBox,
    pub diff: Option<BboxDiff>,
    pub thresholds: Thresholds,
}

/// Top-level `region.json` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionArtifact {
    pub meta: RegionMeta,
    pub nominatim: NominatimAudit,
    pub chosen_osm_object: ChosenOsmObject,
    pub bbox: BboxReport,
    /// Full polygon geometry as returned by the lookup call.
    pub geometry: Value,
    /// 16-hex-char fingerprint of the canonicalized geometry.
    pub polygon_hash: String,
}
