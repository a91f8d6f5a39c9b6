//! Bounding box types shared across resolution, reconciliation and output.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in longitude/latitude degrees.
///
/// Serializes as the 4-element `[min_lon, min_lat, max_lon, max_lat]` array
/// the downstream map-rendering and statistics stages expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Box area in square degrees, clamped at zero.
    ///
    /// Degenerate boxes (inverted or zero-extent) report 0.0 rather than a
    /// negative area.
    pub fn area(&self) -> f64 {
        ((self.max_lon - self.min_lon) * (self.max_lat - self.min_lat)).max(0.0)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.min_lon, b.min_lat, b.max_lon, b.max_lat]
    }
}

/// Per-coordinate and area deltas between two bounding boxes.
///
/// Field names match the keys persisted into `region.json` under
/// `bbox.diff`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BboxDiff {
    pub min_lon_diff: f64,
    pub min_lat_diff: f64,
    pub max_lon_diff: f64,
    pub max_lat_diff: f64,
    pub area_ratio_diff: f64,
}

/// Which box won reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BboxSource {
    /// Box computed from the polygon geometry itself.
    GeometryComputed,
    /// Provider-supplied box adopted because it agreed within tolerance.
    LookupBbox,
}

/// Tolerances driving the reconciliation decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Maximum per-coordinate disagreement, in degrees.
    pub degree: f64,
    /// Maximum relative area disagreement.
    pub area_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            degree: 0.01,
            area_ratio: 0.05,
        }
    }
}
