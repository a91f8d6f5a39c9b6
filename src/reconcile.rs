//! Bounding box reconciliation.
//!
//! The polygon-derived box is always geometrically correct but can be
//! needlessly large for geometries with long thin appendages; the provider
//! box is usually tighter but must be disqualified whenever it materially
//! disagrees with the actual polygon, otherwise a box belonging to a
//! differently-scoped administrative entity could slip through.

use crate::geometry::bbox_diff;
use crate::models::{BboxDiff, BboxSource, BoundingBox, Thresholds};

/// Outcome of one reconciliation decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    pub final_box: BoundingBox,
    pub source: BboxSource,
    /// Absent when no provider box was available to compare against.
    pub diff: Option<BboxDiff>,
}

/// Decide which box is authoritative.
///
/// No provider box means the geometry box wins by default. Otherwise the
/// provider box is adopted only when every coordinate delta stays within
/// the degree tolerance and the area ratio stays within its tolerance; a
/// single excess keeps the geometry-derived box.
pub fn reconcile(
    geometry_box: BoundingBox,
    provider_box: Option<BoundingBox>,
    thresholds: &Thresholds,
) -> Reconciliation {
    let Some(provider_box) = provider_box else {
        return Reconciliation {
            final_box: geometry_box,
            source: BboxSource::GeometryComputed,
            diff: None,
        };
    };

    let diff = bbox_diff(&geometry_box, &provider_box);
    let over_threshold = diff.min_lon_diff > thresholds.degree
        || diff.min_lat_diff > thresholds.degree
        || diff.max_lon_diff > thresholds.degree
        || diff.max_lat_diff > thresholds.degree
        || diff.area_ratio_diff > thresholds.area_ratio;

    if over_threshold {
        Reconciliation {
            final_box: geometry_box,
            source: BboxSource::GeometryComputed,
            diff: Some(diff),
        }
    } else {
        Reconciliation {
            final_box: provider_box,
            source: BboxSource::LookupBbox,
            diff: Some(diff),
        }
    }
}
