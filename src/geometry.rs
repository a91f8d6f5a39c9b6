//! Pure geometry helpers: bbox extraction, provider-box parsing, bbox
//! comparison and geometry fingerprinting.
//!
//! Geometry stays an opaque `serde_json::Value` throughout. Point,
//! LineString, Polygon and MultiPolygon all share the same nested-array
//! shape, so one depth-first walk with a single leaf predicate covers them
//! all without typed GeoJSON handling.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::GeometryError;
use crate::models::{BboxDiff, BoundingBox};

/// Compute the bounding box of a GeoJSON-shaped geometry object.
///
/// Descends `coordinates` recursively; the first array whose first two
/// elements are numbers is treated as one `[lon, lat]` pair and that branch
/// is not descended further.
pub fn geometry_bbox(geometry: &Value) -> Result<BoundingBox, GeometryError> {
    let mut coords: Vec<(f64, f64)> = Vec::new();
    if let Some(root) = geometry.get("coordinates") {
        collect_pairs(root, &mut coords);
    }
    let (first, rest) = coords.split_first().ok_or(GeometryError::EmptyGeometry)?;

    let mut bbox = BoundingBox::new(first.0, first.1, first.0, first.1);
    for (lon, lat) in rest {
        bbox.min_lon = bbox.min_lon.min(*lon);
        bbox.min_lat = bbox.min_lat.min(*lat);
        bbox.max_lon = bbox.max_lon.max(*lon);
        bbox.max_lat = bbox.max_lat.max(*lat);
    }
    Ok(bbox)
}

fn collect_pairs(value: &Value, out: &mut Vec<(f64, f64)>) {
    if let Value::Array(items) = value {
        if items.len() >= 2 {
            if let (Some(lon), Some(lat)) = (items[0].as_f64(), items[1].as_f64()) {
                out.push((lon, lat));
                return;
            }
        }
        for item in items {
            collect_pairs(item, out);
        }
    }
}

/// Parse a provider-supplied 4-value bounding box.
///
/// Nominatim's search `boundingbox` uses `[south, north, west, east]`
/// ordering (with the values encoded as strings); feature-level boxes use
/// the standard `[west, south, east, north]`. The two are told apart by the
/// `v0 <= v1 && v2 <= v3` check: a box satisfying it is reinterpreted as
/// south/north/west/east, anything else passes through in the given order.
///
/// Known gap: a box that is valid under both orderings (e.g. one straddling
/// neither the equator nor the prime meridian asymmetrically) is silently
/// read as south/north/west/east. The provider does not document a
/// guarantee either way, so the heuristic is kept rather than guessed at.
pub fn parse_provider_box(values: &[Value]) -> Result<BoundingBox, GeometryError> {
    if values.len() != 4 {
        return Err(GeometryError::MalformedBbox);
    }
    let mut nums = [0.0f64; 4];
    for (slot, value) in nums.iter_mut().zip(values) {
        *slot = coerce_f64(value).ok_or(GeometryError::MalformedBbox)?;
    }
    let [a, b, c, d] = nums;
    if a <= b && c <= d {
        Ok(BoundingBox::new(c, a, d, b))
    } else {
        Ok(BoundingBox::new(a, b, c, d))
    }
}

// Nominatim encodes bbox values as JSON strings, so numeric strings count
// as numeric here.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Absolute per-coordinate deltas plus relative area change between two
/// boxes.
///
/// The ratio is `|area(a) - area(b)| / area(a)`, defined as 0.0 when
/// `area(a)` is zero; areas are floor-clamped so degenerate boxes never
/// contribute a negative term.
pub fn bbox_diff(a: &BoundingBox, b: &BoundingBox) -> BboxDiff {
    let area_a = a.area();
    let area_b = b.area();
    let area_ratio_diff = if area_a == 0.0 {
        0.0
    } else {
        (area_a - area_b).abs() / area_a
    };
    BboxDiff {
        min_lon_diff: (a.min_lon - b.min_lon).abs(),
        min_lat_diff: (a.min_lat - b.min_lat).abs(),
        max_lon_diff: (a.max_lon - b.max_lon).abs(),
        max_lat_diff: (a.max_lat - b.max_lat).abs(),
        area_ratio_diff,
    }
}

/// Short content fingerprint of a geometry object.
///
/// Canonicalizes the JSON (sorted keys, compact separators) and takes the
/// first 16 hex characters of its SHA-256 digest. Used for change detection
/// across runs, not as a security primitive.
pub fn polygon_hash(geometry: &Value) -> String {
    let mut canonical = String::new();
    write_canonical(geometry, &mut canonical);
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)[..16].to_string()
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bbox_single_ring_polygon() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [2, 0], [2, 3], [0, 3], [0, 0]]]
        });
        let bbox = geometry_bbox(&geom).unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 2.0, 3.0));
    }

    #[test]
    fn test_bbox_multipolygon_spans_all_parts() {
        let geom = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                [[[5, -2], [6, -2], [6, 4], [5, -2]]]
            ]
        });
        let bbox = geometry_bbox(&geom).unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, -2.0, 6.0, 4.0));
    }

    #[test]
    fn test_bbox_point() {
        let geom = json!({"type": "Point", "coordinates": [13.4, 52.5]});
        let bbox = geometry_bbox(&geom).unwrap();
        assert_eq!(bbox, BoundingBox::new(13.4, 52.5, 13.4, 52.5));
    }

    #[test]
    fn test_bbox_empty_coordinates() {
        let geom = json!({"type": "Polygon", "coordinates": []});
        assert!(matches!(
            geometry_bbox(&geom),
            Err(GeometryError::EmptyGeometry)
        ));
    }

    #[test]
    fn test_bbox_missing_coordinates_key() {
        let geom = json!({"type": "Polygon"});
        assert!(matches!(
            geometry_bbox(&geom),
            Err(GeometryError::EmptyGeometry)
        ));
    }

    #[test]
    fn test_parse_provider_box_south_north_west_east() {
        let values = vec![json!(10), json!(20), json!(-5), json!(5)];
        let bbox = parse_provider_box(&values).unwrap();
        assert_eq!(bbox, BoundingBox::new(-5.0, 10.0, 5.0, 20.0));
    }

    #[test]
    fn test_parse_provider_box_string_values() {
        // Nominatim emits boundingbox values as strings
        let values = vec![json!("47.2"), json!("55.1"), json!("5.8"), json!("15.0")];
        let bbox = parse_provider_box(&values).unwrap();
        assert_eq!(bbox, BoundingBox::new(5.8, 47.2, 15.0, 55.1));
    }

    #[test]
    fn test_parse_provider_box_passthrough_order() {
        // First pair descending, so no reinterpretation happens
        let values = vec![json!(20), json!(10), json!(5), json!(-5)];
        let bbox = parse_provider_box(&values).unwrap();
        assert_eq!(bbox, BoundingBox::new(20.0, 10.0, 5.0, -5.0));
    }

    #[test]
    fn test_parse_provider_box_ambiguous_input_reinterpreted() {
        // [-5, 10, 5, 20] is a plausible west/south/east/north box but also
        // satisfies the south/north/west/east check. The heuristic always
        // reinterprets; this pins that behavior down.
        let values = vec![json!(-5), json!(10), json!(5), json!(20)];
        let bbox = parse_provider_box(&values).unwrap();
        assert_eq!(bbox, BoundingBox::new(5.0, -5.0, 20.0, 10.0));
    }

    #[test]
    fn test_parse_provider_box_wrong_arity() {
        let values = vec![json!(1), json!(2), json!(3)];
        assert!(matches!(
            parse_provider_box(&values),
            Err(GeometryError::MalformedBbox)
        ));
    }

    #[test]
    fn test_parse_provider_box_non_numeric() {
        let values = vec![json!(1), json!("x"), json!(3), json!(4)];
        assert!(matches!(
            parse_provider_box(&values),
            Err(GeometryError::MalformedBbox)
        ));
    }

    #[test]
    fn test_bbox_diff_identical_is_zero() {
        let b = BoundingBox::new(-3.1, 40.0, 2.9, 47.5);
        let diff = bbox_diff(&b, &b);
        assert_eq!(diff.min_lon_diff, 0.0);
        assert_eq!(diff.min_lat_diff, 0.0);
        assert_eq!(diff.max_lon_diff, 0.0);
        assert_eq!(diff.max_lat_diff, 0.0);
        assert_eq!(diff.area_ratio_diff, 0.0);
    }

    #[test]
    fn test_bbox_diff_double_area() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(0.0, 0.0, 20.0, 10.0);
        let diff = bbox_diff(&a, &b);
        assert_eq!(diff.max_lon_diff, 10.0);
        assert!((diff.area_ratio_diff - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bbox_diff_zero_area_reference() {
        let a = BoundingBox::new(1.0, 1.0, 1.0, 1.0);
        let b = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        let diff = bbox_diff(&a, &b);
        assert_eq!(diff.area_ratio_diff, 0.0);
    }

    #[test]
    fn test_polygon_hash_stable_under_key_reordering() {
        let a = json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]});
        let b = json!({"coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]], "type": "Polygon"});
        assert_eq!(polygon_hash(&a), polygon_hash(&b));
    }

    #[test]
    fn test_polygon_hash_changes_with_coordinates() {
        let a = json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]});
        let b = json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 2], [0, 0]]]});
        assert_ne!(polygon_hash(&a), polygon_hash(&b));
    }

    #[test]
    fn test_polygon_hash_length() {
        let geom = json!({"type": "Point", "coordinates": [1.5, 2.5]});
        assert_eq!(polygon_hash(&geom).len(), 16);
    }
}
