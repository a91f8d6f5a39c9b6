//! Placeholder statistics outputs.
//!
//! The changeset download and analysis stages fill these in later; the
//! pipeline writes zeroed skeletons so every run leaves a complete tree.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use tamarack::output::{write_json, RunContext};

pub fn write_summary_stub(
    ctx: &RunContext,
    region_query: &str,
    year: i32,
    timezone: &str,
    granularity: &str,
) -> Result<()> {
    // Echo what the resolver produced, if it ran
    let region: Value = match fs::read_to_string(ctx.region_json_path()) {
        Ok(content) => serde_json::from_str(&content).context("Failed to parse region.json")?,
        Err(_) => json!({}),
    };

    let summary = json!({
        "meta": {
            "region_query": region_query,
            "year": year,
            "timezone": timezone,
            "granularity": granularity,
            "t_start": format!("{year}-01-01T00:00:00Z"),
            "t_end": format!("{}-01-01T00:00:00Z", year + 1),
            "chosen_osm_object": region["chosen_osm_object"],
            "boundary_source": region["meta"]["boundary_source"],
            "bbox": region["bbox"]["final"],
            "polygon_hash": region["polygon_hash"],
        },
        "changesets": {"CS_total": 0, "CHG_total": 0, "monthly": []},
        "contributors": {
            "U_total": 0,
            "AU_10cs": 0,
            "AU_500chg": 0,
            "topk_users_by_chg": [],
        },
        "features": {
            "FEAT_EDIT_total": {},
            "FEAT_EDIT_BY_TAG_total": {},
            "UNIQUE_FEAT_total": null,
        },
        "roads": {
            "ERL_raw_total": 0.0,
            "ERL_unique_total": 0.0,
            "monthly": [],
            "missing_nodes_rate": null,
            "affected_ways_count": 0,
            "method_note": "TBD: geodesic length from way node coordinates",
        },
        "quality": {
            "truncation_windows": [],
            "bbox_cross_border_risk_note": "changeset bbox hit may include cross-border edits",
            "api_errors": [],
            "retries": [],
            "partial_failures": [],
        },
    });

    write_json(&ctx.stats_dir.join("summary.json"), &summary)
}

pub fn write_monthly_stub(stats_dir: &Path, year: i32) -> Result<()> {
    let path = stats_dir.join("monthly.csv");
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["month", "CS", "CHG", "U", "ERL_raw", "ERL_unique"])?;
    for month in 1..=12 {
        writer.write_record([
            format!("{year}-{month:02}"),
            "0".to_string(),
            "0".to_string(),
            "0".to_string(),
            "0".to_string(),
            "0".to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_summary_stub_without_region_json() {
        let tmp = tempdir().unwrap();
        let ctx = RunContext::create(tmp.path(), "Nowhere", 2022).unwrap();
        write_summary_stub(&ctx, "Nowhere", 2022, "UTC", "month").unwrap();

        let summary: Value = serde_json::from_str(
            &fs::read_to_string(ctx.stats_dir.join("summary.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(summary["meta"]["t_start"], "2022-01-01T00:00:00Z");
        assert_eq!(summary["meta"]["t_end"], "2023-01-01T00:00:00Z");
        assert!(summary["meta"]["bbox"].is_null());
        assert_eq!(summary["changesets"]["CS_total"], 0);
    }

    #[test]
    fn test_summary_stub_echoes_region_json() {
        let tmp = tempdir().unwrap();
        let ctx = RunContext::create(tmp.path(), "Testville", 2023).unwrap();
        write_json(
            &ctx.region_json_path(),
            &json!({
                "meta": {"boundary_source": "nominatim"},
                "bbox": {"final": [0.0, 0.0, 2.0, 3.0]},
                "chosen_osm_object": {"osm_type": "R", "osm_id": 7},
                "polygon_hash": "abcdef0123456789",
            }),
        )
        .unwrap();

        write_summary_stub(&ctx, "Testville", 2023, "UTC", "month").unwrap();
        let summary: Value = serde_json::from_str(
            &fs::read_to_string(ctx.stats_dir.join("summary.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(summary["meta"]["bbox"], json!([0.0, 0.0, 2.0, 3.0]));
        assert_eq!(summary["meta"]["polygon_hash"], "abcdef0123456789");
        assert_eq!(summary["meta"]["chosen_osm_object"]["osm_id"], 7);
    }

    #[test]
    fn test_monthly_stub_has_header_and_twelve_rows() {
        let tmp = tempdir().unwrap();
        write_monthly_stub(tmp.path(), 2023).unwrap();
        let content = fs::read_to_string(tmp.path().join("monthly.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "month,CS,CHG,U,ERL_raw,ERL_unique");
        assert!(lines[1].starts_with("2023-01,"));
        assert!(lines[12].starts_with("2023-12,"));
    }
}
