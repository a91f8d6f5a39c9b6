//! Region resolution orchestration.
//!
//! Linear run: search → select → lookup → extract bbox → reconcile →
//! write artifact. Any step failing aborts the whole run; a half-written
//! `region.json` is worse than none, since downstream stages treat its
//! presence as a completion signal.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::geometry::{geometry_bbox, parse_provider_box, polygon_hash};
use crate::models::{
    BboxReport, BoundingBox, ChosenOsmObject, NominatimAudit, RegionArtifact, RegionMeta,
    Thresholds,
};
use crate::nominatim::NominatimClient;
use crate::output::{write_json, RunContext};
use crate::reconcile::reconcile;
use crate::select::select_candidate;

/// Candidates requested from the search endpoint per run.
const SEARCH_LIMIT: u32 = 5;

/// Inputs for one resolver run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub region_query: String,
    pub year: i32,
    pub timezone: String,
    pub thresholds: Thresholds,
}

/// What a completed run hands back to its caller.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    pub region_json: std::path::PathBuf,
    pub bbox: BoundingBox,
}

/// Resolve one region and persist `region.json`.
pub async fn resolve_region(
    client: &NominatimClient,
    ctx: &RunContext,
    opts: &ResolveOptions,
) -> Result<ResolveOutcome> {
    ctx.log_line("start resolve_region")?;

    let search = client
        .search(&opts.region_query, SEARCH_LIMIT)
        .await
        .context("Nominatim search failed")?;

    let selection = select_candidate(&search.candidates)?;
    let chosen = selection.candidate;
    let osm_ref = chosen.osm_ref();
    info!(
        "Selected {} ({}): {}",
        osm_ref.compact(),
        selection.reason,
        chosen.display_name.as_deref().unwrap_or("<unnamed>")
    );

    let lookup = client
        .lookup(osm_ref)
        .await
        .context("Nominatim lookup failed")?;

    let bbox_from_geom = geometry_bbox(&lookup.geometry)?;

    // Feature-level bbox wins over the search record's boundingbox; the
    // former is already west/south/east/north, the latter needs the
    // provider-ordering parse.
    let bbox_lookup = match (&lookup.feature_bbox, &chosen.boundingbox) {
        (Some(bbox), _) => Some(*bbox),
        (None, Some(values)) => Some(parse_provider_box(values)?),
        (None, None) => None,
    };

    let decision = reconcile(bbox_from_geom, bbox_lookup, &opts.thresholds);
    info!(
        "Reconciled bbox from {:?} (provider box {})",
        decision.source,
        if bbox_lookup.is_some() {
            "present"
        } else {
            "absent"
        }
    );

    let artifact = RegionArtifact {
        meta: RegionMeta {
            region_query: opts.region_query.clone(),
            region_slug: ctx.region_slug.clone(),
            year: opts.year,
            timezone: opts.timezone.clone(),
            boundary_source: "nominatim".to_string(),
            selection_reason: selection.reason.to_string(),
            bbox_source: decision.source,
            generated_at: Utc::now(),
        },
        nominatim: NominatimAudit {
            search_params: search.params.clone(),
            candidate_count: search.raw.len(),
            candidates_top_n: search.raw.clone(),
            chosen: search.raw[selection.index].clone(),
            lookup_params: lookup.params.clone(),
        },
        chosen_osm_object: ChosenOsmObject {
            osm_type: osm_ref.osm_type.letter().to_string(),
            osm_id: osm_ref.osm_id,
            display_name: chosen.display_name.clone(),
        },
        bbox: BboxReport {
            final_box: decision.final_box,
            lookup: bbox_lookup,
            geometry_computed: bbox_from_geom,
            diff: decision.diff,
            thresholds: opts.thresholds,
        },
        geometry: lookup.geometry.clone(),
        polygon_hash: polygon_hash(&lookup.geometry),
    };

    let region_json = ctx.region_json_path();
    write_json(&region_json, &artifact)?;
    ctx.log_line("region.json written")?;

    Ok(ResolveOutcome {
        region_json,
        bbox: decision.final_box,
    })
}
