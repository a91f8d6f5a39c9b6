//! Mapbox Static Images requests for bbox overlay maps.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::models::BoundingBox;
use crate::output::append_log;

pub const DEFAULT_STYLE: &str = "mapbox/streets-v12";
pub const DEFAULT_IMAGE_SIZE: &str = "1000x700";

// Image retrieval gets a longer timeout than the geocoder calls.
const IMAGE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// GeoJSON feature drawing the bbox outline: red stroke, transparent fill.
pub fn bbox_overlay_feature(bbox: &BoundingBox) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [bbox.min_lon, bbox.min_lat],
                [bbox.max_lon, bbox.min_lat],
                [bbox.max_lon, bbox.max_lat],
                [bbox.min_lon, bbox.max_lat],
                [bbox.min_lon, bbox.min_lat],
            ]],
        },
        "properties": {
            "stroke": "#ff2d55",
            "stroke-width": 3,
            "fill": "#000000",
            "fill-opacity": 0,
        },
    })
}

/// Build the Static Images URL for a bbox overlay.
pub fn static_map_url(
    style: &str,
    bbox: &BoundingBox,
    image_size: &str,
    token: &str,
) -> Result<Url> {
    let feature = bbox_overlay_feature(bbox);
    let encoded: String =
        url::form_urlencoded::byte_serialize(feature.to_string().as_bytes()).collect();
    let overlay = format!("geojson({})", encoded);

    let raw = format!(
        "https://api.mapbox.com/styles/v1/{style}/static/{overlay}/[{},{},{},{}]/{image_size}?access_token={token}",
        bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat,
    );
    Url::parse(&raw).context("Failed to build static map URL")
}

/// Fetch the rendered map image bytes.
pub async fn fetch_static_map(url: Url) -> Result<Vec<u8>> {
    let client = Client::builder()
        .timeout(IMAGE_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;
    let response = client
        .get(url)
        .send()
        .await
        .context("Static map request failed")?
        .error_for_status()
        .context("Static map request returned an error status")?;
    let bytes = response.bytes().await.context("Failed to read map image")?;
    Ok(bytes.to_vec())
}

/// Inputs for one render step.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub region_json: PathBuf,
    pub out_png: PathBuf,
    /// Name of the environment variable holding the access token.
    pub token_env: String,
    pub style: String,
    pub image_size: String,
}

/// Final status line shape, printed to stdout by the binaries.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RenderStatus {
    Ok { out_png: PathBuf },
    Skipped { reason: String },
}

/// Render the bbox overlay map for an existing `region.json`.
///
/// A missing access token is a graceful skip, not an error: the map is a
/// convenience figure and its absence must not fail the pipeline.
pub async fn render_bbox_map(req: &RenderRequest) -> Result<RenderStatus> {
    let log_path = req
        .out_png
        .parent()
        .and_then(Path::parent)
        .map(|base| base.join("logs").join("run.log"));

    let region: Value = serde_json::from_str(
        &fs::read_to_string(&req.region_json)
            .with_context(|| format!("Failed to read {}", req.region_json.display()))?,
    )
    .context("Failed to parse region.json")?;
    let bbox: BoundingBox = serde_json::from_value(region["bbox"]["final"].clone())
        .context("region.json missing bbox.final")?;

    let token = match std::env::var(&req.token_env) {
        Ok(token) if !token.is_empty() => token,
        _ => {
            if let Some(log_path) = &log_path {
                append_log(log_path, &format!("Mapbox token env missing: {}", req.token_env))?;
            }
            return Ok(RenderStatus::Skipped {
                reason: "missing token env".to_string(),
            });
        }
    };

    let url = static_map_url(&req.style, &bbox, &req.image_size, &token)?;
    let image = fetch_static_map(url).await?;

    if let Some(parent) = req.out_png.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&req.out_png, image)
        .with_context(|| format!("Failed to write {}", req.out_png.display()))?;

    if let Some(log_path) = &log_path {
        append_log(
            log_path,
            &format!("bbox map saved: {}", req.out_png.display()),
        )?;
    }
    Ok(RenderStatus::Ok {
        out_png: req.out_png.clone(),
    })
}
