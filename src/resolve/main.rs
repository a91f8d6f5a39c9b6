//! Region resolution CLI.
//!
//! Resolves a free-text place name to one administrative boundary and a
//! reconciled bounding box, then persists `region.json` for the downstream
//! map-rendering and statistics stages.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tamarack::models::Thresholds;
use tamarack::nominatim::{NominatimClient, DEFAULT_BASE_URL};
use tamarack::output::{slugify_region, RunContext};
use tamarack::resolver::{resolve_region, ResolveOptions};

#[derive(Parser, Debug)]
#[command(name = "resolve")]
#[command(about = "Resolve an OSM administrative region and its bounding box")]
struct Args {
    /// Free-text region query, e.g. "Berlin, Germany"
    #[arg(long)]
    region_query: String,

    /// Year the output tree is scoped to
    #[arg(long)]
    year: i32,

    /// Root of the output tree
    #[arg(long, default_value = "outputs")]
    out_dir: PathBuf,

    /// Timezone recorded in the artifact metadata
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Nominatim base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    nominatim_base: String,

    /// Per-coordinate bbox disagreement tolerance, in degrees
    #[arg(long, default_value = "0.01")]
    bbox_diff_threshold: f64,

    /// Relative bbox area disagreement tolerance
    #[arg(long, default_value = "0.05")]
    bbox_area_ratio_threshold: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let region_slug = slugify_region(&args.region_query);
    let ctx = RunContext::create(&args.out_dir, &region_slug, args.year)?;

    info!("Resolving {:?} for {}", args.region_query, args.year);

    let client = NominatimClient::new(&args.nominatim_base)?;
    let opts = ResolveOptions {
        region_query: args.region_query,
        year: args.year,
        timezone: args.timezone,
        thresholds: Thresholds {
            degree: args.bbox_diff_threshold,
            area_ratio: args.bbox_area_ratio_threshold,
        },
    };

    let outcome = resolve_region(&client, &ctx, &opts).await?;

    println!(
        "{}",
        serde_json::json!({
            "region_json": outcome.region_json,
            "bbox": outcome.bbox,
        })
    );
    Ok(())
}
