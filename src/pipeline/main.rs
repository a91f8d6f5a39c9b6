//! One-shot pipeline bootstrap.
//!
//! Runs region resolution and map rendering in-process, then writes the
//! summary and monthly statistics stubs the later analysis stages overwrite.

mod stubs;

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tamarack::mapbox::{render_bbox_map, RenderRequest, DEFAULT_IMAGE_SIZE, DEFAULT_STYLE};
use tamarack::models::Thresholds;
use tamarack::nominatim::{NominatimClient, DEFAULT_BASE_URL};
use tamarack::output::{slugify_region, RunContext};
use tamarack::resolver::{resolve_region, ResolveOptions};

use crate::stubs::{write_monthly_stub, write_summary_stub};

#[derive(Parser, Debug)]
#[command(name = "pipeline")]
#[command(about = "Bootstrap the annual region update outputs")]
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

    /// Statistics granularity recorded in the summary stub
    #[arg(long, default_value = "month")]
    granularity: String,

    /// Nominatim base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    nominatim_base: String,

    /// Environment variable holding the Mapbox access token
    #[arg(long, default_value = "MAPBOX_ACCESS_TOKEN")]
    mapbox_token_env: String,

    /// Mapbox style identifier
    #[arg(long, default_value = DEFAULT_STYLE)]
    mapbox_style: String,

    /// Image size as WIDTHxHEIGHT
    #[arg(long, default_value = DEFAULT_IMAGE_SIZE)]
    image_size: String,
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

    touch(&ctx.raw_dir.join("changesets.csv"))?;
    touch(&ctx.log_path())?;

    info!("Pipeline run for {:?} / {}", args.region_query, args.year);

    let client = NominatimClient::new(&args.nominatim_base)?;
    let opts = ResolveOptions {
        region_query: args.region_query.clone(),
        year: args.year,
        timezone: args.timezone.clone(),
        thresholds: Thresholds::default(),
    };
    let outcome = resolve_region(&client, &ctx, &opts).await?;
    info!("Resolved region: {}", outcome.region_json.display());

    let render = RenderRequest {
        region_json: outcome.region_json,
        out_png: ctx.figures_dir.join("bbox_map.png"),
        token_env: args.mapbox_token_env,
        style: args.mapbox_style,
        image_size: args.image_size,
    };
    let status = render_bbox_map(&render).await?;
    info!("Render step: {}", serde_json::to_string(&status)?);

    write_summary_stub(
        &ctx,
        &args.region_query,
        args.year,
        &args.timezone,
        &args.granularity,
    )?;
    write_monthly_stub(&ctx.stats_dir, args.year)?;

    println!(
        "{}",
        serde_json::json!({
            "status": "ok",
            "base_dir": ctx.base_dir,
            "generated_at": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        })
    );
    Ok(())
}

fn touch(path: &std::path::Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to touch {}", path.display()))?;
    Ok(())
}
