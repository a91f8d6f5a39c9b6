//! Bbox overlay map CLI.
//!
//! Reads the final bounding box from an existing `region.json` and fetches
//! a static map image with the box drawn on top.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tamarack::mapbox::{render_bbox_map, RenderRequest, DEFAULT_IMAGE_SIZE, DEFAULT_STYLE};

#[derive(Parser, Debug)]
#[command(name = "render")]
#[command(about = "Render a bbox overlay map via the Mapbox Static Images API")]
struct Args {
    /// Path to the region.json artifact
    #[arg(long)]
    region_json: PathBuf,

    /// Output PNG path
    #[arg(long)]
    out_png: PathBuf,

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

    info!("Rendering bbox map for {}", args.region_json.display());

    let request = RenderRequest {
        region_json: args.region_json,
        out_png: args.out_png,
        token_env: args.mapbox_token_env,
        style: args.mapbox_style,
        image_size: args.image_size,
    };
    let status = render_bbox_map(&request).await?;

    println!("{}", serde_json::to_string(&status)?);
    Ok(())
}
