//! Command-line front-end: renders a TacOps `.dat` map into a PNG file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tacmap::{render_map, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "tacmap")]
#[command(about = "Renders TacOps .dat map terrain into a PNG file")]
struct Args {
    /// TacOps .dat map filename
    #[arg(short, long)]
    input: PathBuf,

    /// Output image filename
    #[arg(short, long)]
    out: PathBuf,

    /// Be verbose
    #[arg(short, long)]
    verbose: bool,

    /// Overlay 1-kilometer grid
    #[arg(long = "1km")]
    grid_1km: bool,

    /// Overlay 5-kilometer grid
    #[arg(long = "5km")]
    grid_5km: bool,

    /// Overlay 10-kilometer grid
    #[arg(long = "10km")]
    grid_10km: bool,

    /// Add description text to generated image
    #[arg(short, long)]
    description: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let map = tacmap::load_map_file(&args.input)
        .with_context(|| format!("failed to load map file {}", args.input.display()))?;
    info!(
        "Loaded map \"{}\" version {}: {} x {} ({} x {} terrain raster)",
        map.name_lossy(),
        map.version,
        map.width,
        map.height,
        map.raster_width,
        map.raster_height,
    );

    let options = RenderOptions {
        grid_1km: args.grid_1km,
        grid_5km: args.grid_5km,
        grid_10km: args.grid_10km,
        caption: args.description,
    };
    let image = render_map(&map, &options);

    image
        .save(&args.out)
        .with_context(|| format!("failed to write image to {}", args.out.display()))?;
    info!("Wrote PNG to {}", args.out.display());

    Ok(())
}
