//! polar2cart: warp polar radar images to Cartesian and inspect radar intrinsics
//!
//! Usage:
//!   polar2cart warp --input polar.png --out cart.png [--frame frame.json]
//!   polar2cart intrinsics --frame frame.json

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use radar_fusion_geom::io::{load_polar_image, load_radar_frame, save_batch_item};
use radar_fusion_geom::{compute_radar_intrinsic_matrix, PolarToCartesianWarp};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "polar2cart", version, about = "Polar radar image tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resample a polar (range x azimuth) PNG into a Cartesian top-down PNG
    Warp {
        /// Polar input image (rows = range bins, columns = azimuth bins)
        #[arg(long)]
        input: PathBuf,

        /// Output path for the Cartesian image
        #[arg(long, default_value = "cartesian.png")]
        out: PathBuf,

        /// Radar frame JSON; its bin counts must match the input image
        #[arg(long)]
        frame: Option<PathBuf>,
    },

    /// Print the radar intrinsic matrix for a frame
    Intrinsics {
        #[arg(long)]
        frame: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("polar2cart v{}", radar_fusion_geom::VERSION);

    match cli.command {
        Command::Warp { input, out, frame } => warp(input, out, frame),
        Command::Intrinsics { frame } => intrinsics(frame),
    }
}

fn warp(input: PathBuf, out: PathBuf, frame: Option<PathBuf>) -> Result<()> {
    let polar = load_polar_image(&input)
        .with_context(|| format!("failed to load polar image {}", input.display()))?;
    let [_, range_bins, angle_bins, channels] = polar.shape();
    info!(range_bins, angle_bins, channels, "polar image");

    if let Some(frame_path) = frame {
        let frame = load_radar_frame(&frame_path)
            .with_context(|| format!("failed to load radar frame {}", frame_path.display()))?;
        if frame.range_nbins != range_bins || frame.angle_nbins != angle_bins {
            bail!(
                "radar frame expects {}x{} bins but {} is {}x{}",
                frame.range_nbins,
                frame.angle_nbins,
                input.display(),
                range_bins,
                angle_bins
            );
        }
        let k = compute_radar_intrinsic_matrix(&frame)?;
        info!("radar intrinsic matrix:{k}");
    }

    let warp = PolarToCartesianWarp::from_input_shape(polar.shape())?;
    let cartesian = warp.apply(&polar)?;
    save_batch_item(&cartesian, 0, &out)
        .with_context(|| format!("failed to write {}", out.display()))?;

    info!(
        width = cartesian.width(),
        height = cartesian.height(),
        out = %out.display(),
        "wrote cartesian image"
    );
    Ok(())
}

fn intrinsics(frame_path: PathBuf) -> Result<()> {
    let frame = load_radar_frame(&frame_path)
        .with_context(|| format!("failed to load radar frame {}", frame_path.display()))?;
    let k = compute_radar_intrinsic_matrix(&frame)?;
    println!("{k}");
    Ok(())
}
