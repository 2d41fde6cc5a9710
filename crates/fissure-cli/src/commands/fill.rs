use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use fissure_core::viewer::Viewer;
use tracing::debug;

#[derive(Args)]
pub struct FillArgs {
    /// Directory containing the slice stack
    pub dir: PathBuf,

    /// Slice index to fill on (defaults to the middle slice)
    #[arg(long)]
    pub index: Option<usize>,

    /// Seed x coordinate (image space)
    #[arg(short = 'x', long)]
    pub seed_x: f64,

    /// Seed y coordinate (image space)
    #[arg(short = 'y', long)]
    pub seed_y: f64,

    /// Maximum intensity difference from the seed value (0-100)
    #[arg(short, long, default_value = "4")]
    pub threshold: u8,

    /// Maximum number of painted pixels
    #[arg(long, default_value = "100")]
    pub max_steps: usize,

    /// Output overlay path (1-bit PNG)
    #[arg(short, long, default_value = "fill.png")]
    pub output: PathBuf,
}

pub fn run(args: &FillArgs) -> Result<()> {
    let mut viewer = Viewer::new(1, 1);
    viewer.open_stack(&args.dir)?;
    if let Some(index) = args.index {
        viewer.set_slice_index(index)?;
    }
    viewer.controls.set_fill_threshold(args.threshold)?;
    viewer.controls.set_max_fill_steps(args.max_steps)?;

    // The viewer takes screen coordinates; map the image-space seed in.
    let (sx, sy) = viewer.transform.image_to_screen(args.seed_x, args.seed_y);
    if !viewer.flood_fill_at(sx, sy)? {
        bail!("seed ({}, {}) is outside the image", args.seed_x, args.seed_y);
    }
    let painted = viewer.finish_fill();
    debug!(painted, threshold = args.threshold, "fill completed");

    viewer.save_active_overlay(&args.output)?;
    println!("Painted {} pixels -> {}", painted, args.output.display());
    super::remember_directory(&args.dir);
    Ok(())
}
