use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use fissure_core::loader::{IntensityRange, ReduceOp, SliceStack, WindowDirection};
use image::{GrayImage, Luma};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Clone, ValueEnum)]
pub enum DirectionArg {
    Omni,
    Front,
    Back,
}

impl From<&DirectionArg> for WindowDirection {
    fn from(arg: &DirectionArg) -> Self {
        match arg {
            DirectionArg::Omni => WindowDirection::Omni,
            DirectionArg::Front => WindowDirection::Front,
            DirectionArg::Back => WindowDirection::Back,
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum OpArg {
    Max,
    Min,
    Mean,
}

impl From<&OpArg> for ReduceOp {
    fn from(arg: &OpArg) -> Self {
        match arg {
            OpArg::Max => ReduceOp::Max,
            OpArg::Min => ReduceOp::Min,
            OpArg::Mean => ReduceOp::Mean,
        }
    }
}

#[derive(Args)]
pub struct CompositeArgs {
    /// Directory containing the slice stack
    pub dir: PathBuf,

    /// Slice index to composite around (defaults to the middle slice)
    #[arg(long)]
    pub index: Option<usize>,

    /// Number of neighboring slices on each side of the window
    #[arg(short, long, default_value = "2")]
    pub radius: usize,

    /// Window direction relative to the current slice
    #[arg(long, value_enum, default_value = "omni")]
    pub direction: DirectionArg,

    /// Pixelwise reduction applied across the window
    #[arg(long, value_enum, default_value = "max")]
    pub op: OpArg,

    /// Lower intensity remap bound (16-bit scale)
    #[arg(long, default_value = "0")]
    pub min: f32,

    /// Upper intensity remap bound (16-bit scale)
    #[arg(long, default_value = "65535")]
    pub max: f32,

    /// Preload every slice into memory before compositing
    #[arg(long)]
    pub preload: bool,

    /// Output file path
    #[arg(short, long, default_value = "composite.png")]
    pub output: PathBuf,
}

pub fn run(args: &CompositeArgs) -> Result<()> {
    let mut stack = SliceStack::open(&args.dir)?;
    if let Some(index) = args.index {
        stack.set_index(index)?;
    }

    if args.preload {
        let pb = ProgressBar::new(stack.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar().template("Preloading [{bar:40}] {pos}/{len}")?,
        );
        stack.preload(|done, _total| pb.set_position(done as u64))?;
        pb.finish();
    }

    let range = IntensityRange {
        min: args.min,
        max: args.max,
    };
    let slice = stack.composite(
        args.radius,
        WindowDirection::from(&args.direction),
        ReduceOp::from(&args.op),
        Some(&range),
    )?;

    let (height, width) = slice.data.dim();
    let mut img = GrayImage::new(width as u32, height as u32);
    for ((y, x), &v) in slice.data.indexed_iter() {
        img.put_pixel(x as u32, y as u32, Luma([v]));
    }
    img.save(&args.output)?;

    println!(
        "Composited {} slices -> {}",
        stack.window(args.radius, WindowDirection::from(&args.direction)).len(),
        args.output.display()
    );
    super::remember_directory(&args.dir);
    Ok(())
}
