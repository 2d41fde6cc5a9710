use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use fissure_core::render::ResampleKernel;
use fissure_core::viewer::Viewer;

#[derive(Clone, ValueEnum)]
pub enum KernelArg {
    Nearest,
    Bilinear,
    Bicubic,
}

impl From<&KernelArg> for ResampleKernel {
    fn from(arg: &KernelArg) -> Self {
        match arg {
            KernelArg::Nearest => ResampleKernel::Nearest,
            KernelArg::Bilinear => ResampleKernel::Bilinear,
            KernelArg::Bicubic => ResampleKernel::Bicubic,
        }
    }
}

#[derive(Args)]
pub struct RenderArgs {
    /// Directory containing the slice stack
    pub dir: PathBuf,

    /// Slice index to display (defaults to the middle slice)
    #[arg(long)]
    pub index: Option<usize>,

    /// Canvas width in pixels
    #[arg(long, default_value = "1024")]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "768")]
    pub height: u32,

    /// Overlay files to load as annotation layers (repeatable)
    #[arg(long = "overlay")]
    pub overlays: Vec<PathBuf>,

    /// Resampling kernel
    #[arg(long, value_enum, default_value = "nearest")]
    pub kernel: KernelArg,

    /// Skip the measurement ruler
    #[arg(long)]
    pub no_ruler: bool,

    /// Opacity applied to loaded overlays (0-1)
    #[arg(long, default_value = "1.0")]
    pub opacity: f32,

    /// Brightness applied to loaded overlays (0-10)
    #[arg(long, default_value = "1.0")]
    pub brightness: f32,

    /// Output file path
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let mut viewer = Viewer::new(args.width, args.height);
    viewer.options.kernel = ResampleKernel::from(&args.kernel);
    viewer.options.ruler_visible = !args.no_ruler;

    viewer.open_stack(&args.dir)?;
    if let Some(index) = args.index {
        viewer.set_slice_index(index)?;
    }

    for path in &args.overlays {
        let index = viewer.load_overlay_layer(path)?;
        if let Some(layer) = viewer.layers.get_mut(index) {
            layer.set_opacity(args.opacity)?;
            layer.set_brightness(args.brightness)?;
        }
    }

    viewer.zoom_fit();
    viewer.save_display(&args.output)?;

    println!("{}", viewer.slice_info());
    println!("Rendered -> {}", args.output.display());
    super::remember_directory(&args.dir);
    Ok(())
}
