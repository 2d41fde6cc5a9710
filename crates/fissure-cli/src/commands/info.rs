use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use fissure_core::loader::SliceStack;

#[derive(Args)]
pub struct InfoArgs {
    /// Directory containing the slice stack
    pub dir: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let stack = SliceStack::open(&args.dir)?;
    let slice = stack.load_slice(stack.current_index())?;

    println!("Directory:   {}", args.dir.display());
    println!("Slices:      {}", stack.len());
    println!("Dimensions:  {}x{}", slice.width(), slice.height());
    println!("Bit depth:   {}", slice.source_bit_depth);
    println!(
        "Middle:      {} ({})",
        stack.current_index(),
        slice.source.display()
    );

    super::remember_directory(&args.dir);
    Ok(())
}
