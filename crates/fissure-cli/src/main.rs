mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fissure", about = "Scan slice annotation and inspection tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show slice stack metadata
    Info(commands::info::InfoArgs),
    /// Reduce a slice window into a composite image
    Composite(commands::composite::CompositeArgs),
    /// Render a slice with overlays through a view transform
    Render(commands::render::RenderArgs),
    /// Flood-fill a region and save it as an overlay
    Fill(commands::fill::FillArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Composite(args) => commands::composite::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Fill(args) => commands::fill::run(args),
    }
}
