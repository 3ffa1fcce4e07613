mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cytoview_core::config::{load_config, ViewerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cytoview", about = "Cytology and medical image viewer toolkit")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Viewer config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a file and show its metadata
    Info(commands::info::InfoArgs),
    /// Report which rendering path each file would take
    Classify(commands::classify::ClassifyArgs),
    /// Map a canvas point to image coordinates
    Locate(commands::locate::LocateArgs),
    /// Render a viewer frame to an image file
    Render(commands::render::RenderArgs),
    /// Print or save the default viewer config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    match &cli.command {
        Commands::Info(args) => commands::info::run(args, &config),
        Commands::Classify(args) => commands::classify::run(args),
        Commands::Locate(args) => commands::locate::run(args, &config),
        Commands::Render(args) => commands::render::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
