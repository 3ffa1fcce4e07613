use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cytoview_core::config::ViewerConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the effective config (after --config) instead of the defaults
    #[arg(long)]
    pub effective: bool,
}

/// Print or save a viewer config as TOML.
pub fn run(args: &ConfigArgs, loaded: &ViewerConfig) -> Result<()> {
    let config = if args.effective {
        loaded.clone()
    } else {
        ViewerConfig::default()
    };
    let toml_str = config.to_toml()?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
