use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cytoview_core::config::ViewerConfig;
use cytoview_core::dispatch::LoadOutcome;

use super::{PolicyArg, Session};
use crate::summary::print_media_summary;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image or volume
    pub file: PathBuf,

    /// What to do when the volume engine rejects the file
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

pub fn run(args: &InfoArgs, config: &ViewerConfig) -> Result<()> {
    let canvas = (config.canvas_width, config.canvas_height);
    let mut session = Session::open(config, args.policy, canvas);
    let outcome = session.load(&args.file)?;

    let LoadOutcome::Primary {
        path,
        retried_as_raster,
        ..
    } = outcome
    else {
        anyhow::bail!("{} did not load as primary media", args.file.display());
    };
    let media = session
        .dispatcher
        .primary()
        .context("Loaded media missing after dispatch")?;

    print_media_summary(&args.file, media, path, retried_as_raster, canvas);
    Ok(())
}
