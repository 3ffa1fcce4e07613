use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cytoview_core::annotate::mock_annotations;
use cytoview_core::compose::render_frame;
use cytoview_core::config::ViewerConfig;
use cytoview_core::dispatch::LoadOutcome;
use cytoview_core::viewport::ViewportState;
use tracing::info;

use super::{parse_point, parse_size, PolicyArg, Session};

#[derive(Args)]
pub struct RenderArgs {
    /// Input image or volume
    pub file: PathBuf,

    /// Output image (format from the extension)
    #[arg(short, long, default_value = "frame.png")]
    pub output: PathBuf,

    /// Canvas size as WIDTHxHEIGHT (defaults to the config canvas)
    #[arg(long, value_parser = parse_size)]
    pub canvas: Option<(u32, u32)>,

    /// Zoom factor (0.1 - 10)
    #[arg(long, default_value = "1.0")]
    pub zoom: f32,

    /// Pan offset in screen pixels as X,Y
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub pan: Option<(f32, f32)>,

    /// Brightness multiplier (0.5 - 2), raster path only
    #[arg(long, default_value = "1.0")]
    pub brightness: f32,

    /// Contrast multiplier (0.5 - 3), raster path only
    #[arg(long, default_value = "1.0")]
    pub contrast: f32,

    /// Draw this many mock annotations
    #[arg(long)]
    pub annotate: Option<usize>,

    /// Seed for mock annotation placement
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Volume to composite over the primary volume (repeatable)
    #[arg(long)]
    pub overlay: Vec<PathBuf>,

    /// What to do when the volume engine rejects the file
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

pub fn run(args: &RenderArgs, config: &ViewerConfig) -> Result<()> {
    let canvas = args
        .canvas
        .unwrap_or((config.canvas_width, config.canvas_height));
    let mut session = Session::open(config, args.policy, canvas);

    if let LoadOutcome::Primary {
        name,
        retried_as_raster: true,
        ..
    } = session.load(&args.file)?
    {
        println!("{name}: volume engine failed, rendered as bitmap");
    }
    for overlay in &args.overlay {
        session.load_overlay(overlay)?;
    }

    let mut viewport = ViewportState::default();
    viewport.set_zoom(args.zoom);
    if let Some((x, y)) = args.pan {
        viewport.set_pan(x, y);
    }
    viewport.set_brightness(args.brightness);
    viewport.set_contrast(args.contrast);

    let media = session
        .dispatcher
        .primary()
        .context("Loaded media missing after dispatch")?;
    let annotations = match args.annotate {
        Some(count) => {
            let (w, h) = media.display_size();
            mock_annotations(w, h, count, args.seed)
        }
        None => Vec::new(),
    };

    let frame = render_frame(
        canvas.0,
        canvas.1,
        media,
        session.dispatcher.overlays(),
        &viewport,
        &annotations,
    );
    frame
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(output = %args.output.display(), "Frame rendered");
    println!(
        "Rendered {} ({} overlay(s), {} annotation(s)) to {}",
        media.name(),
        session.dispatcher.overlays().len(),
        annotations.len(),
        args.output.display()
    );
    Ok(())
}
