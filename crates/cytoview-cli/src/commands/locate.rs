use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cytoview_core::config::ViewerConfig;
use cytoview_core::transform::{compute_placement, screen_to_image};
use cytoview_core::viewport::ViewportState;

use super::{parse_point, parse_size, Session};

#[derive(Args)]
pub struct LocateArgs {
    /// Input image or volume
    pub file: PathBuf,

    /// Canvas size as WIDTHxHEIGHT (defaults to the config canvas)
    #[arg(long, value_parser = parse_size)]
    pub canvas: Option<(u32, u32)>,

    /// Zoom factor (0.1 - 10)
    #[arg(long, default_value = "1.0")]
    pub zoom: f32,

    /// Pan offset in screen pixels as X,Y
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub pan: Option<(f32, f32)>,

    /// Canvas point to map, as X,Y
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub at: (f32, f32),
}

pub fn run(args: &LocateArgs, config: &ViewerConfig) -> Result<()> {
    let canvas = args
        .canvas
        .unwrap_or((config.canvas_width, config.canvas_height));
    let mut session = Session::open(config, None, canvas);
    session.load(&args.file)?;
    let media = session
        .dispatcher
        .primary()
        .context("Loaded media missing after dispatch")?;

    let mut viewport = ViewportState::default();
    viewport.set_zoom(args.zoom);
    if let Some((x, y)) = args.pan {
        viewport.set_pan(x, y);
    }

    let (w, h) = media.display_size();
    let placement = compute_placement(
        w as f32,
        h as f32,
        canvas.0 as f32,
        canvas.1 as f32,
        &viewport,
        media.fit_mode(),
    );

    println!(
        "placement: origin=({:.1}, {:.1}) size={:.1}x{:.1} scale={:.4}",
        placement.origin_x,
        placement.origin_y,
        placement.display_width,
        placement.display_height,
        placement.effective_scale
    );
    match screen_to_image(args.at.0, args.at.1, &placement) {
        Some((x, y)) => println!("image: {x}, {y}"),
        None => println!("image: outside"),
    }
    Ok(())
}
