pub mod classify;
pub mod config;
pub mod info;
pub mod locate;
pub mod render;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use cytoview_core::config::ViewerConfig;
use cytoview_core::dispatch::{
    FallbackPolicy, LoadOutcome, MediaLoader, MediaSource, RenderDispatcher,
};
use cytoview_core::engine::{NativeVolumeEngine, RenderSurface};

/// Texture limit reported for the offscreen surface used by headless commands.
const HEADLESS_TEXTURE_SIDE: u32 = 8192;

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    ReportError,
    RetryAsRaster,
}

impl From<PolicyArg> for FallbackPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::ReportError => FallbackPolicy::ReportError,
            PolicyArg::RetryAsRaster => FallbackPolicy::RetryAsRaster,
        }
    }
}

/// Dispatcher plus an attached loader, configured for one command run.
pub struct Session {
    pub dispatcher: RenderDispatcher,
    pub loader: MediaLoader,
}

impl Session {
    pub fn open(config: &ViewerConfig, policy: Option<PolicyArg>, canvas: (u32, u32)) -> Self {
        let policy = policy.map_or(config.fallback_policy, FallbackPolicy::from);
        let engine = NativeVolumeEngine::new(config.volume_colormap);
        let mut loader = MediaLoader::new(Some(Box::new(engine)), policy)
            .with_overlay_style(config.overlay.opacity, config.overlay.colormap);
        let surface = RenderSurface::new(canvas.0, canvas.1, HEADLESS_TEXTURE_SIDE);
        if let Err(e) = loader.attach(&surface) {
            tracing::warn!(error = %e, "Continuing without volume support");
        }
        Self {
            dispatcher: RenderDispatcher::new(config.discard_stale_loads),
            loader,
        }
    }

    pub fn load(&mut self, path: &Path) -> Result<LoadOutcome> {
        self.dispatcher
            .dispatch(&mut self.loader, MediaSource::from_path(path))
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn load_overlay(&mut self, path: &Path) -> Result<LoadOutcome> {
        let plan = self
            .dispatcher
            .plan_overlay(MediaSource::from_path(path))
            .with_context(|| format!("Cannot overlay {}", path.display()))?;
        let result = self.loader.execute(&plan);
        self.dispatcher
            .apply(plan.ticket, result)
            .with_context(|| format!("Failed to load overlay {}", path.display()))
    }
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    if w == 0 || h == 0 {
        return Err("canvas size must be non-zero".into());
    }
    Ok((w, h))
}

/// Parse `X,Y`.
pub fn parse_point(s: &str) -> std::result::Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x: f32 = x.trim().parse().map_err(|_| format!("bad x '{x}'"))?;
    let y: f32 = y.trim().parse().map_err(|_| format!("bad y '{y}'"))?;
    Ok((x, y))
}
