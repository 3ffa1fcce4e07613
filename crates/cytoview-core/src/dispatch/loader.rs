use std::io::Cursor;

use image::ImageReader;
use tracing::{info, warn};

use crate::engine::{RenderSurface, VolumeEngine, VolumeSource};
use crate::error::{Result, ViewerError};
use crate::media::{Colormap, LoadedMedia, OverlayLayer, RasterImage};

use super::classify::MediaKind;
use super::source::{MediaSource, ScopedSource};
use super::{FallbackPolicy, LoadPlan};

/// Media produced by a finished load, before it is applied to the viewer.
#[derive(Debug)]
pub enum LoadedPayload {
    Primary {
        media: LoadedMedia,
        /// True when a volumetric file ended up on the raster path.
        retried_as_raster: bool,
    },
    Overlay(OverlayLayer),
}

/// Performs the I/O half of a dispatch: engine loads and raster decodes.
///
/// Owns the volume engine. With no engine (never attached, or attach
/// failed) the loader runs in reduced-capability mode and only the raster
/// path works.
pub struct MediaLoader {
    engine: Option<Box<dyn VolumeEngine>>,
    policy: FallbackPolicy,
    overlay_opacity: f32,
    overlay_colormap: Colormap,
}

impl MediaLoader {
    pub fn new(engine: Option<Box<dyn VolumeEngine>>, policy: FallbackPolicy) -> Self {
        Self {
            engine,
            policy,
            overlay_opacity: crate::consts::DEFAULT_OVERLAY_OPACITY,
            overlay_colormap: Colormap::Red,
        }
    }

    pub fn with_overlay_style(mut self, opacity: f32, colormap: Colormap) -> Self {
        self.overlay_opacity = opacity.clamp(0.0, 1.0);
        self.overlay_colormap = colormap;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: FallbackPolicy) {
        self.policy = policy;
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Attach the engine to its surface. On failure the engine is dropped
    /// and the loader degrades to raster-only mode.
    pub fn attach(&mut self, surface: &RenderSurface) -> Result<()> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(ViewerError::Initialization("no volume engine configured".into()));
        };
        match engine.attach(surface) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(engine = engine.name(), error = %e, "Volume engine failed to attach");
                self.engine = None;
                Err(e)
            }
        }
    }

    /// Run the load described by `plan`.
    pub fn execute(&mut self, plan: &LoadPlan) -> Result<LoadedPayload> {
        match plan.kind {
            MediaKind::Unsupported => Err(ViewerError::UnsupportedFormat(plan.name.clone())),
            MediaKind::Raster => {
                let raster = decode_raster(&plan.source, &plan.name)?;
                Ok(LoadedPayload::Primary {
                    media: LoadedMedia::Raster(raster),
                    retried_as_raster: false,
                })
            }
            MediaKind::Volumetric => match self.load_volume(plan) {
                Ok(payload) => Ok(payload),
                Err(e) => self.fall_back(plan, e),
            },
        }
    }

    fn load_volume(&mut self, plan: &LoadPlan) -> Result<LoadedPayload> {
        let engine = self
            .engine
            .as_mut()
            .ok_or_else(|| ViewerError::Initialization("medical viewer unavailable".into()))?;

        // The scoped source lives until this function returns, on every path.
        let scoped = ScopedSource::materialize(&plan.source)
            .map_err(|e| ViewerError::engine_load(&plan.name, e))?;
        let source = VolumeSource {
            name: plan.name.clone(),
            path: scoped.path().to_path_buf(),
        };
        let mut volume = engine.load_volume(&source)?;

        if plan.overlay {
            volume.info.colormap = self.overlay_colormap;
            Ok(LoadedPayload::Overlay(OverlayLayer::new(volume, self.overlay_opacity)))
        } else {
            Ok(LoadedPayload::Primary {
                media: LoadedMedia::Volume(volume),
                retried_as_raster: false,
            })
        }
    }

    fn fall_back(&self, plan: &LoadPlan, error: ViewerError) -> Result<LoadedPayload> {
        match self.policy {
            FallbackPolicy::ReportError => Err(error),
            FallbackPolicy::RetryAsRaster if plan.overlay => Err(error),
            FallbackPolicy::RetryAsRaster => {
                info!(name = %plan.name, error = %error, "Retrying volume as raster image");
                match decode_raster(&plan.source, &plan.name) {
                    Ok(raster) => Ok(LoadedPayload::Primary {
                        media: LoadedMedia::Raster(raster),
                        retried_as_raster: true,
                    }),
                    Err(raster_err) => {
                        warn!(name = %plan.name, error = %raster_err, "Raster retry failed");
                        Err(error)
                    }
                }
            }
        }
    }
}

/// Decode a bitmap, sniffing the format from its content.
pub fn decode_raster(source: &MediaSource, name: &str) -> Result<RasterImage> {
    let decoded = match source {
        MediaSource::Path(path) => ImageReader::open(path)
            .map_err(|e| ViewerError::decode(name, e))?
            .with_guessed_format()
            .map_err(|e| ViewerError::decode(name, e))?
            .decode(),
        MediaSource::Bytes { bytes, .. } => ImageReader::new(Cursor::new(bytes.as_ref()))
            .with_guessed_format()
            .map_err(|e| ViewerError::decode(name, e))?
            .decode(),
    }
    .map_err(|e| ViewerError::decode(name, e))?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(ViewerError::InvalidDimensions {
            width: decoded.width(),
            height: decoded.height(),
        });
    }

    Ok(RasterImage {
        name: name.to_string(),
        pixels: decoded.to_rgba8(),
    })
}
