use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ANNOTATION_COUNT, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH,
    DEFAULT_OVERLAY_OPACITY,
};
use crate::dispatch::FallbackPolicy;
use crate::error::{Result, ViewerError};
use crate::media::Colormap;

/// Viewer settings read from a TOML file. Every field is optional in the
/// file; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Canvas size for headless rendering and the initial window.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub fallback_policy: FallbackPolicy,
    /// Drop load completions superseded by a newer request.
    pub discard_stale_loads: bool,
    /// Media opened at startup.
    pub default_image: Option<PathBuf>,
    pub volume_colormap: Colormap,
    pub annotation_count: usize,
    /// Kept last so it serialises as a trailing `[overlay]` table.
    pub overlay: OverlayConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            fallback_policy: FallbackPolicy::default(),
            discard_stale_loads: true,
            default_image: None,
            volume_colormap: Colormap::Gray,
            annotation_count: DEFAULT_ANNOTATION_COUNT,
            overlay: OverlayConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Blend opacity in [0, 1].
    pub opacity: f32,
    pub colormap: Colormap,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            opacity: DEFAULT_OVERLAY_OPACITY,
            colormap: Colormap::Red,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ViewerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ViewerError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ViewerError::Config(format!(
                "canvas size must be non-zero, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(0.0..=1.0).contains(&self.overlay.opacity) {
            return Err(ViewerError::Config(format!(
                "overlay opacity must be within [0, 1], got {}",
                self.overlay.opacity
            )));
        }
        Ok(())
    }
}

/// Read and validate a config file.
pub fn load_config(path: &Path) -> Result<ViewerConfig> {
    let text = std::fs::read_to_string(path)?;
    ViewerConfig::from_toml(&text)
}
