use image::RgbaImage;
use ndarray::{s, Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::consts::EPSILON;
use crate::transform::FitMode;

/// Colour lookup used when drawing a volume slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Gray,
    Red,
    Green,
    Hot,
}

impl Colormap {
    /// Map a normalised intensity in [0, 1] to RGB.
    pub fn apply(self, value: f32) -> [u8; 3] {
        let v = value.clamp(0.0, 1.0);
        let byte = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        match self {
            Self::Gray => [byte(v); 3],
            Self::Red => [byte(v), 0, 0],
            Self::Green => [0, byte(v), 0],
            Self::Hot => [byte(v * 3.0), byte(v * 3.0 - 1.0), byte(v * 3.0 - 2.0)],
        }
    }
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gray => write!(f, "gray"),
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Hot => write!(f, "hot"),
        }
    }
}

impl std::str::FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(Self::Gray),
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "hot" => Ok(Self::Hot),
            other => Err(format!("unknown colormap '{other}'")),
        }
    }
}

/// A decoded bitmap shown through the 2D compositing path.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub name: String,
    pub pixels: RgbaImage,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Metadata about a loaded volume.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeInfo {
    pub name: String,
    /// Voxel counts along x, y and z.
    pub dims: [usize; 3],
    pub colormap: Colormap,
}

/// A 3-D scalar volume. Voxels are stored with shape (z, y, x).
#[derive(Clone, Debug)]
pub struct Volume {
    pub info: VolumeInfo,
    pub voxels: Array3<f32>,
}

impl Volume {
    pub fn new(name: impl Into<String>, voxels: Array3<f32>) -> Self {
        let (z, y, x) = voxels.dim();
        Self {
            info: VolumeInfo {
                name: name.into(),
                dims: [x, y, z],
                colormap: Colormap::default(),
            },
            voxels,
        }
    }

    pub fn width(&self) -> usize {
        self.info.dims[0]
    }

    pub fn height(&self) -> usize {
        self.info.dims[1]
    }

    pub fn depth(&self) -> usize {
        self.info.dims[2]
    }

    /// Axial slice at `z`, windowed to [0, 1] by the volume's min/max.
    /// Out-of-range indices are clamped to the last slice.
    pub fn axial_slice(&self, z: usize) -> Array2<f32> {
        let z = z.min(self.depth().saturating_sub(1));
        let (lo, hi) = self.intensity_range();
        let range = (hi - lo).max(EPSILON);
        self.voxels
            .slice(s![z, .., ..])
            .mapv(|v| ((v - lo) / range).clamp(0.0, 1.0))
    }

    pub fn middle_slice(&self) -> Array2<f32> {
        self.axial_slice(self.depth() / 2)
    }

    fn intensity_range(&self) -> (f32, f32) {
        self.voxels
            .iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Primary media shown by the viewer.
#[derive(Clone, Debug)]
pub enum LoadedMedia {
    Raster(RasterImage),
    Volume(Volume),
}

impl LoadedMedia {
    pub fn name(&self) -> &str {
        match self {
            Self::Raster(r) => &r.name,
            Self::Volume(v) => &v.info.name,
        }
    }

    /// Size of the drawn plane in image pixels.
    pub fn display_size(&self) -> (u32, u32) {
        match self {
            Self::Raster(r) => (r.width(), r.height()),
            Self::Volume(v) => (v.width() as u32, v.height() as u32),
        }
    }

    pub fn is_volume(&self) -> bool {
        matches!(self, Self::Volume(_))
    }

    /// Bitmaps are never scaled past 100% on fit; volumes are.
    pub fn fit_mode(&self) -> FitMode {
        match self {
            Self::Raster(_) => FitMode::NoUpscale,
            Self::Volume(_) => FitMode::Unbounded,
        }
    }
}

/// A volume composited over the primary volume.
#[derive(Clone, Debug)]
pub struct OverlayLayer {
    pub volume: Volume,
    pub opacity: f32,
}

impl OverlayLayer {
    pub fn new(volume: Volume, opacity: f32) -> Self {
        Self {
            volume,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}
