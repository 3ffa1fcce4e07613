//! Volume engine seam.
//!
//! The viewer only talks to a volume renderer through [`VolumeEngine`]:
//! attach it to a render surface once, then ask it to load volumes. The
//! built-in [`NativeVolumeEngine`] understands NIfTI-1, MGH and NRRD files,
//! plain or gzipped; other medical formats are rejected with
//! [`ViewerError::EngineLoad`](crate::error::ViewerError::EngineLoad).

mod mgh;
mod native;
mod nifti;
mod nrrd;
mod samples;

use std::path::PathBuf;

use crate::error::Result;
use crate::media::Volume;

pub use native::NativeVolumeEngine;
pub use samples::{Endian, ScalarType};

/// The drawing surface an engine attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSurface {
    pub width: u32,
    pub height: u32,
    /// Largest texture edge the surface can upload.
    pub max_texture_side: u32,
}

impl RenderSurface {
    pub fn new(width: u32, height: u32, max_texture_side: u32) -> Self {
        Self {
            width,
            height,
            max_texture_side,
        }
    }
}

/// A volume file on disk, named by the name the user knows it by.
#[derive(Clone, Debug)]
pub struct VolumeSource {
    pub name: String,
    pub path: PathBuf,
}

pub trait VolumeEngine: Send {
    fn name(&self) -> &str;

    /// Bind the engine to its surface. Must succeed before any load.
    fn attach(&mut self, surface: &RenderSurface) -> Result<()>;

    fn load_volume(&mut self, source: &VolumeSource) -> Result<Volume>;
}
