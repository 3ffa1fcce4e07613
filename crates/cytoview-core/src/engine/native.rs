use std::fs::File;

use memmap2::Mmap;
use tracing::{debug, info};

use crate::consts::MIN_SURFACE_TEXTURE_SIDE;
use crate::error::{Result, ViewerError};
use crate::media::{Colormap, Volume};

use super::samples::gunzip;
use super::{mgh, nifti, nrrd, RenderSurface, VolumeEngine, VolumeSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VolumeFormat {
    Nifti,
    NiftiGz,
    Mgh,
    Mgz,
    Nrrd,
}

impl VolumeFormat {
    fn is_gzipped(self) -> bool {
        matches!(self, Self::NiftiGz | Self::Mgz)
    }
}

fn detect_format(name: &str) -> std::result::Result<VolumeFormat, String> {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".nii") {
        Ok(VolumeFormat::Nifti)
    } else if lower.ends_with(".nii.gz") {
        Ok(VolumeFormat::NiftiGz)
    } else if lower.ends_with(".mgh") {
        Ok(VolumeFormat::Mgh)
    } else if lower.ends_with(".mgz") {
        Ok(VolumeFormat::Mgz)
    } else if lower.ends_with(".nrrd") {
        Ok(VolumeFormat::Nrrd)
    } else {
        Err("format not supported by the built-in engine".into())
    }
}

/// CPU volume reader for NIfTI-1, MGH and NRRD files, plus the gzipped
/// `.nii.gz` and `.mgz` variants.
pub struct NativeVolumeEngine {
    surface: Option<RenderSurface>,
    colormap: Colormap,
}

impl NativeVolumeEngine {
    pub fn new(colormap: Colormap) -> Self {
        Self {
            surface: None,
            colormap,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }
}

impl Default for NativeVolumeEngine {
    fn default() -> Self {
        Self::new(Colormap::Gray)
    }
}

impl VolumeEngine for NativeVolumeEngine {
    fn name(&self) -> &str {
        "native"
    }

    fn attach(&mut self, surface: &RenderSurface) -> Result<()> {
        if surface.width == 0 || surface.height == 0 {
            return Err(ViewerError::Initialization(format!(
                "render surface is empty ({}x{})",
                surface.width, surface.height
            )));
        }
        if surface.max_texture_side < MIN_SURFACE_TEXTURE_SIDE {
            return Err(ViewerError::Initialization(format!(
                "surface texture limit {} is below {}",
                surface.max_texture_side, MIN_SURFACE_TEXTURE_SIDE
            )));
        }
        info!(
            width = surface.width,
            height = surface.height,
            "Volume engine attached"
        );
        self.surface = Some(*surface);
        Ok(())
    }

    fn load_volume(&mut self, source: &VolumeSource) -> Result<Volume> {
        if self.surface.is_none() {
            return Err(ViewerError::Initialization(
                "volume engine is not attached".into(),
            ));
        }
        let format =
            detect_format(&source.name).map_err(|e| ViewerError::engine_load(&source.name, e))?;

        let load_err = |e: std::io::Error| ViewerError::engine_load(&source.name, e);
        let file = File::open(&source.path).map_err(load_err)?;
        let mmap = unsafe { Mmap::map(&file).map_err(load_err)? };
        debug!(name = %source.name, bytes = mmap.len(), ?format, "Decoding volume");

        let engine_err = |e: String| ViewerError::engine_load(&source.name, e);
        let inflated = if format.is_gzipped() {
            let buf = gunzip(&mmap).map_err(engine_err)?;
            debug!(name = %source.name, bytes = buf.len(), "Volume decompressed");
            Some(buf)
        } else {
            None
        };
        let bytes: &[u8] = inflated.as_deref().unwrap_or(&mmap[..]);

        let voxels = match format {
            VolumeFormat::Nifti | VolumeFormat::NiftiGz => nifti::decode(bytes),
            VolumeFormat::Mgh | VolumeFormat::Mgz => mgh::decode(bytes),
            VolumeFormat::Nrrd => nrrd::decode(bytes),
        }
        .map_err(engine_err)?;

        let mut volume = Volume::new(source.name.clone(), voxels);
        volume.info.colormap = self.colormap;
        info!(name = %source.name, dims = ?volume.info.dims, "Volume loaded");
        Ok(volume)
    }
}
