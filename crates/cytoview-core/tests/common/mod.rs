use std::io::{Cursor, Write};
use std::path::PathBuf;

use cytoview_core::dispatch::{FallbackPolicy, MediaLoader};
use cytoview_core::engine::{NativeVolumeEngine, RenderSurface, VolumeEngine, VolumeSource};
use cytoview_core::error::{Result, ViewerError};
use cytoview_core::media::Volume;
use flate2::write::GzEncoder;
use flate2::Compression;
use image::{ImageFormat, Rgba, RgbaImage};
use ndarray::Array3;
use tempfile::TempDir;

/// A surface the built-in engine accepts.
pub fn test_surface() -> RenderSurface {
    RenderSurface::new(1024, 768, 4096)
}

/// Loader with the built-in engine, already attached.
pub fn attached_loader(policy: FallbackPolicy) -> MediaLoader {
    let mut loader = MediaLoader::new(Some(Box::new(NativeVolumeEngine::default())), policy);
    loader
        .attach(&test_surface())
        .expect("native engine should attach");
    loader
}

pub fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

/// Encode a horizontal gradient PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / width.max(1)) as u8;
        Rgba([v, v, v, 255])
    });
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

/// Build a single-file NIfTI-1 image.
///
/// `payload` holds the voxel bytes already in the requested byte order.
pub fn nifti_bytes(
    dims: [i16; 3],
    datatype: i16,
    bitpix: i16,
    payload: &[u8],
    big_endian: bool,
    slope: f32,
    inter: f32,
) -> Vec<u8> {
    let i16b = |v: i16| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
    let i32b = |v: i32| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
    let f32b = |v: f32| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };

    let mut buf = vec![0u8; 352];
    buf[0..4].copy_from_slice(&i32b(348));
    let dim = [3, dims[0], dims[1], dims[2], 1, 1, 1, 1];
    for (i, d) in dim.iter().enumerate() {
        buf[40 + i * 2..42 + i * 2].copy_from_slice(&i16b(*d));
    }
    buf[70..72].copy_from_slice(&i16b(datatype));
    buf[72..74].copy_from_slice(&i16b(bitpix));
    buf[108..112].copy_from_slice(&f32b(352.0));
    buf[112..116].copy_from_slice(&f32b(slope));
    buf[116..120].copy_from_slice(&f32b(inter));
    buf[344..348].copy_from_slice(b"n+1\0");
    buf.extend_from_slice(payload);
    buf
}

/// Little-endian float32 NIfTI whose voxel value is its linear index.
pub fn ramp_nifti(dims: [i16; 3]) -> Vec<u8> {
    let count = dims.iter().map(|&d| d as usize).product::<usize>();
    let payload: Vec<u8> = (0..count)
        .flat_map(|i| (i as f32).to_le_bytes())
        .collect();
    nifti_bytes(dims, 16, 32, &payload, false, 0.0, 0.0)
}

/// Uncompressed MGH volume of unsigned bytes.
pub fn mgh_bytes(dims: [i32; 3], voxels: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    for v in [1, dims[0], dims[1], dims[2], 1, 0] {
        buf.extend_from_slice(&v.to_be_bytes());
    }
    buf.resize(284, 0);
    buf.extend_from_slice(voxels);
    buf
}

/// Gzip-compress `bytes`, as written by `.nii.gz` and `.mgz` producers.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// NRRD with an inline raw payload.
pub fn nrrd_bytes(header_fields: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = format!("NRRD0004\n# test fixture\n{header_fields}\n").into_bytes();
    buf.extend_from_slice(payload);
    buf
}

/// Engine that returns a fixed-size volume for any source, or fails for
/// names containing `broken`.
pub struct StubEngine {
    pub dims: (usize, usize, usize),
    attached: bool,
}

impl StubEngine {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self {
            dims: (z, y, x),
            attached: false,
        }
    }
}

impl VolumeEngine for StubEngine {
    fn name(&self) -> &str {
        "stub"
    }

    fn attach(&mut self, _surface: &RenderSurface) -> Result<()> {
        self.attached = true;
        Ok(())
    }

    fn load_volume(&mut self, source: &VolumeSource) -> Result<Volume> {
        if !self.attached {
            return Err(ViewerError::Initialization("stub not attached".into()));
        }
        if source.name.contains("broken") {
            return Err(ViewerError::engine_load(&source.name, "stub refuses"));
        }
        let voxels = Array3::from_shape_fn(self.dims, |(z, y, x)| (x + y + z) as f32);
        Ok(Volume::new(source.name.clone(), voxels))
    }
}

pub fn stub_loader(policy: FallbackPolicy) -> MediaLoader {
    let mut loader = MediaLoader::new(Some(Box::new(StubEngine::new(16, 12, 4))), policy);
    loader.attach(&test_surface()).expect("stub should attach");
    loader
}
