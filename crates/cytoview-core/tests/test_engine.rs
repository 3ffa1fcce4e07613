#[allow(dead_code)]
mod common;

use approx::assert_relative_eq;
use tempfile::TempDir;

use cytoview_core::engine::{NativeVolumeEngine, RenderSurface, VolumeEngine, VolumeSource};
use cytoview_core::error::ViewerError;
use cytoview_core::media::{Colormap, Volume};

fn load(name: &str, bytes: &[u8]) -> Result<Volume, ViewerError> {
    let dir = TempDir::new().unwrap();
    let path = common::write_file(&dir, name, bytes);
    let mut engine = NativeVolumeEngine::default();
    engine.attach(&common::test_surface()).unwrap();
    engine.load_volume(&VolumeSource {
        name: name.to_string(),
        path,
    })
}

// ---------------------------------------------------------------------------
// Attach
// ---------------------------------------------------------------------------

#[test]
fn test_attach_rejects_small_texture_limit() {
    let mut engine = NativeVolumeEngine::default();
    assert!(engine.attach(&RenderSurface::new(640, 480, 255)).is_err());
    assert!(!engine.is_attached());
    assert!(engine.attach(&RenderSurface::new(640, 480, 256)).is_ok());
    assert!(engine.is_attached());
}

#[test]
fn test_load_before_attach_fails() {
    let mut engine = NativeVolumeEngine::default();
    let err = engine
        .load_volume(&VolumeSource {
            name: "scan.nii".into(),
            path: "scan.nii".into(),
        })
        .unwrap_err();
    assert!(matches!(err, ViewerError::Initialization(_)));
}

// ---------------------------------------------------------------------------
// NIfTI-1
// ---------------------------------------------------------------------------

#[test]
fn test_nifti_float_little_endian() {
    let volume = load("ramp.nii", &common::ramp_nifti([4, 3, 2])).unwrap();
    assert_eq!(volume.info.dims, [4, 3, 2]);
    assert_eq!(volume.voxels.dim(), (2, 3, 4));
    // x varies fastest
    assert_relative_eq!(volume.voxels[[0, 0, 1]], 1.0);
    assert_relative_eq!(volume.voxels[[0, 1, 0]], 4.0);
    assert_relative_eq!(volume.voxels[[1, 0, 0]], 12.0);
}

#[test]
fn test_nifti_big_endian_i16_with_scaling() {
    let payload: Vec<u8> = [10i16, -20, 30, 40, 50, 60, 70, 80]
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect();
    let bytes = common::nifti_bytes([2, 2, 2], 4, 16, &payload, true, 2.0, 1.0);
    let volume = load("be.nii", &bytes).unwrap();
    assert_relative_eq!(volume.voxels[[0, 0, 0]], 21.0);
    assert_relative_eq!(volume.voxels[[0, 0, 1]], -39.0);
    assert_relative_eq!(volume.voxels[[1, 1, 1]], 161.0);
}

#[test]
fn test_nifti_zero_slope_means_unscaled() {
    let payload = [7u8, 8, 9, 10];
    let bytes = common::nifti_bytes([2, 2, 1], 2, 8, &payload, false, 0.0, 100.0);
    let volume = load("u8.nii", &bytes).unwrap();
    assert_relative_eq!(volume.voxels[[0, 1, 1]], 10.0);
}

#[test]
fn test_nifti_truncated_payload() {
    let bytes = common::nifti_bytes([8, 8, 8], 16, 32, &[0u8; 16], false, 0.0, 0.0);
    let err = load("short.nii", &bytes).unwrap_err();
    assert!(matches!(err, ViewerError::EngineLoad { .. }));
    assert!(err.to_string().contains("truncated"));
}

#[test]
fn test_nifti_bad_magic() {
    let mut bytes = common::ramp_nifti([2, 2, 2]);
    bytes[344..348].copy_from_slice(b"ni1\0");
    let err = load("pair.nii", &bytes).unwrap_err();
    assert!(err.to_string().contains("pairs"));
}

#[test]
fn test_nifti_unknown_datatype() {
    let bytes = common::nifti_bytes([1, 1, 1], 1, 1, &[0u8; 4], false, 0.0, 0.0);
    let err = load("bits.nii", &bytes).unwrap_err();
    assert!(err.to_string().contains("datatype"));
}

#[test]
fn test_tiny_file_is_engine_failure() {
    let err = load("tiny.nii", &[0u8; 10]).unwrap_err();
    assert!(matches!(err, ViewerError::EngineLoad { .. }));
}

// ---------------------------------------------------------------------------
// MGH
// ---------------------------------------------------------------------------

#[test]
fn test_mgh_uchar() {
    let voxels: Vec<u8> = (0..24).collect();
    let volume = load("brain.mgh", &common::mgh_bytes([4, 3, 2], &voxels)).unwrap();
    assert_eq!(volume.info.dims, [4, 3, 2]);
    assert_relative_eq!(volume.voxels[[1, 2, 3]], 23.0);
}

#[test]
fn test_mgh_wrong_version() {
    let mut bytes = common::mgh_bytes([1, 1, 1], &[0]);
    bytes[0..4].copy_from_slice(&2i32.to_be_bytes());
    let err = load("v2.mgh", &bytes).unwrap_err();
    assert!(err.to_string().contains("version"));
}

#[test]
fn test_mgh_oversized_dims_rejected() {
    let bytes = common::mgh_bytes([i32::MAX; 3], &[0; 16]);
    let err = load("huge.mgh", &bytes).unwrap_err();
    assert!(matches!(err, ViewerError::EngineLoad { .. }));
    assert!(err.to_string().contains("too large"));
}

// ---------------------------------------------------------------------------
// NRRD
// ---------------------------------------------------------------------------

#[test]
fn test_nrrd_raw_short() {
    let payload: Vec<u8> = (0..8i16).flat_map(|v| (v * 100).to_le_bytes()).collect();
    let bytes = common::nrrd_bytes(
        "type: short\ndimension: 3\nsizes: 2 2 2\nendian: little\nencoding: raw\n",
        &payload,
    );
    let volume = load("seg.nrrd", &bytes).unwrap();
    assert_eq!(volume.info.dims, [2, 2, 2]);
    assert_relative_eq!(volume.voxels[[1, 1, 1]], 700.0);
}

#[test]
fn test_nrrd_gzip_encoding_inflated() {
    let bytes = common::nrrd_bytes(
        "type: uchar\ndimension: 3\nsizes: 2 1 1\nencoding: gzip\n",
        &common::gzip(&[7, 9]),
    );
    let volume = load("zipped.nrrd", &bytes).unwrap();
    assert_eq!(volume.info.dims, [2, 1, 1]);
    assert_relative_eq!(volume.voxels[[0, 0, 1]], 9.0);
}

#[test]
fn test_nrrd_unknown_encoding_rejected() {
    let bytes = common::nrrd_bytes(
        "type: uchar\ndimension: 3\nsizes: 1 1 1\nencoding: bzip2\n",
        &[0],
    );
    let err = load("packed.nrrd", &bytes).unwrap_err();
    assert!(err.to_string().contains("encoding"));
}

#[test]
fn test_nrrd_oversized_sizes_rejected() {
    let bytes = common::nrrd_bytes(
        "type: uchar\ndimension: 3\nsizes: 4294967296 4294967296 4294967296\nencoding: raw\n",
        &[0; 8],
    );
    let err = load("huge.nrrd", &bytes).unwrap_err();
    assert!(matches!(err, ViewerError::EngineLoad { .. }));
    assert!(err.to_string().contains("too large"));
}

#[test]
fn test_nrrd_2d_rejected() {
    let bytes = common::nrrd_bytes(
        "type: uchar\ndimension: 2\nsizes: 2 2\nencoding: raw\n",
        &[0, 1, 2, 3],
    );
    assert!(load("flat.nrrd", &bytes).is_err());
}

// ---------------------------------------------------------------------------
// Other formats
// ---------------------------------------------------------------------------

#[test]
fn test_gzipped_nifti_loads() {
    let bytes = common::gzip(&common::ramp_nifti([2, 2, 2]));
    let volume = load("scan.nii.gz", &bytes).unwrap();
    assert_eq!(volume.info.dims, [2, 2, 2]);
    assert_relative_eq!(volume.voxels[[1, 1, 1]], 7.0);
}

#[test]
fn test_mgz_loads() {
    let bytes = common::gzip(&common::mgh_bytes([2, 1, 1], &[3, 5]));
    let volume = load("brain.MGZ", &bytes).unwrap();
    assert_eq!(volume.info.dims, [2, 1, 1]);
    assert_relative_eq!(volume.voxels[[0, 0, 1]], 5.0);
}

#[test]
fn test_corrupt_gzip_rejected() {
    for name in ["scan.nii.gz", "brain.mgz"] {
        let err = load(name, &[0u8; 512]).unwrap_err();
        assert!(matches!(err, ViewerError::EngineLoad { .. }), "{name}");
        assert!(err.to_string().contains("gzip"), "{name}: {err}");
    }
}

#[test]
fn test_foreign_formats_rejected() {
    for name in ["slice.dcm", "pet.v16", "pet.v"] {
        let err = load(name, &[0u8; 512]).unwrap_err();
        assert!(
            matches!(err, ViewerError::EngineLoad { .. }),
            "{name} should fail to load"
        );
    }
}

// ---------------------------------------------------------------------------
// Slices
// ---------------------------------------------------------------------------

#[test]
fn test_middle_slice_is_normalised() {
    let volume = load("ramp.nii", &common::ramp_nifti([4, 3, 3])).unwrap();
    let slice = volume.middle_slice();
    assert_eq!(slice.dim(), (3, 4));
    // Voxels 12..=23 out of 0..=35
    assert_relative_eq!(slice[[0, 0]], 12.0 / 35.0, epsilon = 1e-6);
    assert_relative_eq!(slice[[2, 3]], 23.0 / 35.0, epsilon = 1e-6);
}

#[test]
fn test_slice_index_clamped() {
    let volume = load("ramp.nii", &common::ramp_nifti([2, 2, 2])).unwrap();
    let last = volume.axial_slice(1);
    let beyond = volume.axial_slice(99);
    assert_eq!(last, beyond);
}

#[test]
fn test_engine_applies_configured_colormap() {
    let dir = TempDir::new().unwrap();
    let path = common::write_file(&dir, "hot.nii", &common::ramp_nifti([2, 2, 2]));
    let mut engine = NativeVolumeEngine::new(Colormap::Hot);
    engine.attach(&common::test_surface()).unwrap();
    let volume = engine
        .load_volume(&VolumeSource {
            name: "hot.nii".into(),
            path,
        })
        .unwrap();
    assert_eq!(volume.info.colormap, Colormap::Hot);
}
