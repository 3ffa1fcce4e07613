use std::path::Path;

use crate::consts::{OVERLAY_MARKERS, RASTER_CONTENT_PREFIX, VOLUMETRIC_EXTENSIONS};

/// Which rendering path a file belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Volumetric,
    Raster,
    Unsupported,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Volumetric => write!(f, "Volumetric"),
            Self::Raster => write!(f, "Raster"),
            Self::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// Classify a file by its name first and its content type second.
///
/// Medical suffixes win over the content type, so `scan.nii.gz` is
/// volumetric even when the platform reports it as `application/gzip`.
pub fn classify(file_name: &str, content_type: Option<&str>) -> MediaKind {
    if volumetric_suffix(file_name).is_some() {
        return MediaKind::Volumetric;
    }
    match content_type {
        Some(ct) if ct.to_ascii_lowercase().starts_with(RASTER_CONTENT_PREFIX) => MediaKind::Raster,
        _ => MediaKind::Unsupported,
    }
}

/// Classify using the content type derived from the file extension.
pub fn classify_name(file_name: &str) -> MediaKind {
    classify(file_name, content_type_for(file_name).as_deref())
}

/// The matching medical suffix, if any (case-insensitive).
pub fn volumetric_suffix(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_ascii_lowercase();
    VOLUMETRIC_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| lower.ends_with(ext))
}

/// True when the name marks a volume as an overlay (`mask` / `overlay`).
pub fn is_overlay_name(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    OVERLAY_MARKERS.iter().any(|m| lower.contains(m))
}

/// MIME type for a file name, from the `image` crate's format table.
pub fn content_type_for(file_name: &str) -> Option<String> {
    image::ImageFormat::from_path(Path::new(file_name))
        .ok()
        .map(|format| format.to_mime_type().to_string())
}
