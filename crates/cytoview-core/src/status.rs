use crate::consts::DEFAULT_MEDIA_NAME;
use crate::media::{LoadedMedia, RasterImage, VolumeInfo};

/// One-way sink for human-readable viewer state.
pub trait StatusSink {
    /// Overwrite the transient status line.
    fn report(&mut self, message: &str);

    /// Overwrite the persistent media-info line.
    fn set_media_info(&mut self, info: &str);

    /// Overwrite or clear the pointer coordinate read-out.
    fn set_coordinates(&mut self, coords: Option<&str>);
}

/// In-memory status surface. Last write wins; nothing is queued.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusLine {
    pub status: String,
    pub media_info: String,
    pub coordinates: Option<String>,
}

impl StatusSink for StatusLine {
    fn report(&mut self, message: &str) {
        self.status = message.to_string();
    }

    fn set_media_info(&mut self, info: &str) {
        self.media_info = info.to_string();
    }

    fn set_coordinates(&mut self, coords: Option<&str>) {
        self.coordinates = coords.map(str::to_string);
    }
}

/// Message drawn on the canvas in place of media.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CanvasNotice {
    Welcome,
    Loading(String),
    Error(String),
}

impl CanvasNotice {
    /// Lines to draw, headline first.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Welcome => vec![
                "Cervical Cytology AI Viewer".into(),
                "Drag and drop medical images here".into(),
                "or click 'Load Image' button".into(),
                "Supported formats: JPEG, PNG, TIFF, NIfTI, MGH, NRRD".into(),
            ],
            Self::Loading(name) => vec![format!("Loading {name}...")],
            Self::Error(message) => vec![message.clone()],
        }
    }
}

pub const READY_STATUS: &str = "Ready - Drag and drop medical images or click Load Image";

/// `"{name} | {w}×{h}px | Zoom: {p}%"` with `p` the effective scale.
pub fn raster_info(image: &RasterImage, effective_scale: f32) -> String {
    let name = if image.name.is_empty() { DEFAULT_MEDIA_NAME } else { &image.name };
    format!(
        "{} | {}×{}px | Zoom: {}%",
        name,
        image.width(),
        image.height(),
        (effective_scale * 100.0).round() as i64
    )
}

/// `"{name} | {x}×{y}×{z} | Medical Format"`.
pub fn volume_info(info: &VolumeInfo) -> String {
    let name = if info.name.is_empty() { "Medical Image" } else { &info.name };
    format!(
        "{} | {}×{}×{} | Medical Format",
        name, info.dims[0], info.dims[1], info.dims[2]
    )
}

pub fn media_info(media: &LoadedMedia, effective_scale: f32) -> String {
    match media {
        LoadedMedia::Raster(r) => raster_info(r, effective_scale),
        LoadedMedia::Volume(v) => volume_info(&v.info),
    }
}

/// Status text for a zoom change.
pub fn zoom_status(zoom_factor: f32) -> String {
    format!("Zoom: {}%", (zoom_factor * 100.0).round() as i64)
}

/// Coordinate read-out text.
pub fn coordinate_text(x: i64, y: i64) -> String {
    format!("{x}, {y}")
}
