/// Lower bound for the viewport zoom factor.
pub const MIN_ZOOM: f32 = 0.1;

/// Upper bound for the viewport zoom factor.
pub const MAX_ZOOM: f32 = 10.0;

/// Brightness multiplier bounds for the raster path.
pub const MIN_BRIGHTNESS: f32 = 0.5;
pub const MAX_BRIGHTNESS: f32 = 2.0;

/// Contrast multiplier bounds for the raster path.
pub const MIN_CONTRAST: f32 = 0.5;
pub const MAX_CONTRAST: f32 = 3.0;

/// Zoom multiplier applied per wheel notch towards the user (scroll up).
pub const ZOOM_IN_STEP: f32 = 1.1;

/// Zoom multiplier applied per wheel notch away from the user (scroll down).
pub const ZOOM_OUT_STEP: f32 = 0.9;

/// Fraction of the canvas the fitted media may occupy on each axis.
pub const FIT_MARGIN: f32 = 0.8;

/// File suffixes handed to the volume engine. Longer suffixes first so that
/// `.nii.gz` is reported rather than a shorter match.
pub const VOLUMETRIC_EXTENSIONS: &[&str] = &[
    ".nii.gz", ".nii", ".dcm", ".nrrd", ".mgh", ".mgz", ".v16", ".v",
];

/// Name fragments that mark a volume as an overlay layer.
pub const OVERLAY_MARKERS: &[&str] = &["mask", "overlay"];

/// Content-type prefix accepted by the raster path.
pub const RASTER_CONTENT_PREFIX: &str = "image/";

/// Smallest texture side a render surface must offer for the volume engine.
pub const MIN_SURFACE_TEXTURE_SIDE: u32 = 256;

/// Default overlay opacity when none is configured.
pub const DEFAULT_OVERLAY_OPACITY: f32 = 0.5;

/// Default canvas size used by headless rendering.
pub const DEFAULT_CANVAS_WIDTH: u32 = 1280;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 770;

/// Number of mock annotations generated per request.
pub const DEFAULT_ANNOTATION_COUNT: usize = 6;

/// Display name used for media loaded without a file name.
pub const DEFAULT_MEDIA_NAME: &str = "Cervical Cytology Sample";

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-6;
