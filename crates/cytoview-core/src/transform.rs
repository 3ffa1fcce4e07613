use crate::consts::FIT_MARGIN;
use crate::viewport::ViewportState;

/// How the base fit-scale treats media smaller than the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Never scale up beyond 100% (raster path).
    #[default]
    NoUpscale,
    /// Pure fit computation, may scale up (volumetric path).
    Unbounded,
}

/// Screen-space rectangle and scale at which the media is drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImagePlacement {
    pub origin_x: f32,
    pub origin_y: f32,
    pub display_width: f32,
    pub display_height: f32,
    pub effective_scale: f32,
}

impl ImagePlacement {
    pub fn right(&self) -> f32 {
        self.origin_x + self.display_width
    }

    pub fn bottom(&self) -> f32 {
        self.origin_y + self.display_height
    }

    /// Inclusive containment test in screen pixels.
    pub fn contains(&self, screen_x: f32, screen_y: f32) -> bool {
        screen_x >= self.origin_x
            && screen_x <= self.right()
            && screen_y >= self.origin_y
            && screen_y <= self.bottom()
    }
}

/// Scale that fits the media into 80% of the canvas on both axes.
///
/// Zero-sized media or canvas yields 1.0.
pub fn base_fit_scale(
    media_width: f32,
    media_height: f32,
    canvas_width: f32,
    canvas_height: f32,
    mode: FitMode,
) -> f32 {
    if media_width <= 0.0 || media_height <= 0.0 || canvas_width <= 0.0 || canvas_height <= 0.0 {
        return 1.0;
    }
    let scale_x = canvas_width * FIT_MARGIN / media_width;
    let scale_y = canvas_height * FIT_MARGIN / media_height;
    let fit = scale_x.min(scale_y);
    match mode {
        FitMode::NoUpscale => fit.min(1.0),
        FitMode::Unbounded => fit,
    }
}

/// Place media of the given size on the canvas under the current viewport.
pub fn compute_placement(
    media_width: f32,
    media_height: f32,
    canvas_width: f32,
    canvas_height: f32,
    viewport: &ViewportState,
    mode: FitMode,
) -> ImagePlacement {
    let base = base_fit_scale(media_width, media_height, canvas_width, canvas_height, mode);
    let effective_scale = base * viewport.zoom_factor();
    let display_width = media_width * effective_scale;
    let display_height = media_height * effective_scale;
    let (pan_x, pan_y) = viewport.pan();

    ImagePlacement {
        origin_x: pan_x + (canvas_width - display_width) / 2.0,
        origin_y: pan_y + (canvas_height - display_height) / 2.0,
        display_width,
        display_height,
        effective_scale,
    }
}

/// Map a screen point to integer image coordinates, or `None` outside the image.
pub fn screen_to_image(
    screen_x: f32,
    screen_y: f32,
    placement: &ImagePlacement,
) -> Option<(i64, i64)> {
    if !placement.contains(screen_x, screen_y) || placement.effective_scale <= 0.0 {
        return None;
    }
    let x = ((screen_x - placement.origin_x) / placement.effective_scale).round();
    let y = ((screen_y - placement.origin_y) / placement.effective_scale).round();
    Some((x as i64, y as i64))
}

/// Map image coordinates to the screen point they are drawn at.
pub fn image_to_screen(image_x: f32, image_y: f32, placement: &ImagePlacement) -> (f32, f32) {
    (
        placement.origin_x + image_x * placement.effective_scale,
        placement.origin_y + image_y * placement.effective_scale,
    )
}
