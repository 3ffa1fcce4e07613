use crate::consts::{
    MAX_BRIGHTNESS, MAX_CONTRAST, MAX_ZOOM, MIN_BRIGHTNESS, MIN_CONTRAST, MIN_ZOOM, ZOOM_IN_STEP,
    ZOOM_OUT_STEP,
};

/// Pan, zoom and brightness/contrast applied to the displayed media.
///
/// Fields are private so that every mutation goes through a clamping setter:
/// zoom stays in `[0.1, 10.0]`, brightness in `[0.5, 2.0]` and contrast in
/// `[0.5, 3.0]`. Pan is a screen-space offset from the centred position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    zoom_factor: f32,
    pan_x: f32,
    pan_y: f32,
    brightness: f32,
    contrast: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom_factor: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            brightness: 1.0,
            contrast: 1.0,
        }
    }
}

impl ViewportState {
    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    pub fn pan(&self) -> (f32, f32) {
        (self.pan_x, self.pan_y)
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom_factor = clamp_finite(zoom, MIN_ZOOM, MAX_ZOOM, self.zoom_factor);
    }

    /// Multiply the zoom factor by one wheel step. Positive `delta_y`
    /// (scrolling down) zooms out.
    pub fn zoom_by_wheel(&mut self, delta_y: f32) {
        let step = if delta_y > 0.0 { ZOOM_OUT_STEP } else { ZOOM_IN_STEP };
        self.set_zoom(self.zoom_factor * step);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom_factor * ZOOM_IN_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom_factor * ZOOM_OUT_STEP);
    }

    pub fn set_pan(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pan_x = x;
            self.pan_y = y;
        }
    }

    /// Shift the pan offset by a pointer delta in screen pixels.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.set_pan(self.pan_x + dx, self.pan_y + dy);
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = clamp_finite(brightness, MIN_BRIGHTNESS, MAX_BRIGHTNESS, self.brightness);
    }

    pub fn set_contrast(&mut self, contrast: f32) {
        self.contrast = clamp_finite(contrast, MIN_CONTRAST, MAX_CONTRAST, self.contrast);
    }

    /// Restore all five fields to their defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when brightness and contrast leave pixels unchanged.
    pub fn is_neutral_adjustment(&self) -> bool {
        self.brightness == 1.0 && self.contrast == 1.0
    }
}

/// NaN keeps the previous value; everything else is clamped.
fn clamp_finite(value: f32, min: f32, max: f32, previous: f32) -> f32 {
    if value.is_nan() {
        previous
    } else {
        value.clamp(min, max)
    }
}
