use crate::status::{coordinate_text, zoom_status};
use crate::transform::{screen_to_image, ImagePlacement};
use crate::viewport::ViewportState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Raw pointer input in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Wheel { delta_y: f32 },
    Press { x: f32, y: f32, button: PointerButton },
    Move { x: f32, y: f32 },
    Release { button: PointerButton },
    Leave,
}

/// Coordinate read-out change requested by an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoordinateReadout {
    Unchanged,
    Show(String),
    Clear,
}

/// What the caller should do after routing an event.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEffect {
    pub redraw: bool,
    pub status: Option<String>,
    pub coordinates: CoordinateReadout,
}

impl InputEffect {
    fn none() -> Self {
        Self {
            redraw: false,
            status: None,
            coordinates: CoordinateReadout::Unchanged,
        }
    }
}

/// Turns pointer events into viewport mutations.
///
/// Pan is applied in screen pixels, so a drag moves the image by the same
/// distance at every zoom level.
#[derive(Clone, Debug, Default)]
pub struct InputRouter {
    drag_origin: Option<(f32, f32)>,
}

impl InputRouter {
    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Route one event. `place` computes the media placement for a viewport
    /// and is used for the coordinate read-out; it returns `None` when
    /// nothing is loaded.
    pub fn handle<F>(
        &mut self,
        event: PointerEvent,
        viewport: &mut ViewportState,
        place: F,
    ) -> InputEffect
    where
        F: Fn(&ViewportState) -> Option<ImagePlacement>,
    {
        match event {
            PointerEvent::Wheel { delta_y } => {
                if delta_y == 0.0 {
                    return InputEffect::none();
                }
                viewport.zoom_by_wheel(delta_y);
                InputEffect {
                    redraw: true,
                    status: Some(zoom_status(viewport.zoom_factor())),
                    coordinates: CoordinateReadout::Unchanged,
                }
            }
            PointerEvent::Press { x, y, button } => {
                if button == PointerButton::Primary {
                    self.drag_origin = Some((x, y));
                }
                InputEffect::none()
            }
            PointerEvent::Move { x, y } => {
                let mut effect = InputEffect::none();
                if let Some((last_x, last_y)) = self.drag_origin {
                    viewport.pan_by(x - last_x, y - last_y);
                    self.drag_origin = Some((x, y));
                    effect.redraw = true;
                }
                // Read back against the placement after this event's pan.
                effect.coordinates = match place(viewport) {
                    Some(p) => match screen_to_image(x, y, &p) {
                        Some((ix, iy)) => CoordinateReadout::Show(coordinate_text(ix, iy)),
                        None => CoordinateReadout::Clear,
                    },
                    None => CoordinateReadout::Unchanged,
                };
                effect
            }
            PointerEvent::Release { button } => {
                if button == PointerButton::Primary {
                    self.drag_origin = None;
                }
                InputEffect::none()
            }
            PointerEvent::Leave => {
                self.drag_origin = None;
                InputEffect {
                    redraw: false,
                    status: None,
                    coordinates: CoordinateReadout::Clear,
                }
            }
        }
    }
}
