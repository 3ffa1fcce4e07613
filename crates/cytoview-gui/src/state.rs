use cytoview_core::dispatch::LoadTicket;
use cytoview_core::viewer::Viewer;
use tracing::debug;

use crate::convert::{fit_to_texture_limit, rgba_to_color_image};

/// Where a location typed into the load dialog goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationTarget {
    Volume,
    Overlay,
}

impl LocationTarget {
    pub fn title(self) -> &'static str {
        match self {
            Self::Volume => "Load Volume",
            Self::Overlay => "Load Overlay",
        }
    }
}

/// Widget state that lives only on the UI side.
#[derive(Default)]
pub struct UiState {
    /// Open location dialog, if any.
    pub location_dialog: Option<LocationTarget>,
    pub location_input: String,
    pub show_about: bool,
    /// Ticket of the startup load, so it gets its own status message.
    pub pending_default: Option<LoadTicket>,
    /// Pointer was over the canvas last frame.
    pub canvas_hovered: bool,
    /// Files were dragged over the window last frame.
    pub drop_hover: bool,
}

/// GPU copy of the viewer's media plane, rebuilt when the plane changes.
///
/// Planes larger than the renderer's texture limit are uploaded downscaled;
/// the viewer still places them at their full size.
pub struct MediaTexture {
    pub handle: Option<egui::TextureHandle>,
    revision: Option<u64>,
    max_side: usize,
}

impl MediaTexture {
    pub fn new(max_side: usize) -> Self {
        Self {
            handle: None,
            revision: None,
            max_side,
        }
    }

    pub fn sync(&mut self, ctx: &egui::Context, viewer: &Viewer) {
        if self.revision == Some(viewer.revision()) {
            return;
        }
        self.revision = Some(viewer.revision());
        let limit = self.max_side.min(ctx.input(|i| i.max_texture_side));
        self.handle = viewer.media_plane().map(|plane| {
            let (w, h) = plane.dimensions();
            let plane = fit_to_texture_limit(plane, limit);
            if plane.dimensions() != (w, h) {
                debug!(width = w, height = h, limit, "Media plane downscaled for upload");
            }
            ctx.load_texture(
                "media",
                rgba_to_color_image(&plane),
                egui::TextureOptions::NEAREST,
            )
        });
    }
}
