//! The viewer session: one explicit owner for everything the controls touch.

use std::path::PathBuf;

use image::RgbaImage;
use tracing::{info, warn};

use crate::annotate::{mock_annotations, AnnotationMarker};
use crate::compose::{render_frame, render_media_plane};
use crate::config::ViewerConfig;
use crate::dispatch::{
    LoadOutcome, LoadPlan, LoadTicket, LoadedPayload, MediaLoader, MediaSource, RenderDispatcher,
};
use crate::engine::RenderSurface;
use crate::error::{Result, ViewerError};
use crate::input::{CoordinateReadout, InputEffect, InputRouter, PointerEvent};
use crate::status::{
    media_info, zoom_status, CanvasNotice, StatusLine, StatusSink, READY_STATUS,
};
use crate::transform::{compute_placement, ImagePlacement};
use crate::viewport::ViewportState;

/// Viewer state plus the control entry points.
///
/// Loads can run synchronously through [`open_source`](Self::open_source)
/// and friends, or be split with [`begin_load`](Self::begin_load) /
/// [`finish_load`](Self::finish_load) when the I/O runs elsewhere.
#[derive(Debug)]
pub struct Viewer {
    viewport: ViewportState,
    dispatcher: RenderDispatcher,
    status: StatusLine,
    router: InputRouter,
    annotations: Vec<AnnotationMarker>,
    canvas_width: u32,
    canvas_height: u32,
    info_visible: bool,
    notice: Option<CanvasNotice>,
    reduced_capability: bool,
    annotation_count: usize,
    annotation_rounds: u64,
    default_image: Option<PathBuf>,
    /// Bumped whenever the media plane would render differently.
    revision: u64,
}

impl Viewer {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut status = StatusLine::default();
        status.report(READY_STATUS);
        Self {
            viewport: ViewportState::default(),
            dispatcher: RenderDispatcher::new(config.discard_stale_loads),
            status,
            router: InputRouter::default(),
            annotations: Vec::new(),
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            info_visible: true,
            notice: Some(CanvasNotice::Welcome),
            reduced_capability: false,
            annotation_count: config.annotation_count,
            annotation_rounds: 0,
            default_image: config.default_image.clone(),
            revision: 0,
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn dispatcher(&self) -> &RenderDispatcher {
        &self.dispatcher
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn annotations(&self) -> &[AnnotationMarker] {
        &self.annotations
    }

    pub fn notice(&self) -> Option<&CanvasNotice> {
        self.notice.as_ref()
    }

    pub fn info_visible(&self) -> bool {
        self.info_visible
    }

    /// True once the volume engine failed to attach.
    pub fn is_reduced_capability(&self) -> bool {
        self.reduced_capability
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Attach the loader's engine to `surface`. A failure leaves the viewer
    /// usable in raster-only mode and is returned for reporting.
    pub fn attach(&mut self, loader: &mut MediaLoader, surface: &RenderSurface) -> Result<()> {
        self.record_attach(loader.attach(surface))
    }

    /// Record the outcome of an engine attach that ran elsewhere.
    pub fn record_attach(&mut self, attached: Result<()>) -> Result<()> {
        match attached {
            Ok(()) => {
                self.reduced_capability = false;
                self.status.report("Medical viewer initialized");
                Ok(())
            }
            Err(e) => {
                self.reduced_capability = true;
                self.status.report(e.status_text());
                Err(e)
            }
        }
    }

    /// Open the first of `sources`; the rest are ignored.
    pub fn open_source(
        &mut self,
        loader: &mut MediaLoader,
        sources: impl IntoIterator<Item = MediaSource>,
    ) -> Option<LoadOutcome> {
        let source = sources.into_iter().next()?;
        let plan = self.begin_load(source)?;
        let result = loader.execute(&plan);
        self.finish_load(plan.ticket, result)
    }

    /// Load a volume from a path or `file://` URL.
    pub fn load_volume_url(
        &mut self,
        loader: &mut MediaLoader,
        location: &str,
    ) -> Option<LoadOutcome> {
        let plan = self.begin_location_load(location, false)?;
        let result = loader.execute(&plan);
        self.finish_load(plan.ticket, result)
    }

    /// Load a volume from a path or `file://` URL and composite it over
    /// the primary volume.
    pub fn load_overlay_url(
        &mut self,
        loader: &mut MediaLoader,
        location: &str,
    ) -> Option<LoadOutcome> {
        let plan = self.begin_location_load(location, true)?;
        let result = loader.execute(&plan);
        self.finish_load(plan.ticket, result)
    }

    /// Resolve `location` and plan its load, as a primary or an overlay.
    pub fn begin_location_load(&mut self, location: &str, overlay: bool) -> Option<LoadPlan> {
        let source = self.resolve_location(location)?;
        if overlay {
            self.begin_overlay_load(source)
        } else {
            self.begin_load(source)
        }
    }

    /// Load `default_image` from the config if it exists on disk. Otherwise
    /// the welcome notice stays up.
    pub fn load_default(&mut self, loader: &mut MediaLoader) -> Option<LoadOutcome> {
        let plan = self.begin_default_load()?;
        let result = loader.execute(&plan);
        self.finish_default_load(plan.ticket, result)
    }

    /// [`finish_load`](Self::finish_load) for the startup image.
    pub fn finish_default_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedPayload>,
    ) -> Option<LoadOutcome> {
        let outcome = self.finish_load(ticket, result);
        if matches!(outcome, Some(LoadOutcome::Primary { .. })) {
            self.status
                .report("Default image loaded - Try dragging and dropping your own!");
        }
        outcome
    }

    /// Plan the startup image unless a load was already requested; a file
    /// the user opened early must not be replaced by it.
    pub fn begin_default_load(&mut self) -> Option<LoadPlan> {
        if self.dispatcher.latest_ticket().is_some() {
            info!("Skipping default image, a load is already under way");
            return None;
        }
        let source = self.default_source()?;
        self.begin_load(source)
    }

    /// The configured startup media, if it exists.
    pub fn default_source(&self) -> Option<MediaSource> {
        match &self.default_image {
            Some(path) if path.is_file() => Some(MediaSource::from_path(path.clone())),
            Some(path) => {
                info!(path = %path.display(), "No default image found");
                None
            }
            None => None,
        }
    }

    /// Plan a load and show the loading notice. Rejections are reported
    /// here and yield `None`.
    pub fn begin_load(&mut self, source: MediaSource) -> Option<LoadPlan> {
        let planned = self.dispatcher.plan(source);
        self.start(planned)
    }

    pub fn begin_overlay_load(&mut self, source: MediaSource) -> Option<LoadPlan> {
        let planned = self.dispatcher.plan_overlay(source);
        self.start(planned)
    }

    fn start(&mut self, planned: Result<LoadPlan>) -> Option<LoadPlan> {
        match planned {
            Ok(plan) => {
                self.status.report(&format!("Loading {}...", plan.name));
                if self.dispatcher.primary().is_none() || !plan.overlay {
                    self.notice = Some(CanvasNotice::Loading(plan.name.clone()));
                }
                Some(plan)
            }
            Err(e) => {
                self.report_error(&e);
                None
            }
        }
    }

    /// Commit a finished load and update status, notice and annotations.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedPayload>,
    ) -> Option<LoadOutcome> {
        let outcome = match self.dispatcher.apply(ticket, result) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_error(&e);
                return None;
            }
        };

        match &outcome {
            LoadOutcome::Primary {
                name,
                retried_as_raster,
                ..
            } => {
                self.viewport.reset();
                self.annotations.clear();
                self.notice = None;
                self.revision += 1;
                if *retried_as_raster {
                    self.status
                        .report(&format!("{name} loaded (standard format)"));
                } else {
                    self.status.report(&format!("{name} loaded successfully"));
                }
                self.refresh_media_info();
                info!(name = %name, "Media loaded");
            }
            LoadOutcome::Overlay { name, layers } => {
                self.notice = None;
                self.revision += 1;
                self.status
                    .report(&format!("Overlay {name} added ({layers} layers)"));
                info!(name = %name, layers, "Overlay added");
            }
            LoadOutcome::Stale { .. } => {}
        }
        Some(outcome)
    }

    fn resolve_location(&mut self, location: &str) -> Option<MediaSource> {
        match MediaSource::from_location(location) {
            Ok(source) => Some(source),
            Err(reason) => {
                self.report_error(&ViewerError::engine_load(location, reason));
                None
            }
        }
    }

    /// Show `error` on the status line and the canvas.
    pub fn report_error(&mut self, error: &ViewerError) {
        warn!(error = %error, "Load failed");
        self.status.report(error.status_text());
        self.notice = Some(CanvasNotice::Error(error.to_string()));
    }

    /// Back to the default viewport; clears annotations.
    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.dismiss_error_notice();
        self.revision += 1;
        self.annotations.clear();
        self.status.report("View reset");
        self.refresh_media_info();
    }

    /// Flip the media-info panel. Returns the new visibility.
    pub fn toggle_info(&mut self) -> bool {
        self.info_visible = !self.info_visible;
        self.info_visible
    }

    /// Scatter mock findings over the primary media. Each call draws a new
    /// reproducible set. Returns the number of markers shown.
    pub fn show_mock_annotations(&mut self) -> usize {
        let Some(media) = self.dispatcher.primary() else {
            self.status.report("Load an image first");
            return 0;
        };
        let (w, h) = media.display_size();
        self.annotation_rounds += 1;
        self.annotations = mock_annotations(w, h, self.annotation_count, self.annotation_rounds);
        self.status.report(&format!(
            "{} mock annotations (not a diagnosis)",
            self.annotations.len()
        ));
        self.annotations.len()
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.viewport.set_brightness(brightness);
        self.revision += 1;
    }

    pub fn set_contrast(&mut self, contrast: f32) {
        self.viewport.set_contrast(contrast);
        self.revision += 1;
    }

    /// Zoom one step in, as a wheel notch towards the user would.
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.after_zoom();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.after_zoom();
    }

    fn after_zoom(&mut self) {
        self.dismiss_error_notice();
        self.status.report(&zoom_status(self.viewport.zoom_factor()));
        self.refresh_media_info();
    }

    /// Drag-hover feedback for the drop zone.
    pub fn set_drop_hover(&mut self, hovering: bool) {
        if hovering {
            self.status.report("Drop image to load");
        } else if self.dispatcher.primary().is_none() {
            self.status.report(READY_STATUS);
        }
    }

    /// Route a pointer event and mirror its effect into the status line.
    pub fn handle_input(&mut self, event: PointerEvent) -> InputEffect {
        let media = self.dispatcher.primary();
        let (cw, ch) = (self.canvas_width as f32, self.canvas_height as f32);
        let effect = self.router.handle(event, &mut self.viewport, |viewport| {
            media.map(|m| {
                let (w, h) = m.display_size();
                compute_placement(w as f32, h as f32, cw, ch, viewport, m.fit_mode())
            })
        });

        if let Some(message) = &effect.status {
            self.status.report(message);
        }
        match &effect.coordinates {
            CoordinateReadout::Show(text) => self.status.set_coordinates(Some(text)),
            CoordinateReadout::Clear => self.status.set_coordinates(None),
            CoordinateReadout::Unchanged => {}
        }
        if effect.redraw {
            self.dismiss_error_notice();
            self.refresh_media_info();
        }
        effect
    }

    /// A failed load leaves the previous media on screen; its error notice
    /// goes away once the user works with that media again.
    fn dismiss_error_notice(&mut self) {
        if self.dispatcher.primary().is_some()
            && matches!(self.notice, Some(CanvasNotice::Error(_)))
        {
            self.notice = None;
        }
    }

    /// Where the primary media is drawn this frame.
    pub fn placement(&self) -> Option<ImagePlacement> {
        let media = self.dispatcher.primary()?;
        let (w, h) = media.display_size();
        Some(compute_placement(
            w as f32,
            h as f32,
            self.canvas_width as f32,
            self.canvas_height as f32,
            &self.viewport,
            media.fit_mode(),
        ))
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        if (width, height) == (self.canvas_width, self.canvas_height) {
            return;
        }
        self.canvas_width = width;
        self.canvas_height = height;
        self.refresh_media_info();
    }

    /// Headless rendering of the current frame.
    pub fn render(&self) -> Option<RgbaImage> {
        let media = self.dispatcher.primary()?;
        Some(render_frame(
            self.canvas_width,
            self.canvas_height,
            media,
            self.dispatcher.overlays(),
            &self.viewport,
            &self.annotations,
        ))
    }

    /// The media as drawn before placement: adjusted bitmap or middle slice
    /// with overlays. Cache it against [`revision`](Self::revision).
    pub fn media_plane(&self) -> Option<RgbaImage> {
        let media = self.dispatcher.primary()?;
        Some(render_media_plane(
            media,
            self.dispatcher.overlays(),
            &self.viewport,
        ))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drop all media and return to the welcome screen.
    pub fn clear(&mut self) {
        self.revision += 1;
        self.dispatcher.clear();
        self.annotations.clear();
        self.viewport.reset();
        self.notice = Some(CanvasNotice::Welcome);
        self.status.report(READY_STATUS);
        self.status.set_media_info("");
        self.status.set_coordinates(None);
    }

    fn refresh_media_info(&mut self) {
        let scale = self.placement().map_or(1.0, |p| p.effective_scale);
        if let Some(media) = self.dispatcher.primary() {
            let text = media_info(media, scale);
            self.status.set_media_info(&text);
        }
    }
}
