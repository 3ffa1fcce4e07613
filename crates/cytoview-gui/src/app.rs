use std::sync::mpsc;

use cytoview_core::config::ViewerConfig;
use cytoview_core::dispatch::{FallbackPolicy, LoadOutcome, MediaLoader, MediaSource};
use cytoview_core::engine::{NativeVolumeEngine, RenderSurface};
use cytoview_core::error::ViewerError;
use cytoview_core::viewer::Viewer;
use tracing::{debug, warn};

use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::state::{LocationTarget, MediaTexture, UiState};
use crate::worker;

pub struct CytoviewApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub viewer: Viewer,
    pub ui_state: UiState,
    pub texture: MediaTexture,
    pub policy: FallbackPolicy,
}

impl CytoviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> std::io::Result<Self> {
        let engine = NativeVolumeEngine::new(config.volume_colormap);
        let loader = MediaLoader::new(Some(Box::new(engine)), config.fallback_policy)
            .with_overlay_style(config.overlay.opacity, config.overlay.colormap);

        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(loader, result_tx.clone(), cc.egui_ctx.clone())?;

        let max_side = max_texture_side(cc);
        let surface = RenderSurface::new(config.canvas_width, config.canvas_height, max_side);

        let mut app = Self {
            cmd_tx,
            result_tx,
            result_rx,
            viewer: Viewer::new(&config),
            ui_state: UiState::default(),
            texture: MediaTexture::new(max_side as usize),
            policy: config.fallback_policy,
        };
        app.send_command(WorkerCommand::Attach { surface });
        Ok(app)
    }

    /// Drain all pending results from the worker and file dialogs.
    fn poll_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::Attached { result } => {
                    if let Err(e) = self.viewer.record_attach(result) {
                        warn!(error = %e, "Volume engine unavailable, raster formats only");
                    }
                    self.start_default_load();
                }
                WorkerResult::Loaded {
                    ticket,
                    result,
                    elapsed,
                } => {
                    let outcome = if self.ui_state.pending_default == Some(ticket) {
                        self.ui_state.pending_default = None;
                        self.viewer.finish_default_load(ticket, result)
                    } else {
                        self.viewer.finish_load(ticket, result)
                    };
                    if let Some(LoadOutcome::Stale { ticket }) = outcome {
                        debug!(ticket = ticket.id(), "Dropped superseded load");
                    } else {
                        debug!(elapsed = %format_duration(elapsed), "Load applied");
                    }
                }
                WorkerResult::FilePicked { path, overlay } => {
                    let source = MediaSource::from_path(path);
                    if overlay {
                        self.start_overlay_load(source);
                    } else {
                        self.start_load(source);
                    }
                }
            }
        }
    }

    fn start_default_load(&mut self) {
        if let Some(plan) = self.viewer.begin_default_load() {
            self.ui_state.pending_default = Some(plan.ticket);
            self.send_command(WorkerCommand::Load { plan });
        }
    }

    pub fn start_load(&mut self, source: MediaSource) {
        if let Some(plan) = self.viewer.begin_load(source) {
            self.send_command(WorkerCommand::Load { plan });
        }
    }

    pub fn start_overlay_load(&mut self, source: MediaSource) {
        if let Some(plan) = self.viewer.begin_overlay_load(source) {
            self.send_command(WorkerCommand::Load { plan });
        }
    }

    pub fn load_location(&mut self, target: LocationTarget, location: &str) {
        let overlay = target == LocationTarget::Overlay;
        if let Some(plan) = self.viewer.begin_location_load(location, overlay) {
            self.send_command(WorkerCommand::Load { plan });
        }
    }

    pub fn open_location_dialog(&mut self, target: LocationTarget) {
        self.ui_state.location_dialog = Some(target);
    }

    /// Show the native picker off the UI thread; the choice comes back
    /// through the result channel.
    pub fn pick_file(&self, overlay: bool) {
        let result_tx = self.result_tx.clone();
        std::thread::spawn(move || {
            let dialog = rfd::FileDialog::new();
            let dialog = if overlay {
                dialog.add_filter("Volumes", &["nii", "gz", "mgh", "mgz", "nrrd"])
            } else {
                dialog
                    .add_filter(
                        "Medical images",
                        &[
                            "jpg", "jpeg", "png", "tif", "tiff", "bmp", "nii", "gz", "mgh",
                            "mgz", "nrrd",
                        ],
                    )
                    .add_filter("All files", &["*"])
            };
            if let Some(path) = dialog.pick_file() {
                let _ = result_tx.send(WorkerResult::FilePicked { path, overlay });
            }
        });
    }

    pub fn set_policy(&mut self, policy: FallbackPolicy) {
        self.policy = policy;
        self.send_command(WorkerCommand::SetPolicy { policy });
    }

    /// Hand `cmd` to the load worker. A worker that has gone away is
    /// reported on the status line.
    pub fn send_command(&mut self, cmd: WorkerCommand) {
        if let Err(mpsc::SendError(cmd)) = self.cmd_tx.send(cmd) {
            let action = cmd.describe();
            warn!(%action, "Load worker is gone");
            self.viewer
                .report_error(&ViewerError::LoaderStopped(format!("could not {action}")));
        }
    }

    /// Track drag-hover and open the first dropped file.
    fn handle_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        if hovering != self.ui_state.drop_hover {
            self.ui_state.drop_hover = hovering;
            self.viewer.set_drop_hover(hovering);
        }
        if let Some(source) = dropped.into_iter().next().and_then(dropped_source) {
            self.start_load(source);
        }
    }

    fn show_location_dialog(&mut self, ctx: &egui::Context) {
        let Some(target) = self.ui_state.location_dialog else {
            return;
        };
        let mut open = true;
        let mut submit = false;
        let mut cancel = false;

        egui::Window::new(target.title())
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Path or file:// URL");
                let response = ui.text_edit_singleline(&mut self.ui_state.location_input);
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.horizontal(|ui| {
                    if ui.button("Load").clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if submit {
            self.ui_state.location_dialog = None;
            let location = std::mem::take(&mut self.ui_state.location_input);
            self.load_location(target, &location);
        } else if cancel || !open {
            self.ui_state.location_dialog = None;
        }
    }
}

impl eframe::App for CytoviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();
        self.handle_drops(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::viewport::show(ctx, self);

        self.show_location_dialog(ctx);

        // About dialog
        if self.ui_state.show_about {
            egui::Window::new("About CytoView")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("CytoView");
                        ui.label("Cervical Cytology AI Viewer");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.small("Annotations are mock output, not a diagnosis.");
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.ui_state.show_about = false;
                        }
                    });
                });
        }
    }
}

fn dropped_source(file: egui::DroppedFile) -> Option<MediaSource> {
    if let Some(path) = file.path {
        return Some(MediaSource::from_path(path));
    }
    let bytes = file.bytes?;
    let content_type = (!file.mime.is_empty()).then_some(file.mime);
    Some(MediaSource::Bytes {
        name: file.name,
        bytes,
        content_type,
    })
}

/// Texture limit of the active renderer.
fn max_texture_side(cc: &eframe::CreationContext<'_>) -> u32 {
    cc.wgpu_render_state
        .as_ref()
        .map(|rs| rs.device.limits().max_texture_dimension_2d)
        .unwrap_or_else(|| cc.egui_ctx.input(|i| i.max_texture_side) as u32)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", d.as_millis())
    } else {
        format!("{secs:.1}s")
    }
}
