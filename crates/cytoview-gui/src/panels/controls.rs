use cytoview_core::consts::{MAX_BRIGHTNESS, MAX_CONTRAST, MIN_BRIGHTNESS, MIN_CONTRAST};
use cytoview_core::dispatch::FallbackPolicy;

use crate::app::CytoviewApp;
use crate::panels::section_header;
use crate::state::LocationTarget;

const LEFT_PANEL_WIDTH: f32 = 220.0;

const POLICIES: [FallbackPolicy; 2] = [FallbackPolicy::ReportError, FallbackPolicy::RetryAsRaster];

pub fn show(ctx: &egui::Context, app: &mut CytoviewApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                file_section(ui, app);
                ui.separator();
                view_section(ui, app);
                ui.separator();
                adjust_section(ui, app);
                ui.separator();
                analysis_section(ui, app);
                ui.separator();
                loading_section(ui, app);
            });
        });
}

fn file_section(ui: &mut egui::Ui, app: &mut CytoviewApp) {
    section_header(ui, "File", None);
    ui.add_space(4.0);

    if ui.button("Load Image...").clicked() {
        app.pick_file(false);
    }
    if ui.button("Load Volume URL...").clicked() {
        app.open_location_dialog(LocationTarget::Volume);
    }

    let can_overlay = app.viewer.dispatcher().has_primary_volume();
    if ui
        .add_enabled(can_overlay, egui::Button::new("Load Overlay..."))
        .on_disabled_hover_text("Load a base volume first")
        .clicked()
    {
        app.pick_file(true);
    }
}

fn view_section(ui: &mut egui::Ui, app: &mut CytoviewApp) {
    let zoom = format!("{:.0}%", app.viewer.viewport().zoom_factor() * 100.0);
    section_header(ui, "View", Some(&zoom));
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        if ui.button("-").on_hover_text("Zoom out").clicked() {
            app.viewer.zoom_out();
        }
        if ui.button("+").on_hover_text("Zoom in").clicked() {
            app.viewer.zoom_in();
        }
        if ui.button("Reset View").clicked() {
            app.viewer.reset_view();
        }
    });

    let mut info = app.viewer.info_visible();
    if ui.checkbox(&mut info, "Show image info").changed() {
        app.viewer.toggle_info();
    }
}

fn adjust_section(ui: &mut egui::Ui, app: &mut CytoviewApp) {
    let raster = app.viewer.dispatcher().using_fallback();
    section_header(ui, "Adjustments", (!raster).then_some("2D images"));
    ui.add_space(4.0);

    let mut brightness = app.viewer.viewport().brightness();
    if ui
        .add_enabled(
            raster,
            egui::Slider::new(&mut brightness, MIN_BRIGHTNESS..=MAX_BRIGHTNESS)
                .text("Brightness")
                .fixed_decimals(2),
        )
        .changed()
    {
        app.viewer.set_brightness(brightness);
    }

    let mut contrast = app.viewer.viewport().contrast();
    if ui
        .add_enabled(
            raster,
            egui::Slider::new(&mut contrast, MIN_CONTRAST..=MAX_CONTRAST)
                .text("Contrast")
                .fixed_decimals(2),
        )
        .changed()
    {
        app.viewer.set_contrast(contrast);
    }
}

fn analysis_section(ui: &mut egui::Ui, app: &mut CytoviewApp) {
    let count = app.viewer.annotations().len();
    let status = (count > 0).then(|| format!("{count} shown"));
    section_header(ui, "AI Analysis", status.as_deref());
    ui.add_space(4.0);

    if ui.button("Mock Annotations").clicked() {
        app.viewer.show_mock_annotations();
    }
    ui.small("Mock output, not a diagnosis.");
}

fn loading_section(ui: &mut egui::Ui, app: &mut CytoviewApp) {
    section_header(ui, "Loading", None);
    ui.add_space(4.0);

    let mut policy = app.policy;
    egui::ComboBox::from_label("On volume failure")
        .selected_text(policy.to_string())
        .show_ui(ui, |ui| {
            for choice in POLICIES {
                ui.selectable_value(&mut policy, choice, choice.to_string());
            }
        });
    if policy != app.policy {
        app.set_policy(policy);
    }
}
