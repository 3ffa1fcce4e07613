use crate::app::CytoviewApp;

pub fn show(ctx: &egui::Context, app: &mut CytoviewApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        let status = app.viewer.status();

        if app.viewer.info_visible() && !status.media_info.is_empty() {
            ui.label(egui::RichText::new(&status.media_info).monospace());
            ui.separator();
        }

        // Status line
        ui.horizontal(|ui| {
            ui.label(&status.status);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(ref coords) = status.coordinates {
                    ui.monospace(coords);
                    ui.separator();
                }
                if app.viewer.is_reduced_capability() {
                    ui.small("Raster only");
                    ui.separator();
                }
                if app.viewer.dispatcher().using_fallback() {
                    ui.small("2D");
                } else if app.viewer.dispatcher().has_primary_volume() {
                    ui.small("Volume");
                }
            });
        });

        ui.add_space(2.0);
    });
}
