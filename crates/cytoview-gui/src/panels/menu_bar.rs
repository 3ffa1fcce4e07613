use crate::app::CytoviewApp;
use crate::state::LocationTarget;

pub fn show(ctx: &egui::Context, app: &mut CytoviewApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Load Image...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    app.pick_file(false);
                }

                if ui.button("Load Volume URL...").clicked() {
                    ui.close();
                    app.open_location_dialog(LocationTarget::Volume);
                }

                if ui.button("Load Overlay...").clicked() {
                    ui.close();
                    app.pick_file(true);
                }

                if ui.button("Load Overlay URL...").clicked() {
                    ui.close();
                    app.open_location_dialog(LocationTarget::Overlay);
                }

                ui.separator();

                if ui.button("Close Image").clicked() {
                    ui.close();
                    app.viewer.clear();
                }

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let reset_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Num0);
                if ui.add(egui::Button::new("Reset View").shortcut_text(ctx.format_shortcut(&reset_shortcut))).clicked() {
                    ui.close();
                    app.viewer.reset_view();
                }

                let mut info = app.viewer.info_visible();
                if ui.checkbox(&mut info, "Image Info").clicked() {
                    ui.close();
                    app.viewer.toggle_info();
                }

                ui.separator();

                if ui.button("Mock Annotations").clicked() {
                    ui.close();
                    app.viewer.show_mock_annotations();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.ui_state.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            app.pick_file(false);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Num0))) {
            app.viewer.reset_view();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}
