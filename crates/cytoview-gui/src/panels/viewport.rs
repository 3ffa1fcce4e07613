use cytoview_core::annotate::AnnotationMarker;
use cytoview_core::compose::marker_color;
use cytoview_core::input::{PointerButton, PointerEvent};
use cytoview_core::status::CanvasNotice;
use cytoview_core::transform::{image_to_screen, ImagePlacement};

use crate::app::CytoviewApp;

const BUTTONS: [(egui::PointerButton, PointerButton); 3] = [
    (egui::PointerButton::Primary, PointerButton::Primary),
    (egui::PointerButton::Secondary, PointerButton::Secondary),
    (egui::PointerButton::Middle, PointerButton::Middle),
];

const BORDER_GRAY: u8 = 0x33;

pub fn show(ctx: &egui::Context, app: &mut CytoviewApp) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            app.viewer
                .set_canvas_size(rect.width().max(1.0) as u32, rect.height().max(1.0) as u32);

            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
            route_pointer(ui, &response, app, rect);
            if response.double_clicked() {
                app.viewer.reset_view();
            }

            app.texture.sync(ctx, &app.viewer);

            if let (Some(texture), Some(placement)) =
                (app.texture.handle.as_ref(), app.viewer.placement())
            {
                let img_rect = placement_rect(rect, &placement);
                draw_image(ui, texture.id(), img_rect);
                draw_annotations(ui, rect, &placement, app.viewer.annotations());
            }

            if let Some(notice) = app.viewer.notice() {
                draw_notice(ui, rect, notice);
            }
            if app.ui_state.drop_hover {
                draw_drop_highlight(ui, rect);
            }
        });
}

/// Feed this frame's pointer activity to the viewer in canvas pixels.
fn route_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    app: &mut CytoviewApp,
    rect: egui::Rect,
) {
    let inside = response.contains_pointer();
    let (pos, scroll, moved, pressed, released) = ui.input(|i| {
        (
            i.pointer.interact_pos(),
            i.raw_scroll_delta.y,
            i.pointer.is_moving(),
            BUTTONS
                .iter()
                .find(|(b, _)| i.pointer.button_pressed(*b))
                .map(|(_, ours)| *ours),
            BUTTONS
                .iter()
                .find(|(b, _)| i.pointer.button_released(*b))
                .map(|(_, ours)| *ours),
        )
    });

    if inside {
        // egui scrolls up with positive y; the viewer expects wheel deltas.
        if scroll != 0.0 {
            app.viewer.handle_input(PointerEvent::Wheel { delta_y: -scroll });
        }
        if let Some(local) = pos.map(|p| p - rect.min) {
            if let Some(button) = pressed {
                app.viewer.handle_input(PointerEvent::Press {
                    x: local.x,
                    y: local.y,
                    button,
                });
            }
            if moved {
                app.viewer.handle_input(PointerEvent::Move {
                    x: local.x,
                    y: local.y,
                });
            }
        }
    }
    if let Some(button) = released {
        app.viewer.handle_input(PointerEvent::Release { button });
    }
    if app.ui_state.canvas_hovered && !inside {
        app.viewer.handle_input(PointerEvent::Leave);
    }
    app.ui_state.canvas_hovered = inside;
}

fn placement_rect(canvas: egui::Rect, placement: &ImagePlacement) -> egui::Rect {
    egui::Rect::from_min_size(
        canvas.min + egui::vec2(placement.origin_x, placement.origin_y),
        egui::vec2(placement.display_width, placement.display_height),
    )
}

fn draw_image(ui: &egui::Ui, texture_id: egui::TextureId, img_rect: egui::Rect) {
    ui.painter().image(
        texture_id,
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
    ui.painter().rect_stroke(
        img_rect,
        0.0,
        egui::Stroke::new(1.0, egui::Color32::from_gray(BORDER_GRAY)),
        egui::StrokeKind::Outside,
    );
}

fn draw_annotations(
    ui: &egui::Ui,
    canvas: egui::Rect,
    placement: &ImagePlacement,
    markers: &[AnnotationMarker],
) {
    for marker in markers {
        let (sx, sy) = image_to_screen(marker.x, marker.y, placement);
        let center = canvas.min + egui::vec2(sx, sy);
        let radius = marker.radius * placement.effective_scale;
        let [r, g, b] = marker_color(marker.label);
        let color = egui::Color32::from_rgb(r, g, b);

        ui.painter()
            .circle_stroke(center, radius, egui::Stroke::new(2.0, color));
        ui.painter().text(
            center - egui::vec2(0.0, radius + 4.0),
            egui::Align2::CENTER_BOTTOM,
            marker.caption(),
            egui::FontId::proportional(12.0),
            color,
        );
    }
}

fn draw_notice(ui: &egui::Ui, rect: egui::Rect, notice: &CanvasNotice) {
    let color = match notice {
        CanvasNotice::Error(_) => egui::Color32::from_rgb(255, 110, 110),
        _ => egui::Color32::from_gray(170),
    };
    let lines = notice.lines();
    let line_height = 26.0;
    let top = rect.center().y - line_height * (lines.len() as f32 - 1.0) / 2.0;

    for (i, line) in lines.iter().enumerate() {
        let size = if i == 0 { 20.0 } else { 14.0 };
        ui.painter().text(
            egui::pos2(rect.center().x, top + i as f32 * line_height),
            egui::Align2::CENTER_CENTER,
            line,
            egui::FontId::proportional(size),
            color,
        );
    }
}

fn draw_drop_highlight(ui: &egui::Ui, rect: egui::Rect) {
    let zone = rect.shrink(6.0);
    ui.painter().rect_filled(
        zone,
        8.0,
        egui::Color32::from_rgba_unmultiplied(70, 130, 220, 40),
    );
    ui.painter().rect_stroke(
        zone,
        8.0,
        egui::Stroke::new(2.0, egui::Color32::from_rgb(90, 160, 255)),
        egui::StrokeKind::Inside,
    );
}
