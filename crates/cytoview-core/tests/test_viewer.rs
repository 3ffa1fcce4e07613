#[allow(dead_code)]
mod common;

use tempfile::TempDir;

use cytoview_core::config::ViewerConfig;
use cytoview_core::dispatch::{FallbackPolicy, LoadOutcome, MediaLoader, MediaSource};
use cytoview_core::engine::{NativeVolumeEngine, RenderSurface};
use cytoview_core::error::ViewerError;
use cytoview_core::input::{PointerButton, PointerEvent};
use cytoview_core::status::{CanvasNotice, READY_STATUS};
use cytoview_core::viewer::Viewer;

fn config(width: u32, height: u32) -> ViewerConfig {
    ViewerConfig {
        canvas_width: width,
        canvas_height: height,
        ..ViewerConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[test]
fn test_new_viewer_shows_welcome() {
    let viewer = Viewer::new(&ViewerConfig::default());
    assert_eq!(viewer.notice(), Some(&CanvasNotice::Welcome));
    assert_eq!(viewer.status().status, READY_STATUS);
    assert!(viewer.placement().is_none());
    assert!(viewer.render().is_none());
}

#[test]
fn test_missing_default_image_keeps_welcome() {
    let cfg = ViewerConfig {
        default_image: Some("does/not/exist.jpg".into()),
        ..ViewerConfig::default()
    };
    let mut viewer = Viewer::new(&cfg);
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    assert!(viewer.load_default(&mut loader).is_none());
    assert_eq!(viewer.notice(), Some(&CanvasNotice::Welcome));
}

#[test]
fn test_default_image_loaded_at_startup() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "test-image.png", &common::png_bytes(16, 16));
    let cfg = ViewerConfig {
        default_image: Some(png),
        ..ViewerConfig::default()
    };
    let mut viewer = Viewer::new(&cfg);
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    assert!(matches!(
        viewer.load_default(&mut loader),
        Some(LoadOutcome::Primary { .. })
    ));
    assert!(viewer.status().status.starts_with("Default image loaded"));
    assert!(viewer.notice().is_none());
}

#[test]
fn test_default_image_yields_to_earlier_user_load() {
    let dir = TempDir::new().unwrap();
    let default_png = common::write_file(&dir, "test-image.png", &common::png_bytes(16, 16));
    let user_png = common::write_file(&dir, "dropped.png", &common::png_bytes(8, 8));
    let cfg = ViewerConfig {
        default_image: Some(default_png),
        ..ViewerConfig::default()
    };
    let mut viewer = Viewer::new(&cfg);
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);

    let user_plan = viewer.begin_load(MediaSource::from_path(&user_png)).unwrap();
    assert!(viewer.begin_default_load().is_none());
    assert!(viewer.load_default(&mut loader).is_none());

    let result = loader.execute(&user_plan);
    assert!(matches!(
        viewer.finish_load(user_plan.ticket, result),
        Some(LoadOutcome::Primary { .. })
    ));
    assert_eq!(
        viewer.dispatcher().primary().map(|m| m.name()),
        Some("dropped.png")
    );
}

#[test]
fn test_attach_failure_enters_reduced_mode() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = MediaLoader::new(
        Some(Box::new(NativeVolumeEngine::default())),
        FallbackPolicy::ReportError,
    );
    assert!(viewer
        .attach(&mut loader, &RenderSurface::new(0, 0, 0))
        .is_err());
    assert!(viewer.is_reduced_capability());
    assert_eq!(
        viewer.status().status,
        "Error: Failed to initialize medical viewer"
    );

    // Bitmaps still load.
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(8, 8));
    assert!(viewer
        .open_source(&mut loader, [MediaSource::from_path(&png)])
        .is_some());
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_raster_load_updates_status_and_info() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(800, 600));
    let mut viewer = Viewer::new(&config(1000, 760));
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);

    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);
    assert_eq!(viewer.status().status, "cells.png loaded successfully");
    assert_eq!(viewer.status().media_info, "cells.png | 800×600px | Zoom: 100%");
    assert!(viewer.notice().is_none());

    let p = viewer.placement().unwrap();
    assert_eq!((p.origin_x, p.origin_y), (100.0, 80.0));
}

#[test]
fn test_only_first_source_is_opened() {
    let dir = TempDir::new().unwrap();
    let a = common::write_file(&dir, "first.png", &common::png_bytes(4, 4));
    let b = common::write_file(&dir, "second.png", &common::png_bytes(4, 4));
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);

    viewer.open_source(
        &mut loader,
        vec![MediaSource::from_path(&a), MediaSource::from_path(&b)],
    );
    let name = viewer.dispatcher().primary().map(|m| m.name().to_string());
    assert_eq!(name.as_deref(), Some("first.png"));
    assert_eq!(viewer.dispatcher().latest_ticket().map(|t| t.id()), Some(1));
}

#[test]
fn test_volume_load_reports_dimensions() {
    let dir = TempDir::new().unwrap();
    let nii = common::write_file(&dir, "brain.nii", &common::ramp_nifti([6, 5, 4]));
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);

    viewer.load_volume_url(&mut loader, &format!("file://{}", nii.display()));
    assert_eq!(viewer.status().media_info, "brain.nii | 6×5×4 | Medical Format");
    assert!(viewer.render().is_some());
}

#[test]
fn test_unsupported_file_reports_error() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    assert!(viewer
        .open_source(&mut loader, [MediaSource::from_path("notes.txt")])
        .is_none());
    assert_eq!(viewer.status().status, "Unsupported file format");
    assert!(matches!(viewer.notice(), Some(CanvasNotice::Error(m)) if m.contains("notes.txt")));
}

#[test]
fn test_stopped_loader_is_reported() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    viewer.report_error(&ViewerError::LoaderStopped("worker thread exited".into()));
    assert_eq!(viewer.status().status, "Error: media loader stopped");
    assert!(matches!(viewer.notice(), Some(CanvasNotice::Error(m)) if m.contains("worker thread exited")));
}

#[test]
fn test_remote_location_rejected() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    assert!(viewer
        .load_volume_url(&mut loader, "https://example.org/scan.nii")
        .is_none());
    assert_eq!(viewer.status().status, "Error loading medical image");
}

#[test]
fn test_overlay_requires_base() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::stub_loader(FallbackPolicy::ReportError);
    assert!(viewer
        .load_overlay_url(&mut loader, "labels.nii")
        .is_none());
    assert_eq!(viewer.status().status, "Load a base image first");
    assert!(viewer.dispatcher().primary().is_none());
}

#[test]
fn test_overlay_url_composites_over_base() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::stub_loader(FallbackPolicy::ReportError);
    viewer.load_volume_url(&mut loader, "scan.dcm");
    let outcome = viewer.load_overlay_url(&mut loader, "labels.nii");
    assert!(matches!(outcome, Some(LoadOutcome::Overlay { layers: 1, .. })));
    assert_eq!(viewer.dispatcher().overlays().len(), 1);
    assert!(viewer.status().status.starts_with("Overlay labels.nii"));
}

#[test]
fn test_retry_as_raster_status() {
    let dir = TempDir::new().unwrap();
    let path = common::write_file(&dir, "slide.v", &common::png_bytes(10, 10));
    let cfg = ViewerConfig {
        fallback_policy: FallbackPolicy::RetryAsRaster,
        ..ViewerConfig::default()
    };
    let mut viewer = Viewer::new(&cfg);
    let mut loader = common::attached_loader(cfg.fallback_policy);
    viewer.open_source(&mut loader, [MediaSource::from_path(&path)]);
    assert_eq!(viewer.status().status, "slide.v loaded (standard format)");
    assert!(viewer.dispatcher().using_fallback());
}

#[test]
fn test_split_load_discards_stale_completion() {
    let dir = TempDir::new().unwrap();
    let a = common::write_file(&dir, "a.png", &common::png_bytes(4, 4));
    let b = common::write_file(&dir, "b.png", &common::png_bytes(4, 4));
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);

    let plan_a = viewer.begin_load(MediaSource::from_path(&a)).unwrap();
    assert_eq!(viewer.notice(), Some(&CanvasNotice::Loading("a.png".into())));
    let plan_b = viewer.begin_load(MediaSource::from_path(&b)).unwrap();

    let done_b = loader.execute(&plan_b);
    viewer.finish_load(plan_b.ticket, done_b);
    let done_a = loader.execute(&plan_a);
    let late = viewer.finish_load(plan_a.ticket, done_a);

    assert!(matches!(late, Some(LoadOutcome::Stale { .. })));
    assert_eq!(viewer.status().status, "b.png loaded successfully");
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

#[test]
fn test_reset_view_restores_viewport_and_clears_annotations() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(50, 40));
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);

    viewer.handle_input(PointerEvent::Wheel { delta_y: -1.0 });
    viewer.set_brightness(1.7);
    viewer.set_contrast(2.2);
    assert_eq!(viewer.show_mock_annotations(), 6);

    viewer.reset_view();
    assert_eq!(viewer.viewport().zoom_factor(), 1.0);
    assert_eq!(viewer.viewport().brightness(), 1.0);
    assert_eq!(viewer.viewport().contrast(), 1.0);
    assert!(viewer.annotations().is_empty());
    assert_eq!(viewer.status().status, "View reset");
}

#[test]
fn test_mock_annotations_need_media() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    assert_eq!(viewer.show_mock_annotations(), 0);
    assert!(viewer.annotations().is_empty());
}

#[test]
fn test_new_media_clears_annotations() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(50, 40));
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);
    viewer.show_mock_annotations();
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);
    assert!(viewer.annotations().is_empty());
}

#[test]
fn test_toggle_info() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    assert!(viewer.info_visible());
    assert!(!viewer.toggle_info());
    assert!(viewer.toggle_info());
}

#[test]
fn test_wheel_updates_zoom_status_and_info() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(800, 600));
    let mut viewer = Viewer::new(&config(1000, 760));
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);

    let effect = viewer.handle_input(PointerEvent::Wheel { delta_y: -1.0 });
    assert!(effect.redraw);
    assert_eq!(viewer.status().status, "Zoom: 110%");
    assert_eq!(viewer.status().media_info, "cells.png | 800×600px | Zoom: 110%");
}

#[test]
fn test_error_notice_dismissed_by_interacting_with_media() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(800, 600));
    let mut viewer = Viewer::new(&config(1000, 760));
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);
    viewer.open_source(&mut loader, [MediaSource::from_path("notes.txt")]);
    assert!(matches!(viewer.notice(), Some(CanvasNotice::Error(_))));

    // Hovering alone keeps the message up.
    viewer.handle_input(PointerEvent::Move { x: 300.0, y: 280.0 });
    assert!(matches!(viewer.notice(), Some(CanvasNotice::Error(_))));

    let effect = viewer.handle_input(PointerEvent::Wheel { delta_y: -1.0 });
    assert!(effect.redraw);
    assert!(viewer.notice().is_none());
    assert_eq!(viewer.dispatcher().primary().map(|m| m.name()), Some("cells.png"));
}

#[test]
fn test_error_notice_without_media_stays() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    viewer.open_source(&mut loader, [MediaSource::from_path("notes.txt")]);
    viewer.zoom_in();
    assert!(matches!(viewer.notice(), Some(CanvasNotice::Error(_))));
}

#[test]
fn test_pointer_readout_and_leave() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(800, 600));
    let mut viewer = Viewer::new(&config(1000, 760));
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);

    viewer.handle_input(PointerEvent::Move { x: 300.0, y: 280.0 });
    assert_eq!(viewer.status().coordinates.as_deref(), Some("200, 200"));

    viewer.handle_input(PointerEvent::Press {
        x: 300.0,
        y: 280.0,
        button: PointerButton::Primary,
    });
    viewer.handle_input(PointerEvent::Move { x: 310.0, y: 280.0 });
    assert_eq!(viewer.viewport().pan(), (10.0, 0.0));

    viewer.handle_input(PointerEvent::Leave);
    assert_eq!(viewer.status().coordinates, None);
}

#[test]
fn test_canvas_resize_refits() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(800, 600));
    let mut viewer = Viewer::new(&config(1000, 760));
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);

    viewer.set_canvas_size(500, 380);
    assert_eq!(viewer.canvas_size(), (500, 380));
    assert_eq!(viewer.status().media_info, "cells.png | 800×600px | Zoom: 50%");
}

#[test]
fn test_drop_hover_status() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    viewer.set_drop_hover(true);
    assert_eq!(viewer.status().status, "Drop image to load");
    viewer.set_drop_hover(false);
    assert_eq!(viewer.status().status, READY_STATUS);
}

#[test]
fn test_clear_returns_to_welcome() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(8, 8));
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);
    viewer.clear();
    assert!(viewer.dispatcher().primary().is_none());
    assert_eq!(viewer.notice(), Some(&CanvasNotice::Welcome));
    assert!(viewer.status().media_info.is_empty());
}

#[test]
fn test_record_attach_from_worker() {
    let mut viewer = Viewer::new(&ViewerConfig::default());
    assert!(viewer.record_attach(Ok(())).is_ok());
    assert_eq!(viewer.status().status, "Medical viewer initialized");
    assert!(!viewer.is_reduced_capability());

    let failed = viewer.record_attach(Err(ViewerError::Initialization("no surface".into())));
    assert!(failed.is_err());
    assert!(viewer.is_reduced_capability());
}

#[test]
fn test_zoom_buttons_report_zoom() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(800, 600));
    let mut viewer = Viewer::new(&config(1000, 760));
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);

    viewer.zoom_out();
    assert_eq!(viewer.status().status, "Zoom: 90%");
    viewer.zoom_in();
    assert_eq!(viewer.status().status, "Zoom: 99%");
}

#[test]
fn test_media_plane_revision_tracks_changes() {
    let dir = TempDir::new().unwrap();
    let png = common::write_file(&dir, "cells.png", &common::png_bytes(8, 6));
    let mut viewer = Viewer::new(&ViewerConfig::default());
    let mut loader = common::attached_loader(FallbackPolicy::ReportError);
    assert!(viewer.media_plane().is_none());

    let start = viewer.revision();
    viewer.open_source(&mut loader, [MediaSource::from_path(&png)]);
    let loaded = viewer.revision();
    assert!(loaded > start);
    assert_eq!(viewer.media_plane().map(|p| p.dimensions()), Some((8, 6)));

    // Pointer motion does not change the plane.
    viewer.handle_input(PointerEvent::Move { x: 1.0, y: 1.0 });
    assert_eq!(viewer.revision(), loaded);

    viewer.set_brightness(1.5);
    assert!(viewer.revision() > loaded);
}
