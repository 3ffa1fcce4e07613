//! 2D canvas compositing for the raster path and headless rendering.

use image::{Rgba, RgbaImage};
use ndarray::Array2;

use crate::annotate::AnnotationMarker;
use crate::media::{Colormap, LoadedMedia, OverlayLayer};
use crate::transform::{compute_placement, image_to_screen, ImagePlacement};
use crate::viewport::ViewportState;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const BORDER: Rgba<u8> = Rgba([0x33, 0x33, 0x33, 255]);

/// Apply the brightness then contrast filter to every colour channel.
///
/// On normalised values: `v' = clamp((v * brightness - 0.5) * contrast + 0.5)`.
/// Alpha is left untouched.
pub fn apply_adjustments(pixels: &RgbaImage, brightness: f32, contrast: f32) -> RgbaImage {
    if brightness == 1.0 && contrast == 1.0 {
        return pixels.clone();
    }
    // 256-entry lookup; every channel shares the same curve.
    let lut: Vec<u8> = (0..=255u8)
        .map(|v| {
            let n = v as f32 / 255.0;
            let adjusted = ((n * brightness - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
            (adjusted * 255.0).round() as u8
        })
        .collect();

    let mut out = pixels.clone();
    for px in out.pixels_mut() {
        let [r, g, b, a] = px.0;
        *px = Rgba([lut[r as usize], lut[g as usize], lut[b as usize], a]);
    }
    out
}

/// Colour a normalised slice with `colormap`, fully opaque.
pub fn slice_to_rgba(slice: &Array2<f32>, colormap: Colormap) -> RgbaImage {
    let (h, w) = slice.dim();
    RgbaImage::from_fn(w as u32, h as u32, |x, y| {
        let [r, g, b] = colormap.apply(slice[[y as usize, x as usize]]);
        Rgba([r, g, b, 255])
    })
}

/// Alpha-blend an overlay slice onto `base`, resampling nearest-neighbour
/// when the sizes differ. Zero-intensity voxels stay transparent.
pub fn blend_overlay(
    base: &mut RgbaImage,
    slice: &Array2<f32>,
    colormap: Colormap,
    opacity: f32,
) {
    let (sh, sw) = slice.dim();
    if sh == 0 || sw == 0 {
        return;
    }
    let (bw, bh) = base.dimensions();
    for (x, y, px) in base.enumerate_pixels_mut() {
        let sx = (x as usize * sw / bw as usize).min(sw - 1);
        let sy = (y as usize * sh / bh as usize).min(sh - 1);
        let v = slice[[sy, sx]];
        if v <= 0.0 {
            continue;
        }
        let alpha = (opacity * v).clamp(0.0, 1.0);
        let over = colormap.apply(v);
        for c in 0..3 {
            let mixed = px.0[c] as f32 * (1.0 - alpha) + over[c] as f32 * alpha;
            px.0[c] = mixed.round() as u8;
        }
    }
}

/// The flat image drawn for the current media: adjusted bitmap for the
/// raster path, middle slice plus overlays for the volumetric path.
pub fn render_media_plane(
    media: &LoadedMedia,
    overlays: &[OverlayLayer],
    viewport: &ViewportState,
) -> RgbaImage {
    match media {
        LoadedMedia::Raster(raster) => {
            apply_adjustments(&raster.pixels, viewport.brightness(), viewport.contrast())
        }
        LoadedMedia::Volume(volume) => {
            let mut plane = slice_to_rgba(&volume.middle_slice(), volume.info.colormap);
            for layer in overlays {
                blend_overlay(
                    &mut plane,
                    &layer.volume.middle_slice(),
                    layer.volume.info.colormap,
                    layer.opacity,
                );
            }
            plane
        }
    }
}

/// Draw `plane` onto a black canvas at `placement`, with a 1-px border and
/// annotation rings.
pub fn compose_frame(
    canvas_width: u32,
    canvas_height: u32,
    plane: &RgbaImage,
    placement: &ImagePlacement,
    annotations: &[AnnotationMarker],
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, BACKGROUND);
    let (pw, ph) = plane.dimensions();
    if pw == 0 || ph == 0 || placement.effective_scale <= 0.0 {
        return canvas;
    }

    let x0 = placement.origin_x.max(0.0).floor() as u32;
    let y0 = placement.origin_y.max(0.0).floor() as u32;
    let x1 = placement.right().min(canvas_width as f32).ceil().max(0.0) as u32;
    let y1 = placement.bottom().min(canvas_height as f32).ceil().max(0.0) as u32;

    for cy in y0..y1.min(canvas_height) {
        let iy = ((cy as f32 + 0.5 - placement.origin_y) / placement.effective_scale).floor();
        if iy < 0.0 || iy >= ph as f32 {
            continue;
        }
        for cx in x0..x1.min(canvas_width) {
            let ix = ((cx as f32 + 0.5 - placement.origin_x) / placement.effective_scale).floor();
            if ix < 0.0 || ix >= pw as f32 {
                continue;
            }
            canvas.put_pixel(cx, cy, *plane.get_pixel(ix as u32, iy as u32));
        }
    }

    draw_border(&mut canvas, placement);
    for marker in annotations {
        draw_marker(&mut canvas, marker, placement);
    }
    canvas
}

/// Place and draw `media` with its overlays and annotations in one call.
pub fn render_frame(
    canvas_width: u32,
    canvas_height: u32,
    media: &LoadedMedia,
    overlays: &[OverlayLayer],
    viewport: &ViewportState,
    annotations: &[AnnotationMarker],
) -> RgbaImage {
    let (w, h) = media.display_size();
    let placement = compute_placement(
        w as f32,
        h as f32,
        canvas_width as f32,
        canvas_height as f32,
        viewport,
        media.fit_mode(),
    );
    let plane = render_media_plane(media, overlays, viewport);
    compose_frame(canvas_width, canvas_height, &plane, &placement, annotations)
}

/// Ring colour for a mock finding.
pub fn marker_color(label: &str) -> [u8; 3] {
    match label {
        "Normal" => [80, 200, 120],
        "ASC-US" => [240, 220, 60],
        "LSIL" => [255, 150, 40],
        _ => [255, 80, 80],
    }
}

fn put_clipped(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_border(canvas: &mut RgbaImage, placement: &ImagePlacement) {
    let left = placement.origin_x.round() as i64;
    let top = placement.origin_y.round() as i64;
    let right = placement.right().round() as i64;
    let bottom = placement.bottom().round() as i64;
    for x in left..=right {
        put_clipped(canvas, x, top, BORDER);
        put_clipped(canvas, x, bottom, BORDER);
    }
    for y in top..=bottom {
        put_clipped(canvas, left, y, BORDER);
        put_clipped(canvas, right, y, BORDER);
    }
}

fn draw_marker(canvas: &mut RgbaImage, marker: &AnnotationMarker, placement: &ImagePlacement) {
    let (cx, cy) = image_to_screen(marker.x, marker.y, placement);
    let r = marker.radius * placement.effective_scale;
    if r < 0.5 {
        return;
    }
    let [red, green, blue] = marker_color(marker.label);
    let color = Rgba([red, green, blue, 255]);
    let steps = ((std::f32::consts::TAU * r).ceil() as usize).max(16);
    for i in 0..steps {
        let t = i as f32 / steps as f32 * std::f32::consts::TAU;
        let x = (cx + r * t.cos()).round() as i64;
        let y = (cy + r * t.sin()).round() as i64;
        put_clipped(canvas, x, y, color);
    }
}
