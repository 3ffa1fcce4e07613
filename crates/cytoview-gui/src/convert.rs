use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Convert a composited RGBA plane to an egui ColorImage.
pub fn rgba_to_color_image(image: &RgbaImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

/// Shrink `plane` so neither edge exceeds `max_side`, keeping its aspect
/// ratio. Planes that already fit are returned as is.
pub fn fit_to_texture_limit(plane: RgbaImage, max_side: usize) -> RgbaImage {
    let (w, h) = plane.dimensions();
    let longest = w.max(h) as usize;
    if longest <= max_side || max_side == 0 {
        return plane;
    }
    let scale = max_side as f64 / longest as f64;
    let nw = ((w as f64 * scale).round() as u32).clamp(1, max_side as u32);
    let nh = ((h as f64 * scale).round() as u32).clamp(1, max_side as u32);
    imageops::resize(&plane, nw, nh, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn keeps_size_and_pixels() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let color = rgba_to_color_image(&img);
        assert_eq!(color.size, [3, 2]);
        assert_eq!(color.pixels.len(), 6);
        assert_eq!(color.pixels[0], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn oversized_plane_is_shrunk_to_limit() {
        let img = RgbaImage::from_pixel(1000, 250, Rgba([200, 0, 0, 255]));
        let fitted = fit_to_texture_limit(img, 256);
        assert_eq!(fitted.dimensions(), (256, 64));
        assert_eq!(fitted.get_pixel(10, 10), &Rgba([200, 0, 0, 255]));
    }

    #[test]
    fn plane_within_limit_is_untouched() {
        let img = RgbaImage::from_pixel(256, 40, Rgba([1, 2, 3, 255]));
        assert_eq!(fit_to_texture_limit(img, 256).dimensions(), (256, 40));
    }
}
