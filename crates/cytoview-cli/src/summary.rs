use std::path::Path;

use console::Style;
use cytoview_core::dispatch::RenderPath;
use cytoview_core::media::LoadedMedia;
use cytoview_core::status::media_info;
use cytoview_core::transform::{base_fit_scale, FitMode};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            warn: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_media_summary(
    file: &Path,
    media: &LoadedMedia,
    path: RenderPath,
    retried_as_raster: bool,
    canvas: (u32, u32),
) {
    let s = Styles::new();
    let (w, h) = media.display_size();
    let fit = base_fit_scale(
        w as f32,
        h as f32,
        canvas.0 as f32,
        canvas.1 as f32,
        media.fit_mode(),
    );

    println!();
    println!("  {}", s.title.apply_to(media.name()));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(media.name().chars().count().max(8))));
    println!();
    println!("  {:<14}{}", s.label.apply_to("File"), s.path.apply_to(file.display()));

    let path_label = match path {
        RenderPath::Volumetric => "volume engine",
        RenderPath::Raster => "2D raster",
    };
    println!("  {:<14}{}", s.label.apply_to("Path"), s.method.apply_to(path_label));
    if retried_as_raster {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Fallback"),
            s.warn.apply_to("volume engine failed, decoded as bitmap")
        );
    }

    match media {
        LoadedMedia::Raster(r) => {
            println!(
                "  {:<14}{}",
                s.label.apply_to("Dimensions"),
                s.value.apply_to(format!("{}x{} px", r.width(), r.height()))
            );
        }
        LoadedMedia::Volume(v) => {
            let [x, y, z] = v.info.dims;
            println!(
                "  {:<14}{}",
                s.label.apply_to("Dimensions"),
                s.value.apply_to(format!("{x}x{y}x{z} voxels"))
            );
            println!(
                "  {:<14}{}",
                s.label.apply_to("Colormap"),
                s.value.apply_to(v.info.colormap)
            );
        }
    }

    let fit_note = match media.fit_mode() {
        FitMode::NoUpscale => "capped at 100%",
        FitMode::Unbounded => "unbounded",
    };
    println!(
        "  {:<14}{} ({} on {}x{})",
        s.label.apply_to("Fit scale"),
        s.value.apply_to(format!("{:.3}", fit)),
        fit_note,
        canvas.0,
        canvas.1
    );
    println!("  {:<14}{}", s.label.apply_to("Status"), media_info(media, fit));
    println!();
}
