mod app;
mod convert;
mod messages;
mod panels;
mod state;
mod worker;

use std::path::PathBuf;

use cytoview_core::config::{load_config, ViewerConfig};

/// Config file read when `CYTOVIEW_CONFIG` is unset.
const LOCAL_CONFIG: &str = "cytoview.toml";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = startup_config();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Cervical Cytology AI Viewer")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "CytoView",
        options,
        Box::new(|cc| Ok(Box::new(app::CytoviewApp::new(cc, config)?))),
    )
    .map_err(|e| anyhow::anyhow!("Viewer window failed: {e}"))
}

fn startup_config() -> ViewerConfig {
    let path = std::env::var_os("CYTOVIEW_CONFIG")
        .map(PathBuf::from)
        .or_else(|| {
            let local = PathBuf::from(LOCAL_CONFIG);
            local.is_file().then_some(local)
        });
    let Some(path) = path else {
        return ViewerConfig::default();
    };
    match load_config(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Loaded config");
            config
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring config");
            ViewerConfig::default()
        }
    }
}
