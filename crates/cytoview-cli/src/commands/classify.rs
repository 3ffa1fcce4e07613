use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use cytoview_core::dispatch::{
    classify, content_type_for, is_overlay_name, volumetric_suffix, MediaKind,
};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Files to classify (they need not exist)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Content type to assume instead of the one derived from the extension
    #[arg(long)]
    pub content_type: Option<String>,
}

pub fn run(args: &ClassifyArgs) -> Result<()> {
    for file in &args.files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());
        let content_type = args
            .content_type
            .clone()
            .or_else(|| content_type_for(&name));
        let kind = classify(&name, content_type.as_deref());

        let detail = match kind {
            MediaKind::Volumetric => {
                let suffix = volumetric_suffix(&name).unwrap_or_default();
                if is_overlay_name(&name) {
                    format!("{suffix}, overlay")
                } else {
                    suffix.to_string()
                }
            }
            MediaKind::Raster => content_type.unwrap_or_default(),
            MediaKind::Unsupported => "no handler".to_string(),
        };
        println!("{:<32} {:<12} {}", name, kind.to_string(), detail);
    }
    Ok(())
}
