use std::path::PathBuf;
use std::time::Duration;

use cytoview_core::dispatch::{FallbackPolicy, LoadPlan, LoadTicket, LoadedPayload};
use cytoview_core::engine::RenderSurface;
use cytoview_core::error::Result;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Bind the volume engine to the canvas surface.
    Attach { surface: RenderSurface },

    /// Run the I/O half of an accepted load.
    Load { plan: LoadPlan },

    SetPolicy { policy: FallbackPolicy },
}

impl WorkerCommand {
    /// What the command asks for, for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Attach { .. } => "attach the volume engine".into(),
            Self::Load { plan } => format!("load {}", plan.name),
            Self::SetPolicy { policy } => format!("switch to {policy}"),
        }
    }
}

/// Results sent back to the UI thread, by the worker or a file dialog.
pub enum WorkerResult {
    Attached {
        result: Result<()>,
    },
    Loaded {
        ticket: LoadTicket,
        result: Result<LoadedPayload>,
        elapsed: Duration,
    },
    /// A path chosen in the file picker.
    FilePicked {
        path: PathBuf,
        overlay: bool,
    },
}
