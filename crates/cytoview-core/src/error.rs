use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("Volume engine could not load {name}: {reason}")]
    EngineLoad { name: String, reason: String },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    MissingPrerequisite(String),

    #[error("Failed to initialize medical viewer: {0}")]
    Initialization(String),

    #[error("Invalid media dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Media loader stopped: {0}")]
    LoaderStopped(String),
}

impl ViewerError {
    pub fn decode(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn engine_load(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::EngineLoad {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Short status-line text for this failure.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "Error loading image",
            Self::EngineLoad { .. } => "Error loading medical image",
            Self::UnsupportedFormat(_) => "Unsupported file format",
            Self::MissingPrerequisite(_) => "Load a base image first",
            Self::Initialization(_) => "Error: Failed to initialize medical viewer",
            Self::Io(_) => "Error reading file",
            Self::InvalidDimensions { .. } => "Error loading image",
            Self::Config(_) => "Config error",
            Self::LoaderStopped(_) => "Error: media loader stopped",
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
