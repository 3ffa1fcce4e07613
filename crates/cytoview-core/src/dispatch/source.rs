use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempPath;
use tracing::debug;

use crate::error::Result;

/// A file handed to the viewer by the picker, a drop or a location string.
#[derive(Clone, Debug)]
pub enum MediaSource {
    /// A file on disk.
    Path(PathBuf),
    /// In-memory bytes (e.g. a drop without a backing file).
    Bytes {
        name: String,
        bytes: Arc<[u8]>,
        content_type: Option<String>,
    },
}

impl MediaSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes {
            name: name.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// File name shown to the user.
    pub fn name(&self) -> String {
        match self {
            Self::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string()),
            Self::Bytes { name, .. } => name.clone(),
        }
    }

    /// Content type supplied with the source, if any.
    pub fn declared_content_type(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Bytes { content_type, .. } => content_type.as_deref().filter(|c| !c.is_empty()),
        }
    }

    /// Resolve a location string: a plain path or a `file://` URL.
    pub fn from_location(location: &str) -> std::result::Result<Self, String> {
        let trimmed = location.trim();
        if let Some(rest) = trimmed.strip_prefix("file://") {
            return Ok(Self::Path(PathBuf::from(rest)));
        }
        if let Some((scheme, _)) = trimmed.split_once("://") {
            return Err(format!("unsupported URL scheme '{scheme}'"));
        }
        if trimmed.is_empty() {
            return Err("empty location".into());
        }
        Ok(Self::Path(PathBuf::from(trimmed)))
    }
}

/// A source materialised on disk for the duration of one load.
///
/// Byte sources are spilled to a temporary file that is removed when the
/// guard drops, whichever way the load ends.
#[derive(Debug)]
pub struct ScopedSource {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl ScopedSource {
    pub fn materialize(source: &MediaSource) -> Result<Self> {
        match source {
            MediaSource::Path(p) => Ok(Self {
                path: p.clone(),
                temp: None,
            }),
            MediaSource::Bytes { name, bytes, .. } => {
                // Keep the original suffix so format detection still works.
                let suffix = name
                    .find('.')
                    .map(|i| name[i..].to_string())
                    .unwrap_or_default();
                let mut file = tempfile::Builder::new()
                    .prefix("cytoview-")
                    .suffix(&suffix)
                    .tempfile()?;
                file.write_all(bytes)?;
                file.flush()?;
                let temp = file.into_temp_path();
                debug!(name = %name, path = %temp.display(), "Spilled dropped bytes");
                Ok(Self {
                    path: temp.to_path_buf(),
                    temp: Some(temp),
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }
}
