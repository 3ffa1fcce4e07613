//! Per-file routing between the volume engine and the 2D raster path.
//!
//! A dispatch runs in three steps so that the slow middle step can happen off
//! the UI thread:
//!
//! 1. [`RenderDispatcher::plan`] classifies the file, checks prerequisites
//!    and stamps a [`LoadTicket`]. Rejections here never touch loaded media.
//! 2. [`MediaLoader::execute`] performs the engine load or raster decode.
//! 3. [`RenderDispatcher::apply`] commits the result, discarding completions
//!    that a newer request has superseded.
//!
//! Primary loads supersede each other. An overlay is tied to the primary
//! that was last requested when it was planned, so it never cancels a
//! pending primary and is dropped if that primary is replaced first.

mod classify;
mod loader;
mod sequence;
mod source;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, ViewerError};
use crate::media::{LoadedMedia, OverlayLayer};

pub use classify::{
    classify, classify_name, content_type_for, is_overlay_name, volumetric_suffix, MediaKind,
};
pub use loader::{decode_raster, LoadedPayload, MediaLoader};
pub use sequence::{LoadSequencer, LoadTicket};
pub use source::{MediaSource, ScopedSource};

/// What to do when the volume engine rejects a volumetric file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Report the engine failure; never decode as a bitmap.
    #[default]
    ReportError,
    /// Silently retry the same bytes through the raster decoder.
    RetryAsRaster,
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReportError => write!(f, "Report Error"),
            Self::RetryAsRaster => write!(f, "Retry As Raster"),
        }
    }
}

/// Which path draws the primary media.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPath {
    Volumetric,
    Raster,
}

/// An accepted load request.
#[derive(Clone, Debug)]
pub struct LoadPlan {
    pub ticket: LoadTicket,
    pub source: MediaSource,
    pub name: String,
    pub kind: MediaKind,
    /// Composite over the primary volume instead of replacing it.
    pub overlay: bool,
}

/// Result of applying a finished load.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    Primary {
        name: String,
        path: RenderPath,
        retried_as_raster: bool,
    },
    Overlay {
        name: String,
        layers: usize,
    },
    /// A newer request was issued while this one was in flight.
    Stale { ticket: LoadTicket },
}

/// Owns the loaded media and decides how each file is handled.
#[derive(Debug)]
pub struct RenderDispatcher {
    primary: Option<LoadedMedia>,
    overlays: Vec<OverlayLayer>,
    using_fallback: bool,
    sequencer: LoadSequencer,
    /// Ticket of the newest primary request that has not failed.
    requested_primary: Option<LoadTicket>,
    /// Ticket that produced the primary media on screen.
    shown_primary: Option<LoadTicket>,
    /// In-flight overlay tickets and the primary ticket each belongs to.
    overlay_bases: HashMap<LoadTicket, LoadTicket>,
    discard_stale: bool,
}

impl Default for RenderDispatcher {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RenderDispatcher {
    pub fn new(discard_stale: bool) -> Self {
        Self {
            primary: None,
            overlays: Vec::new(),
            using_fallback: false,
            sequencer: LoadSequencer::default(),
            requested_primary: None,
            shown_primary: None,
            overlay_bases: HashMap::new(),
            discard_stale,
        }
    }

    pub fn primary(&self) -> Option<&LoadedMedia> {
        self.primary.as_ref()
    }

    pub fn overlays(&self) -> &[OverlayLayer] {
        &self.overlays
    }

    /// True while the primary media is drawn by the 2D raster path.
    pub fn using_fallback(&self) -> bool {
        self.using_fallback
    }

    pub fn has_primary_volume(&self) -> bool {
        self.primary.as_ref().is_some_and(LoadedMedia::is_volume)
    }

    pub fn latest_ticket(&self) -> Option<LoadTicket> {
        self.sequencer.latest()
    }

    /// Classify `source` and stamp it with a ticket.
    pub fn plan(&mut self, source: MediaSource) -> Result<LoadPlan> {
        self.plan_with(source, false)
    }

    /// Like [`plan`](Self::plan), but the source is always composited over
    /// the primary volume whatever its name.
    pub fn plan_overlay(&mut self, source: MediaSource) -> Result<LoadPlan> {
        self.plan_with(source, true)
    }

    fn plan_with(&mut self, source: MediaSource, force_overlay: bool) -> Result<LoadPlan> {
        let name = source.name();
        let content_type = source
            .declared_content_type()
            .map(str::to_string)
            .or_else(|| content_type_for(&name));
        let kind = classify(&name, content_type.as_deref());
        debug!(name = %name, ?content_type, %kind, "Classified file");

        if kind == MediaKind::Unsupported {
            return Err(ViewerError::UnsupportedFormat(name));
        }

        if force_overlay && kind != MediaKind::Volumetric {
            return Err(ViewerError::UnsupportedFormat(name));
        }
        let overlay = kind == MediaKind::Volumetric && (force_overlay || is_overlay_name(&name));
        let ticket = if overlay {
            let base = self
                .requested_primary
                .filter(|_| self.has_primary_volume())
                .ok_or_else(|| ViewerError::MissingPrerequisite("load a base image first".into()))?;
            let ticket = self.sequencer.issue();
            self.overlay_bases.insert(ticket, base);
            ticket
        } else {
            let ticket = self.sequencer.issue();
            self.requested_primary = Some(ticket);
            ticket
        };

        Ok(LoadPlan {
            ticket,
            source,
            name,
            kind,
            overlay,
        })
    }

    /// Commit a finished load.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedPayload>,
    ) -> Result<LoadOutcome> {
        let stale = match self.overlay_bases.remove(&ticket) {
            Some(base) => {
                self.requested_primary != Some(base) || self.shown_primary != Some(base)
            }
            None => self.requested_primary != Some(ticket),
        };
        if self.discard_stale && stale {
            info!(ticket = ticket.id(), "Discarding superseded load");
            return Ok(LoadOutcome::Stale { ticket });
        }

        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                if self.requested_primary == Some(ticket) {
                    self.requested_primary = self.shown_primary;
                }
                return Err(e);
            }
        };

        match payload {
            LoadedPayload::Primary {
                media,
                retried_as_raster,
            } => {
                let name = media.name().to_string();
                let path = if media.is_volume() {
                    RenderPath::Volumetric
                } else {
                    RenderPath::Raster
                };
                self.using_fallback = path == RenderPath::Raster;
                self.primary = Some(media);
                self.shown_primary = Some(ticket);
                self.overlays.clear();
                Ok(LoadOutcome::Primary {
                    name,
                    path,
                    retried_as_raster,
                })
            }
            LoadedPayload::Overlay(layer) => {
                // The base may have been replaced while the overlay loaded.
                if !self.has_primary_volume() {
                    warn!(name = %layer.volume.info.name, "Overlay arrived without a base volume");
                    return Err(ViewerError::MissingPrerequisite(
                        "load a base image first".into(),
                    ));
                }
                let name = layer.volume.info.name.clone();
                self.overlays.push(layer);
                Ok(LoadOutcome::Overlay {
                    name,
                    layers: self.overlays.len(),
                })
            }
        }
    }

    /// Plan, load and apply in one synchronous step.
    pub fn dispatch(&mut self, loader: &mut MediaLoader, source: MediaSource) -> Result<LoadOutcome> {
        let plan = self.plan(source)?;
        let result = loader.execute(&plan);
        self.apply(plan.ticket, result)
    }

    /// Drop the primary media and all overlays.
    pub fn clear(&mut self) {
        self.primary = None;
        self.shown_primary = None;
        self.overlays.clear();
        self.using_fallback = false;
    }
}
