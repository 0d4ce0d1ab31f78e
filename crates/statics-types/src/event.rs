//! Events published by the site pipeline.
//!
//! `SiteEvent` is broadcast on the core `EventBus`. All variants are
//! Clone + Send + Sync for use with tokio broadcast channels.

use serde::{Deserialize, Serialize};

use crate::site::Facility;

/// Outcomes of creation passes and marker conversions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SiteEvent {
    /// A definition was built and registered.
    SiteCreated {
        site: String,
        facility: Facility,
        bundle: String,
    },

    /// A definition named an already registered site.
    SiteSkipped { site: String },

    /// The builder failed for one definition; the pass continued.
    SiteBuildFailed { site: String, error: String },

    /// A definition could not be parsed and was left out of the pass.
    DefinitionRejected { error: String },

    /// A creation pass finished.
    CreationPassCompleted {
        created: usize,
        skipped: usize,
        failed: usize,
    },

    /// A marker was converted and persisted. `message` is the confirmation
    /// text for the player, to be shown for `duration_secs`.
    SiteConverted {
        site: String,
        facility: Facility,
        path: String,
        message: String,
        duration_secs: f32,
    },

    /// A pre-commit listener vetoed a conversion.
    ConversionAborted { site: String, facility: Facility },
}
