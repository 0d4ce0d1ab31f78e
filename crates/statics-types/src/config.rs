//! Per-save configuration for the site pipeline.
//!
//! `StaticsConfig` mirrors `KerbalStatics/statics.toml` in the save folder.
//! Every field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

use crate::site::{DEFAULT_BUNDLE, Facility};

/// Placeholder replaced by the site title in `site_created_message`.
pub const SITE_PLACEHOLDER: &str = "{site}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticsConfig {
    /// Markers may be converted into VAB launch sites.
    #[serde(default = "default_true")]
    pub allow_vab_setup: bool,

    /// Markers may be converted into SPH runways.
    #[serde(default = "default_true")]
    pub allow_sph_setup: bool,

    /// Markers may be converted into colony sites.
    #[serde(default)]
    pub allow_colony_setup: bool,

    /// Bundle attached to sites whose definition names none.
    #[serde(default = "default_bundle")]
    pub default_bundle: String,

    /// Confirmation text template; `{site}` is replaced by the site title.
    #[serde(default = "default_site_created_message")]
    pub site_created_message: String,

    /// How long the host shows the confirmation message.
    #[serde(default = "default_message_duration")]
    pub message_duration_secs: f32,

    /// Tick awaited after a creation pass before the registry is listed.
    /// Zero yields to the scheduler once instead.
    #[serde(default = "default_fixed_timestep")]
    pub fixed_timestep_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_bundle() -> String {
    DEFAULT_BUNDLE.to_string()
}

fn default_site_created_message() -> String {
    format!("{SITE_PLACEHOLDER} has been set up as a new site")
}

fn default_message_duration() -> f32 {
    5.0
}

fn default_fixed_timestep() -> u64 {
    20
}

impl Default for StaticsConfig {
    fn default() -> Self {
        Self {
            allow_vab_setup: default_true(),
            allow_sph_setup: default_true(),
            allow_colony_setup: false,
            default_bundle: default_bundle(),
            site_created_message: default_site_created_message(),
            message_duration_secs: default_message_duration(),
            fixed_timestep_ms: default_fixed_timestep(),
        }
    }
}

impl StaticsConfig {
    /// Whether markers may be converted into the given facility.
    pub fn allows(&self, facility: Facility) -> bool {
        match facility {
            Facility::VAB => self.allow_vab_setup,
            Facility::SPH => self.allow_sph_setup,
            Facility::None => self.allow_colony_setup,
        }
    }

    /// Facilities currently offered for conversion.
    pub fn allowed_facilities(&self) -> Vec<Facility> {
        [Facility::VAB, Facility::SPH, Facility::None]
            .into_iter()
            .filter(|f| self.allows(*f))
            .collect()
    }

    /// Format the confirmation message for a new site.
    pub fn created_message(&self, site: &str) -> String {
        self.site_created_message.replace(SITE_PLACEHOLDER, site)
    }
}
