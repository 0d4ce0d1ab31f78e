//! Marker entity trait definition.

use statics_types::site::{GeoLocation, Vector3};

/// A transient world object marking where a player wants a new site.
pub trait SiteMarker: Send + Sync {
    /// Title the player gave the site.
    fn site_title(&self) -> String;

    /// Free text written on the marker.
    fn plaque_text(&self) -> String;

    fn location(&self) -> GeoLocation;

    fn rotation(&self) -> Vector3;

    /// Whether the marker stands in liquid.
    fn splashed(&self) -> bool;

    /// Celestial body the marker stands on.
    fn body(&self) -> Option<String>;

    /// Remove the marker from the world.
    fn dispose(&self);
}
