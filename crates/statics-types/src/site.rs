//! Site definitions and site groups.
//!
//! A `SiteDefinition` is one placement instruction (a `LAUNCHSITESITUATION`
//! node on disk). A `SiteGroup` (`KERBALSTATICSITE`) shares placement
//! metadata across several definitions it owns.
//!
//! Loading follows two deliberately different failure policies:
//! - numeric, boolean and vector fields that fail to parse keep their prior
//!   value (zero for a fresh definition);
//! - an unrecognized `facility` is fatal for that definition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::node::ConfigNode;

/// Marker tag of aggregated site definitions, in the built-in catalog and
/// at the top of every override file.
pub const STATIC_NODE: &str = "KERBALSTATIC";

/// Node name of one site situation.
pub const SITUATION_NODE: &str = "LAUNCHSITESITUATION";

/// Node name of a site group.
pub const SITE_GROUP_NODE: &str = "KERBALSTATICSITE";

/// Bundle used when a definition names none.
pub const DEFAULT_BUNDLE: &str = "makinghistory_assets";

pub(crate) const NAME_FIELD: &str = "launchSiteName";
pub(crate) const OBJECT_NAME_FIELD: &str = "launchSiteObjectName";
pub(crate) const FACILITY_FIELD: &str = "facility";
pub(crate) const SHOW_RAMP_FIELD: &str = "showRamp";
pub(crate) const SPLASHED_FIELD: &str = "splashed";
pub(crate) const LONGITUDE_FIELD: &str = "longitude";
pub(crate) const LATITUDE_FIELD: &str = "latitude";
pub(crate) const ALTITUDE_FIELD: &str = "altitude";
pub(crate) const BODY_FIELD: &str = "body";
pub(crate) const ROTATION_FIELD: &str = "rotation";
pub const BUNDLE_FIELD: &str = "bundleIdentifier";
/// Older spelling of `bundleIdentifier` on `KERBALSTATIC` nodes.
pub const LEGACY_BUNDLE_FIELD: &str = "BundleName";

/// Site category. `None` marks a colony-style site that is not offered as
/// a launch site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facility {
    VAB,
    SPH,
    #[default]
    None,
}

impl Facility {
    /// Whether sites of this facility appear in launch-site listings.
    pub fn is_launch_facility(self) -> bool {
        !matches!(self, Facility::None)
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facility::VAB => write!(f, "VAB"),
            Facility::SPH => write!(f, "SPH"),
            Facility::None => write!(f, "None"),
        }
    }
}

impl FromStr for Facility {
    type Err = DefinitionError;

    /// Accepts the symbol names and their numeric values (`None = 0`,
    /// `VAB = 1`, `SPH = 2`). Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "VAB" | "1" => Ok(Facility::VAB),
            "SPH" | "2" => Ok(Facility::SPH),
            "None" | "0" => Ok(Facility::None),
            other => Err(DefinitionError::UnknownFacility(other.to_string())),
        }
    }
}

/// Surface position in degrees and meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

/// Euler-angle rotation in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Parse `x,y,z`, tolerating the engine's `(x, y, z)` form.
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.trim().trim_start_matches('(').trim_end_matches(')');
        let mut parts = inner.split(',').map(|p| p.trim().parse::<f32>());
        let x = parts.next()?.ok()?;
        let y = parts.next()?.ok()?;
        let z = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { x, y, z })
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Derive the internal handle name from a display name: spaces become
/// underscores and punctuation is dropped.
///
/// ```
/// use statics_types::site::object_name_for;
///
/// assert_eq!(object_name_for("Outpost Alpha"), "Outpost_Alpha");
/// assert_eq!(object_name_for("Mun Base #2!"), "Mun_Base_2");
/// ```
pub fn object_name_for(name: &str) -> String {
    name.trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_alphanumeric() || c == '_' || c == '-' {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// One concrete placement instruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteDefinition {
    /// Display name, unique within the registry.
    pub name: String,
    /// Sanitized identifier for generated handles.
    pub object_name: String,
    pub facility: Facility,
    pub location: GeoLocation,
    /// Celestial body the site stands on, when known.
    pub body: Option<String>,
    pub rotation: Vector3,
    /// Whether the site sits on a liquid surface.
    pub splashed: bool,
    /// Cosmetic flag for the builder.
    pub show_ramp: bool,
    pub bundle_identifier: Option<String>,
}

impl SiteDefinition {
    /// Build a definition from a situation node with zeroed defaults.
    pub fn from_node(node: &ConfigNode) -> Result<Self, DefinitionError> {
        Self::from_node_over(node, &SiteDefinition::default())
    }

    /// Build a definition from a situation node, starting from `base` for
    /// every field the node does not set (or sets to unparseable text).
    pub fn from_node_over(
        node: &ConfigNode,
        base: &SiteDefinition,
    ) -> Result<Self, DefinitionError> {
        let mut definition = base.clone();
        definition.name = String::new();
        definition.object_name = String::new();

        if let Some(name) = node.get_value(NAME_FIELD) {
            definition.name = name.trim().to_string();
        }
        if definition.name.is_empty() {
            return Err(DefinitionError::MissingName);
        }
        definition.object_name = match node.get_value(OBJECT_NAME_FIELD) {
            Some(object_name) if !object_name.trim().is_empty() => object_name.trim().to_string(),
            _ => object_name_for(&definition.name),
        };

        apply_placement(node, &mut definition.location, &mut definition.rotation);
        if let Some(facility) = node.get_value(FACILITY_FIELD) {
            definition.facility = facility.parse()?;
        }
        if let Some(body) = node.get_value(BODY_FIELD) {
            definition.body = Some(body.to_string());
        }
        parse_soft(node, SHOW_RAMP_FIELD, &mut definition.show_ramp, parse_bool);
        parse_soft(node, SPLASHED_FIELD, &mut definition.splashed, parse_bool);
        if let Some(bundle) = node.get_value(BUNDLE_FIELD).filter(|b| !b.is_empty()) {
            definition.bundle_identifier = Some(bundle.to_string());
        }

        Ok(definition)
    }

    /// Serialize as a `LAUNCHSITESITUATION` node.
    pub fn to_node(&self) -> ConfigNode {
        let mut node = ConfigNode::new(SITUATION_NODE);
        node.add_value(NAME_FIELD, &self.name);
        node.add_value(OBJECT_NAME_FIELD, &self.object_name);
        node.add_value(FACILITY_FIELD, self.facility);
        node.add_value(SHOW_RAMP_FIELD, self.show_ramp);
        node.add_value(SPLASHED_FIELD, self.splashed);
        node.add_value(LONGITUDE_FIELD, self.location.longitude);
        node.add_value(LATITUDE_FIELD, self.location.latitude);
        node.add_value(ALTITUDE_FIELD, self.location.altitude);
        if let Some(body) = &self.body {
            node.add_value(BODY_FIELD, body);
        }
        node.add_value(ROTATION_FIELD, self.rotation);
        if let Some(bundle) = self.bundle_identifier.as_deref().filter(|b| !b.is_empty()) {
            node.add_value(BUNDLE_FIELD, bundle);
        }
        node
    }
}

/// A set of related definitions sharing placement metadata.
///
/// The group owns its definitions; children loaded from disk inherit the
/// group's location, rotation, facility and bundle for fields they omit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteGroup {
    pub location: GeoLocation,
    pub rotation: Vector3,
    pub facility: Facility,
    pub bundle_identifier: Option<String>,
    pub sites: Vec<SiteDefinition>,
}

impl SiteGroup {
    /// Load a group from a `KERBALSTATICSITE` node.
    ///
    /// A child with an unknown facility fails the whole group load.
    pub fn from_node(node: &ConfigNode) -> Result<Self, DefinitionError> {
        let mut group = Self::header_from_node(node)?;
        let template = group.template();
        for child in node.get_nodes(SITUATION_NODE) {
            group.sites.push(SiteDefinition::from_node_over(child, &template)?);
        }
        Ok(group)
    }

    /// Load only the shared placement metadata, leaving `sites` empty.
    pub fn header_from_node(node: &ConfigNode) -> Result<Self, DefinitionError> {
        let mut group = SiteGroup::default();
        apply_placement(node, &mut group.location, &mut group.rotation);
        if let Some(bundle) = node.get_value(BUNDLE_FIELD).filter(|b| !b.is_empty()) {
            group.bundle_identifier = Some(bundle.to_string());
        }
        if let Some(facility) = node.get_value(FACILITY_FIELD) {
            group.facility = facility.parse()?;
        }
        Ok(group)
    }

    /// Defaults a child definition starts from.
    pub fn template(&self) -> SiteDefinition {
        SiteDefinition {
            facility: self.facility,
            location: self.location,
            rotation: self.rotation,
            bundle_identifier: self.bundle_identifier.clone(),
            ..SiteDefinition::default()
        }
    }

    /// Serialize as a `KERBALSTATICSITE` node with one situation per site.
    pub fn to_node(&self) -> ConfigNode {
        let mut node = ConfigNode::new(SITE_GROUP_NODE);
        node.add_value(LONGITUDE_FIELD, self.location.longitude);
        node.add_value(LATITUDE_FIELD, self.location.latitude);
        node.add_value(ALTITUDE_FIELD, self.location.altitude);
        node.add_value(ROTATION_FIELD, self.rotation);
        if let Some(bundle) = self.bundle_identifier.as_deref().filter(|b| !b.is_empty()) {
            node.add_value(BUNDLE_FIELD, bundle);
        }
        node.add_value(FACILITY_FIELD, self.facility);
        for site in &self.sites {
            node.add_node(site.to_node());
        }
        node
    }
}

fn apply_placement(node: &ConfigNode, location: &mut GeoLocation, rotation: &mut Vector3) {
    parse_soft(node, LONGITUDE_FIELD, &mut location.longitude, |v| v.parse().ok());
    parse_soft(node, LATITUDE_FIELD, &mut location.latitude, |v| v.parse().ok());
    parse_soft(node, ALTITUDE_FIELD, &mut location.altitude, |v| v.parse().ok());
    parse_soft(node, ROTATION_FIELD, rotation, Vector3::parse);
}

/// Overwrite `target` only when the field exists and parses.
fn parse_soft<T>(node: &ConfigNode, key: &str, target: &mut T, parse: impl Fn(&str) -> Option<T>) {
    if let Some(parsed) = node.get_value(key).and_then(|v| parse(v.trim())) {
        *target = parsed;
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
