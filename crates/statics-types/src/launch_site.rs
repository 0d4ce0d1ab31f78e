//! Live site records as held by the site registry.

use serde::{Deserialize, Serialize};

use crate::site::{Facility, GeoLocation, SiteDefinition};

/// Prefab every `SPH` site is pointed at after creation.
pub const DESERT_AIRFIELD_PREFAB: &str =
    "Assets/Expansions/Missions/Scenery/Prefabs/Desert_Airfield/Desert_Airfield.prefab";

/// A materialized site as tracked by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchSite {
    pub name: String,
    pub object_name: String,
    pub facility: Facility,
    pub location: GeoLocation,
    pub body: Option<String>,
    pub splashed: bool,
    /// Whether the player must visit the site before it is listed.
    pub requires_poi_visit: bool,
    /// Asset bundle holding the site's models.
    pub bundle_name: String,
    pub prefab_path: Option<String>,
    /// Names of the spawn points vessels can be placed at.
    pub spawn_points: Vec<String>,
}

impl LaunchSite {
    /// A fresh, undiscovered record for a definition, as a builder would
    /// produce before housekeeping.
    pub fn from_definition(definition: &SiteDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            object_name: definition.object_name.clone(),
            facility: definition.facility,
            location: definition.location,
            body: definition.body.clone(),
            splashed: definition.splashed,
            requires_poi_visit: true,
            bundle_name: String::new(),
            prefab_path: None,
            spawn_points: Vec::new(),
        }
    }

    pub fn summary(&self) -> SiteSummary {
        SiteSummary {
            name: self.name.clone(),
            prefab_path: self.prefab_path.clone(),
            spawn_points: self.spawn_points.clone(),
        }
    }
}

/// Reporting view of a registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub name: String,
    pub prefab_path: Option<String>,
    pub spawn_points: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Vector3;

    #[test]
    fn test_from_definition_requires_discovery() {
        let definition = SiteDefinition {
            name: "Island Pad".to_string(),
            object_name: "Island_Pad".to_string(),
            facility: Facility::VAB,
            splashed: true,
            rotation: Vector3::new(0.0, 180.0, 0.0),
            ..SiteDefinition::default()
        };
        let site = LaunchSite::from_definition(&definition);
        assert_eq!(site.name, "Island Pad");
        assert!(site.requires_poi_visit);
        assert!(site.splashed);
        assert!(site.prefab_path.is_none());
    }

    #[test]
    fn test_summary_copies_reporting_fields() {
        let mut site = LaunchSite::from_definition(&SiteDefinition {
            name: "Dune Strip".to_string(),
            ..SiteDefinition::default()
        });
        site.prefab_path = Some(DESERT_AIRFIELD_PREFAB.to_string());
        site.spawn_points = vec!["Runway".to_string()];

        let summary = site.summary();
        assert_eq!(summary.name, "Dune Strip");
        assert_eq!(summary.prefab_path.as_deref(), Some(DESERT_AIRFIELD_PREFAB));
        assert_eq!(summary.spawn_points, vec!["Runway"]);
    }
}
