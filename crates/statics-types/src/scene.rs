//! Host scenes and which of them run a creation pass.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host scenes a session can be notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Loading,
    MainMenu,
    SpaceCenter,
    Editor,
    Flight,
    TrackingStation,
    PlanetSetup,
}

impl Scene {
    /// Scenes in which the live site registry exists and a creation pass runs.
    pub fn loads_sites(self) -> bool {
        matches!(
            self,
            Scene::SpaceCenter
                | Scene::Editor
                | Scene::Flight
                | Scene::TrackingStation
                | Scene::PlanetSetup
        )
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scene::Loading => write!(f, "loading"),
            Scene::MainMenu => write!(f, "main_menu"),
            Scene::SpaceCenter => write!(f, "space_center"),
            Scene::Editor => write!(f, "editor"),
            Scene::Flight => write!(f, "flight"),
            Scene::TrackingStation => write!(f, "tracking_station"),
            Scene::PlanetSetup => write!(f, "planet_setup"),
        }
    }
}
