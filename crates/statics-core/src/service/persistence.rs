//! Site file persistence.
//!
//! Maps `SiteDefinition`s and `SiteGroup`s to and from Definition Store
//! files inside the save folder:
//!
//! ```text
//! <saveRoot>/KerbalStatics/
//!     statics.toml
//!     LaunchSites/
//!         <siteTitle>.txt
//! ```
//!
//! Every written file is an anonymous root holding one `KERBALSTATIC` node,
//! so a converted site is picked up by the next aggregation pass.

use std::path::{Path, PathBuf};

use statics_types::error::PersistenceError;
use statics_types::node::ConfigNode;
use statics_types::site::{STATIC_NODE, SiteDefinition, SiteGroup};

use super::fs::FileSystem;

/// Folder inside the save root owned by the site pipeline.
pub const STATICS_FOLDER: &str = "KerbalStatics";

/// Folder holding one file per converted site.
pub const LAUNCH_SITES_FOLDER: &str = "LaunchSites";

/// Per-save configuration file name.
pub const CONFIG_FILE: &str = "statics.toml";

/// Extension of site files.
pub const SITE_FILE_EXTENSION: &str = "txt";

/// Paths of the pipeline's folders for one save game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticsLayout {
    save_root: PathBuf,
}

impl StaticsLayout {
    pub fn new(save_root: impl Into<PathBuf>) -> Self {
        Self {
            save_root: save_root.into(),
        }
    }

    /// Layout for a named save under the host's install root:
    /// `{app_root}/saves/{save_name}`.
    pub fn for_save(app_root: &Path, save_name: &str) -> Self {
        Self::new(app_root.join("saves").join(save_name))
    }

    pub fn save_root(&self) -> &Path {
        &self.save_root
    }

    pub fn statics_dir(&self) -> PathBuf {
        self.save_root.join(STATICS_FOLDER)
    }

    pub fn launch_sites_dir(&self) -> PathBuf {
        self.statics_dir().join(LAUNCH_SITES_FOLDER)
    }

    pub fn config_file(&self) -> PathBuf {
        self.statics_dir().join(CONFIG_FILE)
    }

    /// `LaunchSites/<title>.txt`. Path separators in the title are replaced
    /// so the file always lands inside the folder.
    pub fn site_file(&self, site_title: &str) -> PathBuf {
        let file_name: String = site_title
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '\0' => '_',
                other => other,
            })
            .collect();
        self.launch_sites_dir()
            .join(format!("{file_name}.{SITE_FILE_EXTENSION}"))
    }
}

/// Reads and writes site files through a `FileSystem`.
#[derive(Debug, Clone)]
pub struct SiteStore<F: FileSystem> {
    fs: F,
    layout: StaticsLayout,
}

impl<F: FileSystem> SiteStore<F> {
    pub fn new(fs: F, layout: StaticsLayout) -> Self {
        Self { fs, layout }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn layout(&self) -> &StaticsLayout {
        &self.layout
    }

    /// Create the statics and launch-site folders if they are missing.
    pub async fn ensure_layout(&self) -> Result<(), PersistenceError> {
        for dir in [self.layout.statics_dir(), self.layout.launch_sites_dir()] {
            if !self.fs.exists(&dir).await {
                tracing::debug!(path = %dir.display(), "creating folder");
                self.fs
                    .create_dir_all(&dir)
                    .await
                    .map_err(|source| PersistenceError::Io { path: dir.clone(), source })?;
            }
        }
        Ok(())
    }

    /// Every file in the launch-site folder, creating the folder first if
    /// it does not exist yet. Order follows the directory listing.
    pub async fn override_files(&self) -> Result<Vec<PathBuf>, PersistenceError> {
        let dir = self.layout.launch_sites_dir();
        if !self.fs.exists(&dir).await {
            self.ensure_layout().await?;
            return Ok(Vec::new());
        }
        self.fs
            .list_files(&dir)
            .await
            .map_err(|source| PersistenceError::Io { path: dir, source })
    }

    /// Load a file as an anonymous root node.
    pub async fn load_node(&self, path: &Path) -> Result<ConfigNode, PersistenceError> {
        let text = self.fs.read_file(path).await.map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ConfigNode::parse(&text).map_err(|source| PersistenceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write a root node's contents to a file, replacing any existing file.
    pub async fn save_node(&self, root: &ConfigNode, path: &Path) -> Result<(), PersistenceError> {
        self.fs
            .write_file(path, &root.to_text())
            .await
            .map_err(|source| PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write one definition as `KERBALSTATIC { LAUNCHSITESITUATION { .. } }`.
    pub async fn save_definition(
        &self,
        definition: &SiteDefinition,
        path: &Path,
    ) -> Result<(), PersistenceError> {
        let mut root = ConfigNode::root();
        root.add_node(ConfigNode::new(STATIC_NODE))
            .add_node(definition.to_node());
        self.save_node(&root, path).await
    }

    /// Write a group as `KERBALSTATIC { KERBALSTATICSITE { .. } }`.
    pub async fn save_group(&self, group: &SiteGroup, path: &Path) -> Result<(), PersistenceError> {
        let mut root = ConfigNode::root();
        root.add_node(ConfigNode::new(STATIC_NODE))
            .add_node(group.to_node());
        self.save_node(&root, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryFileSystem;
    use statics_types::site::{
        Facility, GeoLocation, SITE_GROUP_NODE, SITUATION_NODE, Vector3,
    };

    fn store(fs: &MemoryFileSystem) -> SiteStore<MemoryFileSystem> {
        SiteStore::new(fs.clone(), StaticsLayout::new("/ksp/saves/default"))
    }

    fn sample_definition() -> SiteDefinition {
        SiteDefinition {
            name: "Dune Base".to_string(),
            object_name: "Dune Base".to_string(),
            facility: Facility::VAB,
            location: GeoLocation {
                longitude: 12.345_678_9,
                latitude: -45.5,
                altitude: 1_024.125,
            },
            body: Some("Duna".to_string()),
            rotation: Vector3::new(0.0, 12.5, 0.0),
            splashed: false,
            show_ramp: true,
            bundle_identifier: None,
        }
    }

    #[test]
    fn layout_paths() {
        let layout = StaticsLayout::for_save(Path::new("/ksp"), "career");
        assert_eq!(layout.save_root(), Path::new("/ksp/saves/career"));
        assert_eq!(
            layout.launch_sites_dir(),
            PathBuf::from("/ksp/saves/career/KerbalStatics/LaunchSites")
        );
        assert_eq!(
            layout.site_file("Dune Base"),
            PathBuf::from("/ksp/saves/career/KerbalStatics/LaunchSites/Dune Base.txt")
        );
        assert_eq!(
            layout.config_file(),
            PathBuf::from("/ksp/saves/career/KerbalStatics/statics.toml")
        );
    }

    #[test]
    fn site_file_stays_inside_folder() {
        let layout = StaticsLayout::new("/save");
        assert_eq!(
            layout.site_file("../escape/attempt"),
            PathBuf::from("/save/KerbalStatics/LaunchSites/.._escape_attempt.txt")
        );
    }

    #[tokio::test]
    async fn ensure_layout_creates_both_folders() {
        let fs = MemoryFileSystem::new();
        let store = store(&fs);
        store.ensure_layout().await.unwrap();
        assert!(fs.has_dir(&store.layout().statics_dir()));
        assert!(fs.has_dir(&store.layout().launch_sites_dir()));
    }

    #[tokio::test]
    async fn override_files_creates_missing_folder() {
        let fs = MemoryFileSystem::new();
        let store = store(&fs);
        assert!(store.override_files().await.unwrap().is_empty());
        assert!(fs.has_dir(&store.layout().launch_sites_dir()));
    }

    #[tokio::test]
    async fn saved_definition_loads_back() {
        let fs = MemoryFileSystem::new();
        let store = store(&fs);
        let definition = sample_definition();
        let path = store.layout().site_file(&definition.name);

        store.save_definition(&definition, &path).await.unwrap();
        let root = store.load_node(&path).await.unwrap();
        let situation = root
            .get_node(STATIC_NODE)
            .and_then(|n| n.get_node(SITUATION_NODE))
            .unwrap();
        assert_eq!(SiteDefinition::from_node(situation).unwrap(), definition);
    }

    #[tokio::test]
    async fn saved_group_loads_back() {
        let fs = MemoryFileSystem::new();
        let store = store(&fs);
        let group = SiteGroup {
            location: GeoLocation {
                longitude: 1.0,
                latitude: 2.0,
                altitude: 3.0,
            },
            rotation: Vector3::new(0.0, 0.0, 0.0),
            facility: Facility::SPH,
            bundle_identifier: Some("stock".to_string()),
            sites: vec![SiteDefinition {
                bundle_identifier: Some("stock".to_string()),
                ..sample_definition()
            }],
        };
        let path = store.layout().site_file("Group");

        store.save_group(&group, &path).await.unwrap();
        let root = store.load_node(&path).await.unwrap();
        let node = root
            .get_node(STATIC_NODE)
            .and_then(|n| n.get_node(SITE_GROUP_NODE))
            .unwrap();
        assert_eq!(SiteGroup::from_node(node).unwrap(), group);
    }

    #[tokio::test]
    async fn load_reports_malformed_file() {
        let fs = MemoryFileSystem::new();
        let store = store(&fs);
        let path = store.layout().site_file("Broken");
        fs.insert(path.clone(), "KERBALSTATIC\n{\n");

        let err = store.load_node(&path).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Parse { .. }));
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let fs = MemoryFileSystem::new();
        fs.set_read_only(true);
        let store = store(&fs);
        let path = store.layout().site_file("Dune Base");

        let err = store
            .save_definition(&sample_definition(), &path)
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
