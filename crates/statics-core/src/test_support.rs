//! Mock ports shared by the service tests.

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use statics_types::error::{BuildError, RegistryError};
use statics_types::launch_site::LaunchSite;
use statics_types::site::{GeoLocation, SiteDefinition, Vector3};

use crate::host::builder::SiteBuilder;
use crate::host::marker::SiteMarker;
use crate::repository::registry::SiteRegistry;
use crate::service::fs::FileSystem;

/// Marker with fixed placement that records disposal.
pub struct MockMarker {
    pub title: String,
    pub location: GeoLocation,
    pub rotation: Vector3,
    pub splashed: bool,
    pub disposed: AtomicBool,
}

impl MockMarker {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            location: GeoLocation {
                longitude: -74.5,
                latitude: -0.1,
                altitude: 68.25,
            },
            rotation: Vector3::new(0.0, 90.0, 0.0),
            splashed: false,
            disposed: AtomicBool::new(false),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl SiteMarker for MockMarker {
    fn site_title(&self) -> String {
        self.title.clone()
    }

    fn plaque_text(&self) -> String {
        format!("Here lies {}", self.title)
    }

    fn location(&self) -> GeoLocation {
        self.location
    }

    fn rotation(&self) -> Vector3 {
        self.rotation
    }

    fn splashed(&self) -> bool {
        self.splashed
    }

    fn body(&self) -> Option<String> {
        Some("Kerbin".to_string())
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

/// In-memory filesystem. Clones share the same files.
#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    dirs: Arc<Mutex<HashSet<PathBuf>>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.dirs.lock().unwrap().insert(parent.to_path_buf());
        }
        self.files.lock().unwrap().insert(path, content.to_string());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn has_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }
}

impl FileSystem for MemoryFileSystem {
    async fn write_file(&self, path: &Path, content: &str) -> Result<(), io::Error> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.insert(path, content);
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<String, io::Error> {
        self.get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), io::Error> {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        self.has_dir(path) || self.get(path).is_some()
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, io::Error> {
        if !self.has_dir(dir) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect())
    }
}

/// Registry backed by a vector.
#[derive(Default)]
pub struct MockRegistry {
    sites: Mutex<Vec<LaunchSite>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site(self, name: &str) -> Self {
        self.sites
            .lock()
            .unwrap()
            .push(LaunchSite::from_definition(&SiteDefinition {
                name: name.to_string(),
                ..SiteDefinition::default()
            }));
        self
    }

    pub fn len(&self) -> usize {
        self.sites.lock().unwrap().len()
    }

    pub fn get(&self, name: &str) -> Option<LaunchSite> {
        self.sites
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.name == name)
            .cloned()
    }
}

impl SiteRegistry for MockRegistry {
    async fn find(&self, name: &str) -> Option<LaunchSite> {
        self.get(name)
    }

    async fn add(&self, site: LaunchSite) -> Result<(), RegistryError> {
        let mut sites = self.sites.lock().unwrap();
        if sites.iter().any(|s| s.name == site.name) {
            return Err(RegistryError::Duplicate(site.name));
        }
        sites.push(site);
        Ok(())
    }

    async fn list(&self) -> Vec<LaunchSite> {
        self.sites.lock().unwrap().clone()
    }
}

/// Builder that records the order of build calls and fails on request.
#[derive(Default)]
pub struct MockBuilder {
    calls: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl MockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SiteBuilder for MockBuilder {
    async fn build(&self, definition: &SiteDefinition) -> Result<LaunchSite, BuildError> {
        self.calls.lock().unwrap().push(definition.name.clone());
        // Building spans several host frames.
        tokio::task::yield_now().await;
        if self.failing.contains(&definition.name) {
            return Err(BuildError::Failed {
                site: definition.name.clone(),
                reason: "terrain not ready".to_string(),
            });
        }
        let mut site = LaunchSite::from_definition(definition);
        site.spawn_points = vec![format!("{}_spawn", definition.object_name)];
        Ok(site)
    }
}
