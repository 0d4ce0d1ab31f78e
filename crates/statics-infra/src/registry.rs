//! In-memory launch-site registry.
//!
//! Stands in for the host's live registry in tools and tests. Entries keep
//! insertion order.

use statics_core::repository::registry::SiteRegistry;
use statics_types::error::RegistryError;
use statics_types::launch_site::LaunchSite;
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct InMemorySiteRegistry {
    sites: RwLock<Vec<LaunchSite>>,
}

impl InMemorySiteRegistry {
    pub fn new() -> Self {
        Self {
            sites: RwLock::new(Vec::new()),
        }
    }

    /// Registry pre-populated with host-provided sites.
    pub fn with_sites(sites: Vec<LaunchSite>) -> Self {
        Self {
            sites: RwLock::new(sites),
        }
    }

    pub async fn len(&self) -> usize {
        self.sites.read().await.len()
    }
}

impl Default for InMemorySiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteRegistry for InMemorySiteRegistry {
    async fn find(&self, name: &str) -> Option<LaunchSite> {
        self.sites
            .read()
            .await
            .iter()
            .find(|site| site.name == name)
            .cloned()
    }

    async fn add(&self, site: LaunchSite) -> Result<(), RegistryError> {
        let mut sites = self.sites.write().await;
        if sites.iter().any(|existing| existing.name == site.name) {
            return Err(RegistryError::Duplicate(site.name));
        }
        tracing::debug!(site = %site.name, "registering site");
        sites.push(site);
        Ok(())
    }

    async fn list(&self) -> Vec<LaunchSite> {
        self.sites.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statics_types::site::SiteDefinition;

    fn site(name: &str) -> LaunchSite {
        LaunchSite::from_definition(&SiteDefinition {
            name: name.to_string(),
            ..SiteDefinition::default()
        })
    }

    #[tokio::test]
    async fn add_then_find() {
        let registry = InMemorySiteRegistry::new();
        registry.add(site("Dune Base")).await.unwrap();

        assert!(registry.find("Dune Base").await.is_some());
        assert!(registry.find("dune base").await.is_none());
    }

    #[tokio::test]
    async fn duplicate_name_is_refused() {
        let registry = InMemorySiteRegistry::with_sites(vec![site("KSC")]);
        let err = registry.add(site("KSC")).await.unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(name) if name == "KSC"));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let registry = InMemorySiteRegistry::new();
        for name in ["C", "A", "B"] {
            registry.add(site(name)).await.unwrap();
        }
        let names: Vec<String> = registry.list().await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
