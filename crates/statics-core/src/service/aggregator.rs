//! Definition aggregation.
//!
//! Collects every `KERBALSTATIC` node the current save should know about:
//! first the host's built-in catalog (catalog order), then every file in
//! the save's `LaunchSites` folder (listing order, which is unspecified).
//! Nothing is deduplicated here; two definitions sharing a name are both
//! returned and the creation orchestrator skips the later one.

use statics_types::node::ConfigNode;
use statics_types::site::STATIC_NODE;

use crate::repository::catalog::DefinitionCatalog;
use crate::service::fs::FileSystem;
use crate::service::persistence::SiteStore;

/// Merges built-in and per-save site definitions into one ordered list.
pub struct ConfigAggregator<C: DefinitionCatalog, F: FileSystem> {
    catalog: C,
    store: SiteStore<F>,
}

impl<C: DefinitionCatalog, F: FileSystem> ConfigAggregator<C, F> {
    pub fn new(catalog: C, store: SiteStore<F>) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Built-in definitions followed by override-file definitions.
    ///
    /// Unreadable or malformed override files are logged and skipped; a
    /// missing override folder is created and contributes nothing.
    pub async fn collect_definitions(&self) -> Vec<ConfigNode> {
        let mut definitions = self.catalog.nodes_tagged(STATIC_NODE);
        if !definitions.is_empty() {
            tracing::info!(count = definitions.len(), "found built-in site definitions");
        }

        let files = match self.store.override_files().await {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!(error = %err, "cannot list site override files");
                Vec::new()
            }
        };
        if !files.is_empty() {
            tracing::info!(
                count = files.len(),
                save = %self.store.layout().save_root().display(),
                "found site override files"
            );
        }

        for path in files {
            match self.store.load_node(&path).await {
                Ok(root) => definitions.extend(root.get_nodes(STATIC_NODE).cloned()),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable site file");
                }
            }
        }

        definitions
    }
}
