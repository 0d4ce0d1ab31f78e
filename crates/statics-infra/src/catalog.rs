//! Built-in definition catalog loaded from the host's data folder.
//!
//! Walks a directory tree for `.cfg` files, parses each as a Definition
//! Store file and keeps every top-level node. Files are visited in sorted
//! path order so catalog order is stable across runs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use statics_core::repository::catalog::DefinitionCatalog;
use statics_types::node::ConfigNode;

/// Extension of catalog files.
pub const CATALOG_EXTENSION: &str = "cfg";

/// Every top-level node found under a data folder.
#[derive(Debug, Clone, Default)]
pub struct GameDataCatalog {
    nodes: Vec<ConfigNode>,
}

impl GameDataCatalog {
    /// Load every `.cfg` file below `root`.
    ///
    /// A missing root yields an empty catalog. Files that fail to read or
    /// parse are logged and skipped.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        if !root.exists() {
            tracing::debug!(path = %root.display(), "no catalog folder");
            return Ok(Self::default());
        }

        let mut files = Vec::new();
        collect_cfg_files(root, &mut files)?;
        files.sort();

        let mut nodes = Vec::new();
        for path in &files {
            let parsed = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))
                .and_then(|text| {
                    ConfigNode::parse(&text)
                        .with_context(|| format!("Failed to parse {}", path.display()))
                });
            match parsed {
                Ok(root) => nodes.extend(root.nodes().iter().cloned()),
                Err(e) => tracing::warn!(error = %e, "Skipping catalog file"),
            }
        }

        tracing::debug!(files = files.len(), nodes = nodes.len(), "loaded catalog");
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn collect_cfg_files(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read catalog directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_cfg_files(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(CATALOG_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

impl DefinitionCatalog for GameDataCatalog {
    fn nodes_tagged(&self, tag: &str) -> Vec<ConfigNode> {
        self.nodes
            .iter()
            .filter(|node| node.name() == tag)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statics_types::site::STATIC_NODE;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let catalog = GameDataCatalog::load(&tmp.path().join("GameData")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn loads_nested_cfg_files_in_path_order() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b/sites.cfg", "KERBALSTATIC\n{\n\tid = second\n}\n");
        write(tmp.path(), "a/deep/sites.cfg", "KERBALSTATIC\n{\n\tid = first\n}\n");
        write(tmp.path(), "a/readme.txt", "KERBALSTATIC\n{\n\tid = ignored\n}\n");

        let catalog = GameDataCatalog::load(tmp.path()).unwrap();
        let ids: Vec<String> = catalog
            .nodes_tagged(STATIC_NODE)
            .iter()
            .filter_map(|n| n.get_value("id").map(str::to_string))
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn filters_by_tag() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "mixed.cfg",
            "PART\n{\n\tname = tank\n}\nKERBALSTATIC\n{\n}\n",
        );

        let catalog = GameDataCatalog::load(tmp.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.nodes_tagged(STATIC_NODE).len(), 1);
        assert_eq!(catalog.nodes_tagged("PART").len(), 1);
    }

    #[test]
    fn malformed_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "broken.cfg", "KERBALSTATIC\n{\n");
        write(tmp.path(), "good.cfg", "KERBALSTATIC\n{\n}\n");

        let catalog = GameDataCatalog::load(tmp.path()).unwrap();
        assert_eq!(catalog.nodes_tagged(STATIC_NODE).len(), 1);
    }
}
