//! Built-in definition catalog.
//!
//! The host loads its own configuration search path at startup; the site
//! pipeline only queries it for nodes carrying a marker tag.

use statics_types::node::ConfigNode;

/// Global read-only source of configuration nodes.
pub trait DefinitionCatalog: Send + Sync {
    /// Every top-level node named `tag`, in catalog order.
    fn nodes_tagged(&self, tag: &str) -> Vec<ConfigNode>;
}

/// Catalog backed by an in-memory list of nodes.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    nodes: Vec<ConfigNode>,
}

impl StaticCatalog {
    pub fn new(nodes: Vec<ConfigNode>) -> Self {
        Self { nodes }
    }

    pub fn push(&mut self, node: ConfigNode) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl DefinitionCatalog for StaticCatalog {
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

    #[test]
    fn nodes_tagged_filters_and_keeps_order() {
        let mut first = ConfigNode::new("KERBALSTATIC");
        first.add_value("id", 1);
        let mut second = ConfigNode::new("KERBALSTATIC");
        second.add_value("id", 2);

        let catalog = StaticCatalog::new(vec![
            first,
            ConfigNode::new("PART"),
            second,
        ]);

        let ids: Vec<String> = catalog
            .nodes_tagged("KERBALSTATIC")
            .iter()
            .filter_map(|n| n.get_value("id").map(str::to_string))
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(catalog.nodes_tagged("RESOURCE").is_empty());
    }
}
