//! Definition Store: the hierarchical key/value tree used for site files.
//!
//! A `ConfigNode` holds an ordered list of `key = value` pairs (duplicate
//! keys allowed) and an ordered list of named child nodes (duplicate names
//! allowed, representing repeated elements). The text form is the
//! brace-delimited format used by the host's configuration files:
//!
//! ```text
//! KERBALSTATIC
//! {
//!     bundleIdentifier = makinghistory_assets
//!     LAUNCHSITESITUATION
//!     {
//!         launchSiteName = Outpost Alpha
//!         facility = VAB
//!     }
//! }
//! ```
//!
//! A parsed file is wrapped in an anonymous root node; serializing a root
//! writes only its contents.

use std::fmt;

use crate::error::NodeError;

/// Name given to the anonymous node wrapping a whole file.
pub const ROOT_NODE_NAME: &str = "root";

/// One node of the Definition Store tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    name: String,
    values: Vec<(String, String)>,
    nodes: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Create an empty node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Create an empty anonymous root node.
    pub fn root() -> Self {
        Self::new(ROOT_NODE_NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether at least one value with this key exists.
    pub fn has_value(&self, key: &str) -> bool {
        self.values.iter().any(|(k, _)| k == key)
    }

    /// First value stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values stored under `key`, in insertion order.
    pub fn get_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.values
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Append a value. Line breaks are flattened so the value survives a
    /// save/load cycle.
    pub fn add_value(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.values
            .push((key.into(), flatten_line_breaks(&value.to_string())));
    }

    /// Replace the first value stored under `key`, or append one.
    pub fn set_value(&mut self, key: &str, value: impl fmt::Display) {
        let value = flatten_line_breaks(&value.to_string());
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.values.push((key.to_string(), value)),
        }
    }

    /// All key/value pairs in order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether at least one child node with this name exists.
    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    /// First child node with this name.
    pub fn get_node(&self, name: &str) -> Option<&ConfigNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// All child nodes with this name, in order.
    pub fn get_nodes<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> + 'a {
        self.nodes.iter().filter(move |n| n.name == name)
    }

    /// All child nodes in order.
    pub fn nodes(&self) -> &[ConfigNode] {
        &self.nodes
    }

    /// Append a child node and return a handle to it.
    pub fn add_node(&mut self, node: ConfigNode) -> &mut ConfigNode {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Parse the text form of a file into an anonymous root node.
    pub fn parse(text: &str) -> Result<ConfigNode, NodeError> {
        let mut stack = vec![ConfigNode::root()];
        let mut pending: Option<(String, usize)> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let mut rest = strip_comment(raw).trim();

            while !rest.is_empty() {
                if let Some(after) = rest.strip_prefix('{') {
                    let Some((name, _)) = pending.take() else {
                        return Err(NodeError::UnexpectedOpenBrace { line });
                    };
                    stack.push(ConfigNode::new(name));
                    rest = after.trim_start();
                } else if let Some(after) = rest.strip_prefix('}') {
                    if let Some((name, line)) = pending.take() {
                        return Err(NodeError::DanglingName { name, line });
                    }
                    if stack.len() == 1 {
                        return Err(NodeError::UnexpectedCloseBrace { line });
                    }
                    if let Some(done) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.nodes.push(done);
                        }
                    }
                    rest = after.trim_start();
                } else {
                    if let Some((name, line)) = pending.take() {
                        return Err(NodeError::DanglingName { name, line });
                    }
                    let boundary = rest.find(['=', '{', '}']).unwrap_or(rest.len());
                    if rest[boundary..].starts_with('=') {
                        let key = rest[..boundary].trim();
                        // A value runs to the end of the line or to a closing brace.
                        let tail = &rest[boundary + 1..];
                        let end = tail.find('}').unwrap_or(tail.len());
                        if let Some(current) = stack.last_mut() {
                            current
                                .values
                                .push((key.to_string(), tail[..end].trim().to_string()));
                        }
                        rest = &tail[end..];
                    } else {
                        pending = Some((rest[..boundary].trim().to_string(), line));
                        rest = rest[boundary..].trim_start();
                    }
                }
            }
        }

        if let Some((name, line)) = pending {
            return Err(NodeError::DanglingName { name, line });
        }
        if stack.len() > 1 {
            let name = stack.last().map(|n| n.name.clone()).unwrap_or_default();
            return Err(NodeError::Unclosed { name });
        }
        Ok(stack.pop().unwrap_or_default())
    }

    /// Serialize the contents of this node (values, then children) without
    /// the node's own name. This is the on-disk form of a root node.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_contents(&mut out, 0);
        out
    }

    fn write_contents(&self, out: &mut String, depth: usize) {
        let indent = "\t".repeat(depth);
        for (key, value) in &self.values {
            out.push_str(&format!("{indent}{key} = {value}\n"));
        }
        for node in &self.nodes {
            out.push_str(&format!("{indent}{}\n{indent}{{\n", node.name));
            node.write_contents(out, depth + 1);
            out.push_str(&format!("{indent}}}\n"));
        }
    }
}

impl fmt::Display for ConfigNode {
    /// Writes the node as a named block, including its own name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = format!("{}\n{{\n", self.name);
        self.write_contents(&mut out, 1);
        out.push_str("}\n");
        f.write_str(&out)
    }
}

/// Marker that starts a line comment.
pub const COMMENT_MARKER: &str = "//";

/// Whether `value` survives a save/load cycle unchanged. A `}` ends the
/// value early and a comment marker truncates it.
pub fn is_storable_value(value: &str) -> bool {
    !value.contains('}') && !value.contains(COMMENT_MARKER)
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn flatten_line_breaks(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
