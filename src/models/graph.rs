//! Directory graph node types as delivered by the document store.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Node Identifier
// =============================================================================

/// Identifier of a node in the directory graph.
///
/// Ids are opaque strings owned by the document store; the engine only
/// compares and clones them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Node Kind
// =============================================================================

/// Kind of a directory graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Directory,
    /// A directory shortcut; traversed like a directory.
    DirectoryAlias,
    File,
}

impl NodeKind {
    /// Whether the resolver may step into a node of this kind.
    pub fn is_directory(self) -> bool {
        matches!(self, Self::Directory | Self::DirectoryAlias)
    }
}

// =============================================================================
// Node
// =============================================================================

/// A single file or directory record from the document store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGraphNode {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    pub kind: NodeKind,
    #[serde(default)]
    pub content: Option<String>,
    /// Short description shown by `cat` when a file has no content
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trashed: bool,
    #[serde(default)]
    pub owner: Option<String>,
}

impl DirectoryGraphNode {
    /// Create a directory node.
    pub fn directory(id: impl Into<NodeId>, name: impl Into<String>, parent: Option<&str>) -> Self {
        Self::with_kind(id, name, parent, NodeKind::Directory)
    }

    /// Create a file node with optional content.
    pub fn file(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        parent: Option<&str>,
        content: Option<&str>,
    ) -> Self {
        let mut node = Self::with_kind(id, name, parent, NodeKind::File);
        node.content = content.map(str::to_string);
        node
    }

    pub fn with_kind(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        parent: Option<&str>,
        kind: NodeKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent.map(NodeId::from),
            kind,
            content: None,
            description: None,
            trashed: false,
            owner: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_from_provider_json() {
        let json = r#"{
            "id": "n1",
            "name": "notes.txt",
            "parentId": "home",
            "kind": "file",
            "content": "hi",
            "trashed": false,
            "owner": "alice"
        }"#;
        let node: DirectoryGraphNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.id, "n1");
        assert_eq!(node.parent_id, Some(NodeId::from("home")));
        assert_eq!(node.kind, NodeKind::File);
        assert_eq!(node.content.as_deref(), Some("hi"));
        assert!(node.description.is_none());
    }

    #[test]
    fn test_kind_wire_names() {
        let kind: NodeKind = serde_json::from_str("\"directory-alias\"").unwrap();
        assert_eq!(kind, NodeKind::DirectoryAlias);
        assert!(kind.is_directory());
        assert!(!NodeKind::File.is_directory());
    }

    #[test]
    fn test_missing_optional_fields() {
        let json = r#"{ "id": "root", "name": "", "kind": "directory" }"#;
        let node: DirectoryGraphNode = serde_json::from_str(json).unwrap();
        assert!(node.parent_id.is_none());
        assert!(!node.trashed);
        assert!(node.owner.is_none());
    }
}
