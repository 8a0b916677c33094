use std::collections::HashMap;

use log::warn;

use crate::config::{DEFAULT_MAX_PATH_DEPTH, MIN_PATH_DEPTH};
use crate::core::error::GraphError;
use crate::models::{DirectoryGraphNode, NodeId};

/// Read-only snapshot of the document store's directory graph.
///
/// Nodes are addressed by [`NodeId`]. Children keep the order in which the
/// provider delivered them, and trashed nodes are invisible to listing and
/// resolution alike.
///
/// # Path Convention
///
/// - Root of the graph: `/`
/// - Home node: `~`
/// - Below home: `~/docs/notes.txt`
/// - Outside home: `/shared/readme.txt`
#[derive(Clone, Debug)]
pub struct DirectoryGraph {
    nodes: Vec<DirectoryGraphNode>,
    index: HashMap<NodeId, usize>,
    /// Child indices per parent, in provider order
    children: HashMap<NodeId, Vec<usize>>,
    root: NodeId,
    /// Ancestor-walk bound for [`Self::path_to_string`]
    max_depth: usize,
}

impl DirectoryGraph {
    /// Build a graph whose root is the first parentless, non-trashed directory.
    pub fn from_nodes(nodes: Vec<DirectoryGraphNode>) -> Result<Self, GraphError> {
        let root = nodes
            .iter()
            .find(|n| n.parent_id.is_none() && n.is_directory() && !n.trashed)
            .map(|n| n.id.clone())
            .ok_or(GraphError::MissingRoot)?;
        Self::with_root(nodes, root)
    }

    /// Build a graph with an explicit root node.
    pub fn with_root(nodes: Vec<DirectoryGraphNode>, root: NodeId) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateId(node.id.clone()));
            }
        }

        let mut children: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            if let Some(parent) = &node.parent_id {
                children.entry(parent.clone()).or_default().push(i);
            }
        }

        match index.get(&root).map(|&i| &nodes[i]) {
            None => return Err(GraphError::UnknownNode(root)),
            Some(node) if !node.is_directory() => return Err(GraphError::NotADirectory(root)),
            Some(_) => {}
        }

        Ok(Self {
            nodes,
            index,
            children,
            root,
            max_depth: DEFAULT_MAX_PATH_DEPTH,
        })
    }

    /// Parse the provider's JSON node list.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let nodes: Vec<DirectoryGraphNode> =
            serde_json::from_str(json).map_err(|e| GraphError::Parse(e.to_string()))?;
        Self::from_nodes(nodes)
    }

    /// Set the ancestor-walk bound; values below the minimum are raised to it.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(MIN_PATH_DEPTH);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn root(&self) -> &NodeId {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by id, including trashed nodes.
    pub fn node(&self, id: &str) -> Option<&DirectoryGraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Whether `id` names a live directory (or directory alias).
    pub fn is_directory(&self, id: &str) -> bool {
        self.node(id).is_some_and(|n| n.is_directory() && !n.trashed)
    }

    /// Parent of a node, if the parent exists in this snapshot.
    fn parent_of(&self, id: &str) -> Option<&NodeId> {
        let parent = self.node(id)?.parent_id.as_ref()?;
        self.index.contains_key(parent).then_some(parent)
    }

    /// Live children of a node in provider order.
    pub fn children(&self, id: &str) -> impl Iterator<Item = &DirectoryGraphNode> {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(|&i| &self.nodes[i])
            .filter(|n| !n.trashed)
    }

    /// Find a live child by exact name.
    pub fn child_named(&self, id: &str, name: &str) -> Option<&DirectoryGraphNode> {
        self.children(id).find(|n| n.name == name)
    }

    /// Resolve a path expression to a directory node.
    ///
    /// # Arguments
    /// - `start`: Directory relative paths begin from (usually cwd)
    /// - `home`: Node addressed by `~`
    /// - `path`: Absolute (`/a/b`), home-relative (`~/a`) or relative (`a/../b`)
    ///
    /// # Returns
    /// The resolved directory id, or `None` as soon as a segment does not name
    /// a live child directory. `..` at a parentless node stays put.
    pub fn resolve(&self, start: &NodeId, home: &NodeId, path: &str) -> Option<NodeId> {
        if path.is_empty() || path == "." {
            return self.node(start.as_str()).map(|_| start.clone());
        }
        if path == "~" {
            return self.node(home.as_str()).map(|_| home.clone());
        }

        let (mut current, rest) = if let Some(rest) = path.strip_prefix('/') {
            (&self.root, rest)
        } else if let Some(rest) = path.strip_prefix("~/") {
            (home, rest)
        } else {
            (start, path)
        };
        self.node(current.as_str())?;

        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            match segment {
                "." => {}
                ".." => {
                    if let Some(parent) = self.parent_of(current.as_str()) {
                        if self.node(parent.as_str())?.trashed {
                            return None;
                        }
                        current = parent;
                    }
                }
                name => {
                    let child = self.child_named(current.as_str(), name)?;
                    if !child.is_directory() {
                        return None;
                    }
                    current = &child.id;
                }
            }
        }

        Some(current.clone())
    }

    /// Resolve a path whose final segment may be a file.
    ///
    /// The directory part must resolve with [`Self::resolve`]; the leaf is then
    /// looked up among the live children of that directory. A trailing `/`
    /// only matches a directory.
    pub fn resolve_file(
        &self,
        start: &NodeId,
        home: &NodeId,
        path: &str,
    ) -> Option<&DirectoryGraphNode> {
        let node = self.resolve_leaf(start, home, path)?;
        (!path.ends_with('/') || node.is_directory()).then_some(node)
    }

    fn resolve_leaf(
        &self,
        start: &NodeId,
        home: &NodeId,
        path: &str,
    ) -> Option<&DirectoryGraphNode> {
        let trimmed = path.trim_end_matches('/');
        let (dir_part, leaf) = match trimmed.rsplit_once('/') {
            Some((dir, leaf)) => (if dir.is_empty() { "/" } else { dir }, leaf),
            None => ("", trimmed),
        };

        if matches!(leaf, "" | "." | ".." | "~") {
            let id = self.resolve(start, home, path)?;
            return self.node(id.as_str());
        }

        let dir = self.resolve(start, home, dir_part)?;
        self.child_named(dir.as_str(), leaf)
    }

    /// Whether `id` is a live directory with no trashed ancestor.
    ///
    /// The upward walk is bounded by `max_depth`; a walk that hits the bound
    /// counts as unreachable.
    pub fn is_reachable_directory(&self, id: &str) -> bool {
        if !self.is_directory(id) {
            return false;
        }
        let mut current = id;
        for _ in 0..self.max_depth {
            let Some(parent) = self.parent_of(current) else {
                return true;
            };
            if self.node(parent.as_str()).is_some_and(|n| n.trashed) {
                return false;
            }
            current = parent.as_str();
        }
        warn!("ancestor walk for {} exceeded depth {}", id, self.max_depth);
        false
    }

    /// Render a node as a `~`-relative or absolute display path.
    ///
    /// Walks parent pointers upward until `home` or a parentless node is
    /// reached. The walk is bounded by `max_depth`; on malformed (cyclic)
    /// data the collected suffix is returned prefixed with `...`.
    pub fn path_to_string(&self, id: &NodeId, home: &NodeId) -> String {
        if id == home {
            return "~".to_string();
        }

        let mut names: Vec<&str> = Vec::new();
        let mut current = id;

        loop {
            if current == home {
                names.reverse();
                return format!("~/{}", names.join("/"));
            }
            let Some(parent) = self.parent_of(current.as_str()) else {
                break;
            };
            if names.len() >= self.max_depth {
                warn!(
                    "path walk for {} exceeded depth {}; graph may contain a cycle",
                    id, self.max_depth
                );
                names.reverse();
                return format!(".../{}", names.join("/"));
            }
            if let Some(node) = self.node(current.as_str()) {
                names.push(node.name.as_str());
            }
            current = parent;
        }

        names.reverse();
        format!("/{}", names.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;

    /// Root layout:
    ///
    /// ```text
    /// /                      root
    /// ├── Users/             users
    /// │   └── alice/         home
    /// │       ├── docs/      docs
    /// │       │   └── a.txt  a-txt
    /// │       ├── notes.txt  notes
    /// │       ├── link/      alias (directory-alias)
    /// │       ├── old/       trashed directory
    /// │       └── empty/     empty
    /// └── shared/            shared
    /// ```
    fn create_test_graph() -> DirectoryGraph {
        let mut old = DirectoryGraphNode::directory("old", "old", Some("home"));
        old.trashed = true;
        DirectoryGraph::from_nodes(vec![
            DirectoryGraphNode::directory("root", "", None),
            DirectoryGraphNode::directory("users", "Users", Some("root")),
            DirectoryGraphNode::directory("home", "alice", Some("users")),
            DirectoryGraphNode::directory("docs", "docs", Some("home")),
            DirectoryGraphNode::file("a-txt", "a.txt", Some("docs"), Some("alpha")),
            DirectoryGraphNode::file("notes", "notes.txt", Some("home"), None),
            DirectoryGraphNode::with_kind("alias", "link", Some("home"), NodeKind::DirectoryAlias),
            old,
            DirectoryGraphNode::directory("empty", "empty", Some("home")),
            DirectoryGraphNode::directory("shared", "shared", Some("root")),
        ])
        .unwrap()
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_root_detection() {
        let graph = create_test_graph();
        assert_eq!(graph.root(), "root");
        assert_eq!(graph.len(), 10);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = DirectoryGraph::from_nodes(vec![
            DirectoryGraphNode::directory("root", "", None),
            DirectoryGraphNode::directory("root", "again", None),
        ])
        .unwrap_err();
        assert_eq!(err, GraphError::DuplicateId(id("root")));
    }

    #[test]
    fn test_missing_root() {
        let err = DirectoryGraph::from_nodes(vec![DirectoryGraphNode::file(
            "f", "f", None, None,
        )])
        .unwrap_err();
        assert_eq!(err, GraphError::MissingRoot);
    }

    #[test]
    fn test_from_json() {
        let graph = DirectoryGraph::from_json(
            r#"[
                {"id": "r", "name": "", "parentId": null, "kind": "directory"},
                {"id": "d", "name": "docs", "parentId": "r", "kind": "directory"}
            ]"#,
        )
        .unwrap();
        assert_eq!(graph.resolve(&id("r"), &id("r"), "docs"), Some(id("d")));

        assert!(matches!(
            DirectoryGraph::from_json("{not json"),
            Err(GraphError::Parse(_))
        ));
    }

    #[test]
    fn test_resolve_current() {
        let graph = create_test_graph();
        assert_eq!(graph.resolve(&id("docs"), &id("home"), ""), Some(id("docs")));
        assert_eq!(graph.resolve(&id("docs"), &id("home"), "."), Some(id("docs")));
        assert_eq!(
            graph.resolve(&id("docs"), &id("home"), "./././"),
            Some(id("docs"))
        );
    }

    #[test]
    fn test_resolve_home() {
        let graph = create_test_graph();
        assert_eq!(graph.resolve(&id("docs"), &id("home"), "~"), Some(id("home")));
        assert_eq!(
            graph.resolve(&id("shared"), &id("home"), "~/docs"),
            Some(id("docs"))
        );
        assert_eq!(
            graph.resolve(&id("root"), &id("home"), "~/docs/../docs"),
            graph.resolve(&id("root"), &id("home"), "~/docs"),
        );
    }

    #[test]
    fn test_resolve_absolute() {
        let graph = create_test_graph();
        assert_eq!(graph.resolve(&id("docs"), &id("home"), "/"), Some(id("root")));
        assert_eq!(
            graph.resolve(&id("docs"), &id("home"), "/Users/alice/docs"),
            Some(id("docs"))
        );
        assert_eq!(
            graph.resolve(&id("docs"), &id("home"), "//shared//"),
            Some(id("shared"))
        );
    }

    #[test]
    fn test_resolve_parent() {
        let graph = create_test_graph();
        assert_eq!(graph.resolve(&id("docs"), &id("home"), ".."), Some(id("home")));
        assert_eq!(
            graph.resolve(&id("docs"), &id("home"), "../../.."),
            Some(id("root"))
        );
        // Root is a fixed point
        assert_eq!(
            graph.resolve(&id("root"), &id("home"), "../../../../.."),
            Some(id("root"))
        );
    }

    #[test]
    fn test_resolve_rejects_files_and_missing() {
        let graph = create_test_graph();
        assert_eq!(graph.resolve(&id("home"), &id("home"), "notes.txt"), None);
        assert_eq!(graph.resolve(&id("home"), &id("home"), "docs/a.txt"), None);
        assert_eq!(graph.resolve(&id("home"), &id("home"), "docs/a.txt/.."), None);
        assert_eq!(graph.resolve(&id("home"), &id("home"), "nope"), None);
        assert_eq!(graph.resolve(&id("home"), &id("home"), "nope/.."), None);
    }

    #[test]
    fn test_resolve_skips_trashed() {
        let graph = create_test_graph();
        assert_eq!(graph.resolve(&id("home"), &id("home"), "old"), None);
    }

    #[test]
    fn test_resolve_parent_refuses_trashed_directory() {
        let mut proj = DirectoryGraphNode::directory("proj", "proj", Some("home"));
        proj.trashed = true;
        let graph = DirectoryGraph::from_nodes(vec![
            DirectoryGraphNode::directory("home", "alice", None),
            proj,
            DirectoryGraphNode::directory("sub", "sub", Some("proj")),
        ])
        .unwrap();

        assert_eq!(graph.resolve(&id("sub"), &id("home"), ".."), None);
        assert_eq!(graph.resolve(&id("sub"), &id("home"), "../.."), None);
        assert_eq!(graph.resolve(&id("sub"), &id("home"), "~"), Some(id("home")));
    }

    #[test]
    fn test_reachable_directory() {
        let mut proj = DirectoryGraphNode::directory("proj", "proj", Some("home"));
        proj.trashed = true;
        let graph = DirectoryGraph::from_nodes(vec![
            DirectoryGraphNode::directory("home", "alice", None),
            proj,
            DirectoryGraphNode::directory("sub", "sub", Some("proj")),
            DirectoryGraphNode::directory("docs", "docs", Some("home")),
            DirectoryGraphNode::file("f", "f.txt", Some("home"), None),
        ])
        .unwrap();

        assert!(graph.is_reachable_directory("home"));
        assert!(graph.is_reachable_directory("docs"));
        assert!(!graph.is_reachable_directory("proj"));
        assert!(!graph.is_reachable_directory("sub"));
        assert!(!graph.is_reachable_directory("f"));
        assert!(!graph.is_reachable_directory("ghost"));
    }

    #[test]
    fn test_with_root() {
        let nodes = || {
            vec![
                DirectoryGraphNode::directory("root", "", None),
                DirectoryGraphNode::directory("home", "alice", Some("root")),
                DirectoryGraphNode::file("notes", "notes.txt", Some("home"), None),
            ]
        };

        let graph = DirectoryGraph::with_root(nodes(), id("home")).unwrap();
        assert_eq!(graph.root(), "home");
        assert_eq!(graph.resolve(&id("root"), &id("home"), "/"), Some(id("home")));

        assert_eq!(
            DirectoryGraph::with_root(nodes(), id("ghost")).unwrap_err(),
            GraphError::UnknownNode(id("ghost"))
        );
        assert_eq!(
            DirectoryGraph::with_root(nodes(), id("notes")).unwrap_err(),
            GraphError::NotADirectory(id("notes"))
        );
    }

    #[test]
    fn test_resolve_alias_is_traversable() {
        let graph = create_test_graph();
        assert_eq!(graph.resolve(&id("home"), &id("home"), "link"), Some(id("alias")));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let graph = create_test_graph();
        assert_eq!(graph.resolve(&id("home"), &id("home"), "DOCS"), None);
    }

    #[test]
    fn test_resolve_unknown_start() {
        let graph = create_test_graph();
        assert_eq!(graph.resolve(&id("ghost"), &id("home"), "docs"), None);
    }

    #[test]
    fn test_resolve_file() {
        let graph = create_test_graph();
        let home = id("home");

        let file = graph.resolve_file(&home, &home, "docs/a.txt").unwrap();
        assert_eq!(file.id, "a-txt");

        let file = graph.resolve_file(&id("docs"), &home, "../notes.txt").unwrap();
        assert_eq!(file.id, "notes");

        let dir = graph.resolve_file(&home, &home, "docs").unwrap();
        assert_eq!(dir.id, "docs");

        let dir = graph.resolve_file(&id("docs"), &home, "..").unwrap();
        assert_eq!(dir.id, "home");

        let root = graph.resolve_file(&home, &home, "/").unwrap();
        assert_eq!(root.id, "root");

        let users = graph.resolve_file(&home, &home, "/Users").unwrap();
        assert_eq!(users.id, "users");

        assert!(graph.resolve_file(&home, &home, "docs/missing.txt").is_none());
        assert!(graph.resolve_file(&home, &home, "missing/a.txt").is_none());
        assert!(graph.resolve_file(&home, &home, "notes.txt/x").is_none());
        assert!(graph.resolve_file(&home, &home, "notes.txt/").is_none());
        assert!(graph.resolve_file(&home, &home, "docs/a.txt/").is_none());
        assert_eq!(graph.resolve_file(&home, &home, "docs/").unwrap().id, "docs");
    }

    #[test]
    fn test_path_to_string() {
        let graph = create_test_graph();
        let home = id("home");
        assert_eq!(graph.path_to_string(&home, &home), "~");
        assert_eq!(graph.path_to_string(&id("docs"), &home), "~/docs");
        assert_eq!(graph.path_to_string(&id("a-txt"), &home), "~/docs/a.txt");
        assert_eq!(graph.path_to_string(&id("shared"), &home), "/shared");
        assert_eq!(graph.path_to_string(&id("users"), &home), "/Users");
        assert_eq!(graph.path_to_string(&id("root"), &home), "/");
    }

    #[test]
    fn test_path_to_string_terminates_on_cycle() {
        let graph = DirectoryGraph::from_nodes(vec![
            DirectoryGraphNode::directory("root", "", None),
            DirectoryGraphNode::directory("a", "a", Some("b")),
            DirectoryGraphNode::directory("b", "b", Some("a")),
        ])
        .unwrap();

        let path = graph.path_to_string(&id("a"), &id("root"));
        assert!(path.starts_with(".../"));
        assert_eq!(path.matches('/').count(), DEFAULT_MAX_PATH_DEPTH);
    }

    #[test]
    fn test_deep_tree_not_truncated() {
        let mut nodes = vec![DirectoryGraphNode::directory("root", "", None)];
        let mut parent = "root".to_string();
        for i in 0..100 {
            let node_id = format!("d{}", i);
            nodes.push(DirectoryGraphNode::directory(
                node_id.as_str(),
                format!("d{}", i),
                Some(parent.as_str()),
            ));
            parent = node_id;
        }
        let graph = DirectoryGraph::from_nodes(nodes).unwrap();

        let path = graph.path_to_string(&id("d99"), &id("elsewhere"));
        assert!(path.starts_with("/d0/d1/"));
        assert!(path.ends_with("/d99"));
    }

    #[test]
    fn test_max_depth_floor() {
        let graph = create_test_graph().with_max_depth(3);
        assert_eq!(graph.max_depth(), MIN_PATH_DEPTH);
    }

    #[test]
    fn test_children_order_and_trash() {
        let graph = create_test_graph();
        let names: Vec<_> = graph.children("home").map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["docs", "notes.txt", "link", "empty"]);
    }
}
