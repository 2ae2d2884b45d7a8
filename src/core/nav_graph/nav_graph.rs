// src/core/nav_graph/nav_graph.rs
use std::collections::HashMap;
use std::path::Path;
use serde::{Serialize, Deserialize};

use super::call_extractor::EdgeKind;
use super::classifier::NodeType;

/// A view discovered from one markup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavNode {
    /// Canonical path of the markup file, unique within a graph
    pub id: String,
    /// File name without the markup extension
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Always equal to `id`
    pub source_path: String,
}

impl NavNode {
    pub fn new(canonical_path: String, label: String, node_type: NodeType) -> Self {
        Self {
            source_path: canonical_path.clone(),
            id: canonical_path,
            label,
            node_type,
        }
    }

    /// Display name for a markup path: `Views/MainWindow.xaml` -> `MainWindow`
    pub fn label_for(path: &Path) -> String {
        path.file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// A resolved navigation from one view to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Read-only navigation graph produced by one build.
///
/// Nodes are kept in discovery order with a side index from id to position,
/// so lookups are cheap and iteration order stays meaningful.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NavigationGraph {
    nodes: Vec<NavNode>,
    edges: Vec<NavEdge>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl NavigationGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a graph from already-validated parts: ids unique and every
    /// edge endpoint present in `nodes`.
    pub(crate) fn from_parts(nodes: Vec<NavNode>, edges: Vec<NavEdge>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();

        let graph = Self { nodes, edges, index };
        debug_assert_eq!(graph.index.len(), graph.nodes.len(), "duplicate node id");
        debug_assert!(graph
            .edges
            .iter()
            .all(|e| graph.index.contains_key(&e.from) && graph.index.contains_key(&e.to)));
        graph
    }

    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[NavEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&NavNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Edges leaving `id`
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a NavEdge> + 'a {
        self.edges.iter().filter(move |e| e.from == id)
    }

    /// Edges arriving at `id`
    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a NavEdge> + 'a {
        self.edges.iter().filter(move |e| e.to == id)
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.incoming(id).count()
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.outgoing(id).count()
    }

    /// Views nothing navigates to but that open at least one other view
    pub fn entry_views(&self) -> Vec<&NavNode> {
        self.nodes
            .iter()
            .filter(|n| self.in_degree(&n.id) == 0 && self.out_degree(&n.id) > 0)
            .collect()
    }

    /// Views with no edges at all
    pub fn isolated_views(&self) -> Vec<&NavNode> {
        self.nodes
            .iter()
            .filter(|n| self.in_degree(&n.id) == 0 && self.out_degree(&n.id) == 0)
            .collect()
    }

    pub fn count_by_type(&self, node_type: NodeType) -> usize {
        self.nodes.iter().filter(|n| n.node_type == node_type).count()
    }

    pub fn count_by_kind(&self, kind: EdgeKind) -> usize {
        self.edges.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NavigationGraph {
        let nodes = vec![
            NavNode::new("/p/Main.xaml".into(), "Main".into(), NodeType::Window),
            NavNode::new("/p/Login.xaml".into(), "Login".into(), NodeType::Dialog),
            NavNode::new("/p/Header.xaml".into(), "Header".into(), NodeType::UserControl),
        ];
        let edges = vec![NavEdge {
            from: "/p/Main.xaml".into(),
            to: "/p/Login.xaml".into(),
            kind: EdgeKind::ShowDialog,
        }];
        NavigationGraph::from_parts(nodes, edges)
    }

    #[test]
    fn test_label_for_strips_extension() {
        assert_eq!(NavNode::label_for(Path::new("Views/MainWindow.xaml")), "MainWindow");
        assert_eq!(NavNode::label_for(Path::new("Shell.xaml")), "Shell");
    }

    #[test]
    fn test_node_id_equals_source_path() {
        let node = NavNode::new("/p/A.xaml".into(), "A".into(), NodeType::Page);
        assert_eq!(node.id, node.source_path);
    }

    #[test]
    fn test_lookup_and_degrees() {
        let graph = sample();

        assert_eq!(graph.node("/p/Login.xaml").unwrap().label, "Login");
        assert_eq!(graph.node("/p/Header.xaml").unwrap().node_type, NodeType::UserControl);
        assert!(graph.node("/p/Missing.xaml").is_none());
        assert_eq!(graph.out_degree("/p/Main.xaml"), 1);
        assert_eq!(graph.in_degree("/p/Login.xaml"), 1);
    }

    #[test]
    fn test_entry_and_isolated_views() {
        let graph = sample();

        let entries: Vec<&str> = graph.entry_views().iter().map(|n| n.label.as_str()).collect();
        let isolated: Vec<&str> = graph.isolated_views().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(entries, vec!["Main"]);
        assert_eq!(isolated, vec!["Header"]);
    }

    #[test]
    fn test_counts() {
        let graph = sample();
        assert_eq!(graph.count_by_type(NodeType::Dialog), 1);
        assert_eq!(graph.count_by_kind(EdgeKind::ShowDialog), 1);
        assert_eq!(graph.count_by_kind(EdgeKind::Navigate), 0);
    }

    #[test]
    fn test_serializes_as_plain_data() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["nodes"][0]["type"], "Window");
        assert_eq!(json["nodes"][0]["sourcePath"], "/p/Main.xaml");
        assert_eq!(json["edges"][0]["kind"], "ShowDialog");
        assert!(json.get("index").is_none());
    }

    #[test]
    fn test_empty_graph() {
        let graph = NavigationGraph::empty();
        assert!(graph.is_empty());
        assert!(graph.edges().is_empty());
    }
}
