// src/core/exporter.rs
use std::path::Path;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tera::{Context, Tera};

use crate::config::{ExportFormat, OutputConfig};
use crate::error::{XamlNavError, Result};
use super::nav_graph::{NavigationGraph, NodeType};

const MARKDOWN_TEMPLATE: &str = r#"# Navigation map{% if project %}: {{ project }}{% endif %}
{% if metadata %}
_Generated {{ metadata.generatedAt }} by xamlnav {{ metadata.version }}, fingerprint `{{ metadata.fingerprint | truncate(length=12, end="") }}`_
{% endif %}
## Views ({{ views | length }})

| View | Type | Out | In | Path |
|------|------|----:|---:|------|
{% for view in views %}| {{ view.label }} | {{ view.kind }} | {{ view.outgoing }} | {{ view.incoming }} | `{{ view.path }}` |
{% endfor %}
## Navigation ({{ links | length }})
{% if links %}
{% for link in links %}- {{ link.from }} --{{ link.kind }}--> {{ link.to }}
{% endfor %}{% else %}
No navigation calls could be resolved.
{% endif %}"#;

/// Summary written alongside exported graphs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub fingerprint: String,
}

#[derive(Serialize)]
struct ViewRow<'a> {
    label: &'a str,
    kind: &'static str,
    outgoing: usize,
    incoming: usize,
    path: &'a str,
}

#[derive(Serialize)]
struct LinkRow<'a> {
    from: &'a str,
    to: &'a str,
    kind: &'static str,
}

/// Renders a navigation graph as JSON, Graphviz DOT or a Markdown report
pub struct GraphExporter {
    project_name: Option<String>,
    include_metadata: bool,
}

impl GraphExporter {
    pub fn new(project_name: Option<String>, output: &OutputConfig) -> Self {
        Self {
            project_name,
            include_metadata: output.include_metadata,
        }
    }

    /// Render and write to `path`
    pub fn export(&self, graph: &NavigationGraph, format: ExportFormat, path: &Path) -> Result<()> {
        let content = self.render(graph, format)?;
        let write_error = |e: std::io::Error| {
            XamlNavError::Export(format!("Cannot write {}: {}", path.display(), e))
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, content).map_err(write_error)?;
        Ok(())
    }

    pub fn render(&self, graph: &NavigationGraph, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => self.to_json(graph),
            ExportFormat::Dot => Ok(self.to_dot(graph)),
            ExportFormat::Markdown => self.to_markdown(graph),
        }
    }

    /// SHA-256 over node ids, types and edges, stable for identical graphs
    pub fn fingerprint(graph: &NavigationGraph) -> String {
        let mut hasher = Sha256::new();
        for node in graph.nodes() {
            hasher.update(format!("node|{}|{}\n", node.id, node.node_type).as_bytes());
        }
        for edge in graph.edges() {
            hasher.update(format!("edge|{}|{}|{}\n", edge.from, edge.to, edge.kind).as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    pub fn metadata(graph: &NavigationGraph) -> GraphMetadata {
        GraphMetadata {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: Utc::now().to_rfc3339(),
            node_count: graph.nodes().len(),
            edge_count: graph.edges().len(),
            fingerprint: Self::fingerprint(graph),
        }
    }

    fn to_json(&self, graph: &NavigationGraph) -> Result<String> {
        let mut value = serde_json::to_value(graph)?;
        if self.include_metadata {
            value["metadata"] = serde_json::to_value(Self::metadata(graph))?;
        }
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn to_dot(&self, graph: &NavigationGraph) -> String {
        let mut lines = Vec::new();

        lines.push("digraph Navigation {".to_string());
        lines.push("    rankdir=LR;".to_string());
        lines.push("    node [fontname=\"Helvetica\", fontsize=12];".to_string());
        lines.push("    edge [fontname=\"Helvetica\", fontsize=10];".to_string());
        if self.include_metadata {
            lines.push(format!(
                "    // {} views, {} edges, fingerprint {}",
                graph.nodes().len(),
                graph.edges().len(),
                Self::fingerprint(graph)
            ));
        }
        lines.push("".to_string());

        for node in graph.nodes() {
            let (shape, color) = Self::node_style(node.node_type);
            lines.push(format!(
                "    \"{}\" [label=\"{}\\n«{}»\", shape={}, style=\"filled\", fillcolor=\"{}\"];",
                Self::escape(&node.id),
                Self::escape(&node.label),
                node.node_type,
                shape,
                color
            ));
        }

        if !graph.edges().is_empty() {
            lines.push("".to_string());
        }

        for edge in graph.edges() {
            lines.push(format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"];",
                Self::escape(&edge.from),
                Self::escape(&edge.to),
                edge.kind
            ));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }

    fn to_markdown(&self, graph: &NavigationGraph) -> Result<String> {
        let views: Vec<ViewRow> = graph
            .nodes()
            .iter()
            .map(|n| ViewRow {
                label: &n.label,
                kind: n.node_type.as_str(),
                outgoing: graph.out_degree(&n.id),
                incoming: graph.in_degree(&n.id),
                path: &n.source_path,
            })
            .collect();

        // Edges carry ids; the report shows labels
        let label_of = |id: &str| graph.node(id).map(|n| n.label.as_str()).unwrap_or("?");
        let links: Vec<LinkRow> = graph
            .edges()
            .iter()
            .map(|e| LinkRow {
                from: label_of(&e.from),
                to: label_of(&e.to),
                kind: e.kind.as_str(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("project", &self.project_name);
        context.insert("views", &views);
        context.insert("links", &links);
        context.insert("metadata", &self.include_metadata.then(|| Self::metadata(graph)));

        Ok(Tera::one_off(MARKDOWN_TEMPLATE, &context, false)?)
    }

    fn node_style(node_type: NodeType) -> (&'static str, &'static str) {
        match node_type {
            NodeType::Window => ("box", "#cfe2ff"),
            NodeType::Page => ("note", "#d1e7dd"),
            NodeType::Dialog => ("octagon", "#fff3cd"),
            NodeType::UserControl => ("component", "#e2e3e5"),
        }
    }

    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::nav_graph::{EdgeKind, NavEdge, NavNode};
    use assert_fs::prelude::*;
    use predicates::prelude::*;

    fn graph() -> NavigationGraph {
        NavigationGraph::from_parts(
            vec![
                NavNode::new("/p/Main.xaml".into(), "Main".into(), NodeType::Window),
                NavNode::new("/p/About.xaml".into(), "About".into(), NodeType::Dialog),
            ],
            vec![NavEdge {
                from: "/p/Main.xaml".into(),
                to: "/p/About.xaml".into(),
                kind: EdgeKind::ShowDialog,
            }],
        )
    }

    fn exporter(include_metadata: bool) -> GraphExporter {
        let mut output = Config::default().output;
        output.include_metadata = include_metadata;
        GraphExporter::new(Some("Demo".to_string()), &output)
    }

    #[test]
    fn test_json_with_metadata() {
        let json = exporter(true).render(&graph(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"][0]["from"], "/p/Main.xaml");
        assert_eq!(value["metadata"]["nodeCount"], 2);
        assert_eq!(value["metadata"]["fingerprint"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_json_without_metadata() {
        let json = exporter(false).render(&graph(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let a = GraphExporter::fingerprint(&graph());
        assert_eq!(a, GraphExporter::fingerprint(&graph()));
        assert_ne!(a, GraphExporter::fingerprint(&NavigationGraph::empty()));
    }

    #[test]
    fn test_dot_output() {
        let dot = exporter(false).render(&graph(), ExportFormat::Dot).unwrap();

        assert!(dot.starts_with("digraph Navigation {"));
        assert!(dot.contains("\"/p/About.xaml\" [label=\"About\\n«Dialog»\", shape=octagon"));
        assert!(dot.contains("\"/p/Main.xaml\" -> \"/p/About.xaml\" [label=\"ShowDialog\"];"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn test_dot_escapes_quotes() {
        assert_eq!(GraphExporter::escape(r#"C:\a "b""#), r#"C:\\a \"b\""#);
    }

    #[test]
    fn test_markdown_report() {
        let md = exporter(true).render(&graph(), ExportFormat::Markdown).unwrap();

        assert!(md.starts_with("# Navigation map: Demo"));
        assert!(md.contains("## Views (2)"));
        assert!(md.contains("| Main | Window | 1 | 0 | `/p/Main.xaml` |"));
        assert!(md.contains("- Main --ShowDialog--> About"));
        assert!(md.contains("by xamlnav"));
    }

    #[test]
    fn test_markdown_report_for_empty_graph() {
        let md = exporter(false)
            .render(&NavigationGraph::empty(), ExportFormat::Markdown)
            .unwrap();

        assert!(md.contains("## Views (0)"));
        assert!(md.contains("No navigation calls could be resolved."));
        assert!(!md.contains("Generated"));
    }

    #[test]
    fn test_export_writes_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let out = temp.child("out/graph.dot");

        exporter(true)
            .export(&graph(), ExportFormat::Dot, out.path())
            .unwrap();

        out.assert(predicate::path::exists());
        out.assert(predicate::str::contains("digraph Navigation"));
    }

    #[test]
    fn test_export_failure_is_export_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let blocker = temp.child("taken");
        blocker.write_str("not a directory").unwrap();

        let result = exporter(false).export(
            &graph(),
            ExportFormat::Json,
            &blocker.path().join("graph.json"),
        );

        assert!(matches!(result, Err(XamlNavError::Export(_))));
    }
}
