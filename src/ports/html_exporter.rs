//! Interactive HTML Exporter
//!
//! Renders a call graph as a self-contained vis-network page, plus the
//! index page linking every generated view. The exporter only ever sees
//! the plain node/edge graph.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use crate::domain::graph::DiGraph;
use crate::ports::GraphExporter;

/// Rendering options tuned for call-graph exploration: dot nodes, smooth
/// directed edges, barnes-hut physics with a strong repulsive field.
const NETWORK_OPTIONS: &str = r#"{
    "nodes": {
        "shape": "dot",
        "size": 20,
        "font": { "size": 14, "face": "Tahoma" }
    },
    "edges": {
        "arrows": "to",
        "color": { "inherit": true },
        "smooth": { "type": "continuous" }
    },
    "physics": {
        "barnesHut": {
            "gravitationalConstant": -80000,
            "centralGravity": 0.3,
            "springLength": 95,
            "springConstant": 0.04
        },
        "maxVelocity": 50,
        "minVelocity": 0.1,
        "solver": "barnesHut",
        "stabilization": { "enabled": true, "iterations": 1000, "updateInterval": 100 }
    }
}"#;

pub struct HtmlExporter;

impl HtmlExporter {
    /// Convert a graph to a vis-network HTML page.
    /// Nodes and edges are emitted in FQN order so repeated runs produce
    /// byte-identical pages.
    pub fn to_html(graph: &DiGraph, title: &str) -> String {
        let nodes: Vec<_> = graph
            .sorted_nodes()
            .into_iter()
            .map(|(fqn, info)| {
                json!({
                    "id": fqn,
                    "label": info.label,
                    "title": fqn,
                    "group": info.group,
                })
            })
            .collect();
        let edges: Vec<_> = graph
            .sorted_edges()
            .into_iter()
            .map(|(from, to)| json!({ "from": from, "to": to }))
            .collect();

        let mut page = String::new();
        page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        page.push_str("<meta charset=\"UTF-8\">\n");
        page.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        page.push_str(
            "<script src=\"https://unpkg.com/vis-network/standalone/umd/vis-network.min.js\"></script>\n",
        );
        page.push_str(
            "<style>\n#network { width: 100%; height: 800px; border: 1px solid #ddd; }\nbody { font-family: Arial, sans-serif; margin: 20px; color: #333; }\n</style>\n",
        );
        page.push_str("</head>\n<body>\n");
        page.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
        page.push_str(
            "<p>Interactive call graph. Drag nodes to rearrange, zoom with the mouse wheel, click a node to highlight its connections.</p>\n",
        );
        page.push_str("<div id=\"network\"></div>\n<script>\n");
        page.push_str(&format!(
            "var nodes = new vis.DataSet({});\n",
            serde_json::Value::Array(nodes)
        ));
        page.push_str(&format!(
            "var edges = new vis.DataSet({});\n",
            serde_json::Value::Array(edges)
        ));
        page.push_str("var container = document.getElementById(\"network\");\n");
        page.push_str(&format!(
            "var network = new vis.Network(container, {{ nodes: nodes, edges: edges }}, {});\n",
            NETWORK_OPTIONS
        ));
        page.push_str("</script>\n</body>\n</html>\n");
        page
    }

    /// Render the index page linking every generated view, grouped by
    /// graph level.
    pub fn render_index(function_pages: &[String], class_pages: &[String]) -> String {
        let mut page = String::new();
        page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        page.push_str("<meta charset=\"UTF-8\">\n<title>Call Graphs</title>\n");
        page.push_str(
            "<style>\nbody { font-family: Arial, sans-serif; margin: 20px; color: #333; }\nh1 { border-bottom: 2px solid #3498db; padding-bottom: 10px; }\nli { margin-bottom: 8px; }\na { color: #3498db; text-decoration: none; font-weight: bold; }\na:hover { text-decoration: underline; }\n</style>\n",
        );
        page.push_str("</head>\n<body>\n<h1>Call Graphs</h1>\n");
        page.push_str(
            "<p>Function-level graphs show call relationships between functions and methods; class-level graphs collapse them to their owning classes.</p>\n",
        );

        for (heading, pages) in [
            ("Function-Level Call Graphs", function_pages),
            ("Class-Level Call Graphs", class_pages),
        ] {
            if pages.is_empty() {
                continue;
            }
            page.push_str(&format!("<h2>{}</h2>\n<ul>\n", heading));
            for name in pages {
                page.push_str(&format!(
                    "<li><a href=\"{}\" target=\"_blank\">{}</a></li>\n",
                    escape_html(name),
                    escape_html(name)
                ));
            }
            page.push_str("</ul>\n");
        }

        page.push_str("</body>\n</html>\n");
        page
    }

    /// Write the index page to disk.
    pub fn write_index(
        function_pages: &[String],
        class_pages: &[String],
        path: &Path,
    ) -> Result<()> {
        fs::write(path, Self::render_index(function_pages, class_pages))
            .with_context(|| format!("Failed to write index page {}", path.display()))
    }
}

impl GraphExporter for HtmlExporter {
    fn export(&self, graph: &DiGraph, title: &str, path: &Path) -> Result<()> {
        fs::write(path, Self::to_html(graph, title))
            .with_context(|| format!("Failed to write graph page {}", path.display()))
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_embeds_nodes_and_edges() {
        let mut graph = DiGraph::new();
        graph.add_edge("pkg.mod.f", "pkg.mod.g");

        let html = HtmlExporter::to_html(&graph, "Function Call Graph: mod.py");
        assert!(html.contains("vis-network"));
        assert!(html.contains("\"id\":\"pkg.mod.f\""));
        assert!(html.contains("\"from\":\"pkg.mod.f\""));
        assert!(html.contains("\"to\":\"pkg.mod.g\""));
        assert!(html.contains("barnesHut"));
        assert!(html.contains("<h1>Function Call Graph: mod.py</h1>"));
    }

    #[test]
    fn test_to_html_is_deterministic() {
        let mut a = DiGraph::new();
        a.add_edge("pkg.b.y", "pkg.a.x");
        a.add_edge("pkg.a.x", "pkg.c.z");
        let mut b = DiGraph::new();
        b.add_edge("pkg.a.x", "pkg.c.z");
        b.add_edge("pkg.b.y", "pkg.a.x");

        assert_eq!(
            HtmlExporter::to_html(&a, "same"),
            HtmlExporter::to_html(&b, "same")
        );
    }

    #[test]
    fn test_index_groups_by_level() {
        let html = HtmlExporter::render_index(
            &["a_function.html".to_string()],
            &["a_class.html".to_string()],
        );
        assert!(html.contains("Function-Level Call Graphs"));
        assert!(html.contains("Class-Level Call Graphs"));
        assert!(html.contains("href=\"a_function.html\""));
    }

    #[test]
    fn test_index_omits_empty_sections() {
        let html = HtmlExporter::render_index(&["a_function.html".to_string()], &[]);
        assert!(!html.contains("Class-Level Call Graphs"));
    }

    #[test]
    fn test_title_is_escaped() {
        let graph = DiGraph::new();
        let html = HtmlExporter::to_html(&graph, "a < b & c");
        assert!(html.contains("a &lt; b &amp; c"));
    }
}
