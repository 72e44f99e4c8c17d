//! Rendering of the simplified graph.
//!
//! [`simplify`] is the whole tool in one call: scan the input for registry
//! entities, then render the fixed preamble, the info node, and the sorted,
//! deduplicated edges as a DOT document.

mod dot;

use std::collections::BTreeSet;

use tracing::debug;

pub use dot::{DotBuilder, INDENT, attr_value, edge_line, escape_label, quoted};
use tfgraph_core::{EdgeSet, Registry, scan_edges};

/// Default style applied to entity nodes.
pub const ENTITY_NODE_STYLE: &str =
    r#"shape=box, style="rounded,filled", fontname="Helvetica", fillcolor=lightblue"#;

/// Style override applied to the info node.
pub const INFO_NODE_STYLE: &str = "shape=note, fillcolor=lightyellow";

// ============================================================================
// Public API
// ============================================================================

/// Simplify `input` against the built-in registry.
///
/// Never fails: input without recognizable entities renders a document whose
/// discovered-edge section is empty.
pub fn simplify(input: &str) -> String {
    simplify_with(Registry::builtin(), input)
}

/// Simplify `input` against a caller-supplied registry.
pub fn simplify_with(registry: &Registry, input: &str) -> String {
    let edges = scan_edges(registry, input);
    render_document(registry, &edges)
}

/// Render discovered edges as indented DOT lines, sorted by their full text.
///
/// Sorting the rendered text rather than the label pairs matters when one
/// label is a prefix of another: `"ALB Security Group" -> …` sorts before
/// `"ALB" -> …` because a space orders before a quote.
pub fn render_edges(edges: &EdgeSet<'_>) -> Vec<String> {
    let lines: BTreeSet<String> = edges
        .iter()
        .map(|edge| edge_line(edge.source, edge.target, 1))
        .collect();
    lines.into_iter().collect()
}

/// Render the full document for `registry` and its discovered `edges`.
pub fn render_document(registry: &Registry, edges: &EdgeSet<'_>) -> String {
    let mut builder = DotBuilder::new();
    builder
        .attr("rankdir", "TB")
        .blank()
        .comment("Node definitions with better styling")
        .node_style(ENTITY_NODE_STYLE)
        .blank()
        .comment("Modules");

    for entity in registry.entities() {
        let mut attrs: Vec<(&str, &str)> = Vec::with_capacity(2);
        if let Some(description) = &entity.description {
            attrs.push(("description", description.as_str()));
        }
        if let Some(fillcolor) = &entity.fillcolor {
            attrs.push(("fillcolor", fillcolor.as_str()));
        }
        builder.node(&entity.label, &attrs);
    }

    let info = registry.info();
    let info_label = info.label();
    builder
        .blank()
        .comment("Variables")
        .node_style(INFO_NODE_STYLE)
        .node(&info.name, &[("label", info_label.as_str())])
        .blank()
        .comment("Dependencies")
        .edge(&info.name, &registry.entry().label);

    let lines = render_edges(edges);
    debug!(edges = lines.len(), "rendering discovered edges");
    for line in &lines {
        builder.line(line);
    }

    builder.build()
}
