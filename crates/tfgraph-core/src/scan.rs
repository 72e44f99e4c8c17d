//! Edge discovery over raw graph text.
//!
//! The input is never parsed as DOT. Each line is checked for the edge marker
//! and for registry identifiers as plain substrings; every ordered pair of
//! distinct labels found together on a marked line becomes an edge. Direction
//! in the input is not inspected, and an identifier that is a prefix of another
//! (`module.alb` in `module.alb_security_group`) matches both.

use std::collections::HashSet;
use std::collections::hash_set;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::registry::{Entity, Registry};

/// The "points to" token of the graph description format.
pub const EDGE_MARKER: &str = "->";

/// A directed relationship between two registry labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge<'r> {
    pub source: &'r str,
    pub target: &'r str,
}

impl<'r> Edge<'r> {
    pub fn new(source: &'r str, target: &'r str) -> Self {
        Self { source, target }
    }
}

/// Deduplicated edges discovered in one input.
///
/// Iteration order is unspecified; renderers sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet<'r> {
    edges: HashSet<Edge<'r>>,
}

impl<'r> EdgeSet<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge. Self-loops are refused; returns whether the set changed.
    pub fn insert(&mut self, source: &'r str, target: &'r str) -> bool {
        if source == target {
            return false;
        }
        self.edges.insert(Edge::new(source, target))
    }

    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Edge<'r>> {
        self.edges.iter()
    }
}

/// Collect the edges of every line of `text`.
pub fn scan_edges<'r>(registry: &'r Registry, text: &str) -> EdgeSet<'r> {
    let mut edges = EdgeSet::new();
    let mut marked_lines = 0usize;

    for (index, line) in text.split('\n').enumerate() {
        if !line.contains(EDGE_MARKER) {
            continue;
        }
        marked_lines += 1;
        let added = scan_line(registry, line, &mut edges);
        if added > 0 {
            trace!(line = index + 1, added, "edges discovered");
        }
    }

    debug!(
        marked_lines,
        edges = edges.len(),
        entities = registry.len(),
        "scan complete"
    );
    edges
}

/// Add the edges of a single line that is known to carry the marker.
fn scan_line<'r>(registry: &'r Registry, line: &str, edges: &mut EdgeSet<'r>) -> usize {
    let present: SmallVec<[&'r Entity; 8]> = registry
        .entities()
        .iter()
        .filter(|entity| line.contains(entity.id.as_str()))
        .collect();

    let mut added = 0;
    for &source in &present {
        for &target in &present {
            // Same identifier, or two identifiers sharing a label.
            if source.label == target.label {
                continue;
            }
            if edges.insert(&source.label, &target.label) {
                added += 1;
            }
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, label: &str) -> Entity {
        Entity {
            id: id.to_string(),
            label: label.to_string(),
            description: None,
            fillcolor: None,
        }
    }

    #[test]
    fn insert_refuses_self_loops() {
        let mut edges = EdgeSet::new();
        assert!(!edges.insert("VPC", "VPC"));
        assert!(edges.insert("VPC", "ALB"));
        assert!(!edges.insert("VPC", "ALB"));
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn pair_on_marked_line_yields_both_directions() {
        let registry = Registry::builtin();
        let edges = scan_edges(registry, "aws_route53 -> aws_provider");
        assert_eq!(edges.len(), 2);
        assert!(edges.contains("Route53", "AWS Provider"));
        assert!(edges.contains("AWS Provider", "Route53"));
    }

    #[test]
    fn line_without_marker_is_ignored() {
        let registry = Registry::builtin();
        let edges = scan_edges(registry, "module.vpc module.alb depends_on");
        assert!(edges.is_empty());
    }

    #[test]
    fn single_entity_line_is_ignored() {
        let registry = Registry::builtin();
        let edges = scan_edges(registry, "module.vpc -> null_resource.other");
        assert!(edges.is_empty());
    }

    #[test]
    fn prefix_identifiers_both_match() {
        let registry = Registry::builtin();
        let edges = scan_edges(registry, "module.alb_security_group -> data.x");
        // module.alb is a substring of module.alb_security_group.
        assert_eq!(edges.len(), 2);
        assert!(edges.contains("ALB", "ALB Security Group"));
        assert!(edges.contains("ALB Security Group", "ALB"));
    }

    #[test]
    fn shared_labels_never_loop() {
        let registry = Registry::new(
            vec![
                entity("module.web", "Frontend"),
                entity("module.cdn", "Frontend"),
                entity("module.api", "Backend"),
            ],
            None,
            None,
        )
        .unwrap();
        let edges = scan_edges(&registry, "module.web -> module.cdn");
        assert!(edges.is_empty());

        let edges = scan_edges(&registry, "module.web -> module.api");
        assert_eq!(edges.len(), 2);
        assert!(edges.contains("Frontend", "Backend"));
    }

    #[test]
    fn marker_anywhere_on_line_counts() {
        let registry = Registry::builtin();
        let edges = scan_edges(registry, "\"module.vpc\" \"aws_route53\" [label=\"a->b\"]");
        assert!(edges.contains("VPC", "Route53"));
    }
}
