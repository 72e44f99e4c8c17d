use tfgraph_core::Registry;
use tfgraph_dot::{simplify, simplify_with};

const DEPENDENCIES_HEADER: &str = "    # Dependencies";
const INFO_EDGE: &str = r#"    "Variables" -> "AWS Provider""#;

/// Lines after the fixed info edge and before the closing brace.
fn discovered_edges(document: &str) -> Vec<&str> {
    let lines: Vec<&str> = document.lines().collect();
    let start = lines
        .iter()
        .position(|line| *line == INFO_EDGE)
        .expect("info edge present");
    assert_eq!(lines.last(), Some(&"}"));
    lines[start + 1..lines.len() - 1].to_vec()
}

/// Quoted node declarations between the `# Modules` comment and the next blank line.
fn declared_nodes(document: &str) -> Vec<&str> {
    document
        .lines()
        .skip_while(|line| *line != "    # Modules")
        .skip(1)
        .take_while(|line| !line.is_empty())
        .collect()
}

fn sample_inputs() -> Vec<String> {
    vec![
        String::new(),
        "nothing to see here".to_string(),
        "module.vpc -> module.alb_security_group depends_on".to_string(),
        "aws_provider -> aws_route53\nmodule.alb -> module.vpc\n".to_string(),
        "module.vpc -> module.vpc\nmodule.alb\n->\n".to_string(),
    ]
}

#[test]
fn one_node_per_registry_entry() {
    let registry = Registry::builtin();
    for input in sample_inputs() {
        let output = simplify(&input);
        let nodes = declared_nodes(&output);
        assert_eq!(nodes.len(), registry.len(), "input: {input:?}");
        for (node, entity) in nodes.iter().zip(registry.entities()) {
            assert!(
                node.starts_with(&format!("    \"{}\"", entity.label)),
                "node {node:?} for {}",
                entity.id
            );
        }
    }
}

#[test]
fn never_renders_self_loops() {
    for input in sample_inputs() {
        let output = simplify(&input);
        for line in discovered_edges(&output) {
            let (source, target) = line.trim().split_once(" -> ").expect("edge line");
            assert_ne!(source, target, "line {line:?}");
        }
    }
}

#[test]
fn output_is_deterministic() {
    for input in sample_inputs() {
        assert_eq!(simplify(&input), simplify(&input));
    }
}

#[test]
fn duplicate_lines_yield_one_edge() {
    let input = "aws_route53 -> aws_provider\n".repeat(10);
    let output = simplify(&input);
    let edges = discovered_edges(&output);
    assert_eq!(
        edges,
        vec![
            r#"    "AWS Provider" -> "Route53""#,
            r#"    "Route53" -> "AWS Provider""#,
        ]
    );
}

#[test]
fn edges_are_sorted_by_line_text() {
    for input in sample_inputs() {
        let output = simplify(&input);
        let edges = discovered_edges(&output);
        let mut sorted = edges.clone();
        sorted.sort();
        assert_eq!(edges, sorted);
    }
}

#[test]
fn empty_input_has_no_discovered_edges() {
    let output = simplify("");
    assert!(output.starts_with("digraph {\n    rankdir = \"TB\"\n"));
    assert!(output.contains(DEPENDENCIES_HEADER));
    assert!(discovered_edges(&output).is_empty());
    assert!(output.ends_with(&format!("{INFO_EDGE}\n}}\n")));
}

#[test]
fn vpc_to_security_group_scenario() {
    let output = simplify("module.vpc -> module.alb_security_group depends_on");
    let wanted = r#"    "VPC" -> "ALB Security Group""#;
    assert_eq!(output.lines().filter(|line| *line == wanted).count(), 1);
    assert!(discovered_edges(&output).contains(&wanted));
}

#[test]
fn lone_identifier_or_missing_marker_adds_nothing() {
    assert!(discovered_edges(&simplify("module.vpc -> something_else")).is_empty());
    assert!(discovered_edges(&simplify("module.vpc aws_route53")).is_empty());
    assert!(discovered_edges(&simplify("module.vpc\n-> aws_route53")).is_empty());
}

#[test]
fn builtin_and_explicit_registry_agree() {
    let input = "module.alb -> aws_route53";
    assert_eq!(simplify(input), simplify_with(Registry::builtin(), input));
}
