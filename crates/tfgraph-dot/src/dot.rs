//! DOT format utilities for the simplified graph.

use std::fmt::Write;

/// One indentation level.
pub const INDENT: &str = "    ";

/// Escape special characters for quoted DOT strings.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Quote a node name or attribute value.
pub fn quoted(input: &str) -> String {
    format!("\"{}\"", escape_label(input))
}

/// Attribute values that are plain DOT identifiers stay bare, everything else is quoted.
pub fn attr_value(input: &str) -> String {
    let mut chars = input.chars();
    let is_ident = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if is_ident {
        input.to_string()
    } else {
        quoted(input)
    }
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str(INDENT);
    }
}

/// Render `"from" -> "to"` at the given indentation level.
pub fn edge_line(from: &str, to: &str, level: usize) -> String {
    let mut line = String::new();
    write_indent(&mut line, level);
    let _ = write!(line, "{} -> {}", quoted(from), quoted(to));
    line
}

/// Builder for the anonymous digraph tfgraph emits.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl Default for DotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DotBuilder {
    pub fn new() -> Self {
        let mut output = String::with_capacity(2048);
        output.push_str("digraph {\n");
        Self { output, indent: 1 }
    }

    /// Add a graph attribute, e.g. `rankdir = "TB"`.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{key} = {}", quoted(value));
        self
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "# {text}");
        self
    }

    /// Set the default style for nodes declared after this point.
    pub fn node_style(&mut self, attrs: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "node [{attrs}]");
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Declare a node, with an attribute list only when `attrs` is non-empty.
    pub fn node(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        self.output.push_str(&quoted(name));
        if !attrs.is_empty() {
            self.output.push_str(" [");
            for (i, (key, value)) in attrs.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                let _ = write!(self.output, "{key}={}", attr_value(value));
            }
            self.output.push(']');
        }
        self.output.push('\n');
        self
    }

    pub fn edge(&mut self, from: &str, to: &str) -> &mut Self {
        self.output.push_str(&edge_line(from, to, self.indent));
        self.output.push('\n');
        self
    }

    /// Append a line that is already indented.
    pub fn line(&mut self, line: &str) -> &mut Self {
        self.output.push_str(line);
        self.output.push('\n');
        self
    }

    /// Close the graph and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}
