use std::io::{self, Write};

use crate::{graph::MapGraph, style::Style};

const INDENT: &str = "    ";

/// Writes `graph` as an undirected Graphviz graph.
pub fn write_dot<W: Write>(graph: &MapGraph, style: &Style, w: &mut W) -> io::Result<()> {
    writeln!(w, "graph {} {{", quote(graph.name()))?;
    write_defaults(w, "graph", &style.graph_attributes())?;
    write_defaults(w, "node", &style.node_attributes())?;
    write_defaults(w, "edge", &style.edge_attributes())?;

    for node in graph.nodes() {
        writeln!(
            w,
            "{}{}{}",
            INDENT,
            quote(&node.key),
            attr_list(node.attrs.iter().map(|(k, v)| (*k, v.as_str())))
        )?;
    }

    for (a, b, edge) in graph.edges() {
        writeln!(
            w,
            "{}{} -- {}{}",
            INDENT,
            quote(&a.key),
            quote(&b.key),
            attr_list(edge.attrs.iter().map(|(k, v)| (*k, v.as_str())))
        )?;
    }

    writeln!(w, "}}")
}

pub fn to_dot(graph: &MapGraph, style: &Style) -> String {
    let mut out = Vec::new();
    // Writing into a Vec never fails.
    let _ = write_dot(graph, style, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

fn write_defaults<W: Write>(w: &mut W, kind: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
    if attrs.is_empty() {
        return Ok(());
    }
    writeln!(w, "{}{}{}", INDENT, kind, attr_list(attrs.iter().copied()))
}

fn attr_list<'a>(attrs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let attrs: Vec<_> = attrs
        .map(|(k, v)| format!("{}={}", k, quote(v)))
        .collect();
    if attrs.is_empty() {
        String::new()
    } else {
        format!(" [{}]", attrs.join(", "))
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
