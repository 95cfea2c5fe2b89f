use std::collections::BTreeSet;
use std::io::Write;

use super::PropertyGraph;
use crate::errors::SerializeError;

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
const VERTEX_LABEL_KEY: &str = "labelV";
const EDGE_LABEL_KEY: &str = "labelE";

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn vertex_key(name: &str) -> String {
    escape(&format!("v:{name}"))
}

fn edge_key(name: &str) -> String {
    escape(&format!("e:{name}"))
}

fn write_key<W: Write>(
    writer: &mut W,
    id: &str,
    domain: &str,
    name: &str,
) -> Result<(), SerializeError> {
    writeln!(
        writer,
        r#"  <key id="{}" for="{}" attr.name="{}" attr.type="string"/>"#,
        id,
        domain,
        escape(name)
    )?;
    Ok(())
}

/// Write `graph` as a GraphML document with id `graph_id`.
///
/// Every property name gets a declared `<key>`; vertex and edge labels are
/// stored under `labelV` and `labelE`.
pub fn write_graphml<W: Write>(
    graph: &dyn PropertyGraph,
    graph_id: &str,
    writer: &mut W,
) -> Result<(), SerializeError> {
    let vertex_props: BTreeSet<&str> = graph
        .graph_vertices()
        .flat_map(|v| v.properties.keys().map(String::as_str))
        .collect();
    let edge_props: BTreeSet<&str> = graph
        .graph_edges()
        .flat_map(|e| e.properties.keys().map(String::as_str))
        .collect();

    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(writer, r#"<graphml xmlns="{GRAPHML_NS}">"#)?;

    write_key(writer, VERTEX_LABEL_KEY, "node", VERTEX_LABEL_KEY)?;
    for name in &vertex_props {
        write_key(writer, &vertex_key(name), "node", name)?;
    }
    write_key(writer, EDGE_LABEL_KEY, "edge", EDGE_LABEL_KEY)?;
    for name in &edge_props {
        write_key(writer, &edge_key(name), "edge", name)?;
    }

    writeln!(
        writer,
        r#"  <graph id="{}" edgedefault="directed">"#,
        escape(graph_id)
    )?;

    for vertex in graph.graph_vertices() {
        writeln!(writer, r#"    <node id="{}">"#, escape(&vertex.guid))?;
        writeln!(
            writer,
            r#"      <data key="{VERTEX_LABEL_KEY}">{}</data>"#,
            escape(&vertex.type_name)
        )?;
        for (name, value) in &vertex.properties {
            writeln!(
                writer,
                r#"      <data key="{}">{}</data>"#,
                vertex_key(name),
                escape(value)
            )?;
        }
        writeln!(writer, "    </node>")?;
    }

    for edge in graph.graph_edges() {
        writeln!(
            writer,
            r#"    <edge id="{}" source="{}" target="{}">"#,
            escape(&edge.id()),
            escape(&edge.from),
            escape(&edge.to)
        )?;
        writeln!(
            writer,
            r#"      <data key="{EDGE_LABEL_KEY}">{}</data>"#,
            escape(&edge.label)
        )?;
        for (name, value) in &edge.properties {
            writeln!(
                writer,
                r#"      <data key="{}">{}</data>"#,
                edge_key(name),
                escape(value)
            )?;
        }
        writeln!(writer, "    </edge>")?;
    }

    writeln!(writer, "  </graph>")?;
    writeln!(writer, "</graphml>")?;
    Ok(())
}

/// Render `graph` as a GraphML string.
pub fn to_graphml(graph: &dyn PropertyGraph, graph_id: &str) -> Result<String, SerializeError> {
    let mut buffer = Vec::new();
    write_graphml(graph, graph_id, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| SerializeError::InvalidGraph(e.to_string()))
}
