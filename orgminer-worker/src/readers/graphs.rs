//! Graph fragment reader
//!
//! The tool writes one or more GEXF fragments per repository. This reader
//! merges them into a single graph: node identifiers deduplicate into a
//! set, edges concatenate in sorted fragment-file order. One malformed
//! fragment aborts the whole read; a partial graph is never returned.

use anyhow::{Context, Result};
use orgminer_core::domain::result::{GraphEdge, GraphResult, MergedGraph};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const GEXF_NAMESPACE: &[u8] = b"http://www.gexf.net/1.2draft";

const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Merges all graph fragments for one (author, repository) pair.
pub fn read_merged_graph(graph_dir: &Path, author: &str, repository: &str) -> GraphResult {
    if !graph_dir.exists() {
        return GraphResult::error("graph directory not found");
    }

    let fragments = match list_fragments(graph_dir, author, repository) {
        Ok(fragments) => fragments,
        Err(e) => return GraphResult::error(format!("failed to list graph directory: {e}")),
    };

    let mut nodes = BTreeSet::new();
    let mut edges = Vec::new();

    for fragment in &fragments {
        if let Err(e) = parse_fragment(fragment, &mut nodes, &mut edges) {
            let name = fragment
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| fragment.display().to_string());
            return GraphResult::error(format!("failed to parse {name}: {e:#}"));
        }
    }

    GraphResult::Graph(MergedGraph {
        nodes: nodes.into_iter().collect(),
        edges,
    })
}

/// Fragment files matching `<author>-<repository>_graph*.gexf`, sorted by
/// filename so edge order is deterministic.
fn list_fragments(graph_dir: &Path, author: &str, repository: &str) -> Result<Vec<PathBuf>> {
    let prefix = format!("{author}-{repository}_graph");

    let mut fragments = Vec::new();
    for entry in std::fs::read_dir(graph_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(&prefix) && name.ends_with(".gexf") {
            fragments.push(entry.path());
        }
    }

    fragments.sort();
    Ok(fragments)
}

fn parse_fragment(
    path: &Path,
    nodes: &mut BTreeSet<String>,
    edges: &mut Vec<GraphEdge>,
) -> Result<()> {
    let mut reader = NsReader::from_file(path)?;
    let mut buf = Vec::new();

    loop {
        let (resolve, event) = reader.read_resolved_event_into(&mut buf)?;
        match event {
            Event::Start(ref element) | Event::Empty(ref element) => {
                let in_gexf_namespace =
                    matches!(resolve, ResolveResult::Bound(Namespace(ns)) if ns == GEXF_NAMESPACE);

                if in_gexf_namespace {
                    match element.local_name().as_ref() {
                        b"node" => {
                            if let Some(id) = attribute(element, "id")? {
                                nodes.insert(id);
                            }
                        }
                        b"edge" => edges.push(parse_edge(element)?),
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_edge(element: &BytesStart<'_>) -> Result<GraphEdge> {
    let source = attribute(element, "source")?.context("edge is missing a source attribute")?;
    let target = attribute(element, "target")?.context("edge is missing a target attribute")?;

    let weight = match attribute(element, "weight")? {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("invalid edge weight '{raw}'"))?,
        None => DEFAULT_EDGE_WEIGHT,
    };

    Ok(GraphEdge {
        source,
        target,
        weight,
    })
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
