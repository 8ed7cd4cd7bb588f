//! # Graph Persistence Module
//!
//! Writes the final graph artifact: a JSON file for the graph visualization
//! and a flat `source,target,weight` CSV derived from the edges array. Both
//! are kept in sync and written atomically (temp file in the destination
//! directory, then rename), so a failed write never leaves a partial
//! artifact behind.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use log::info;
use tempfile::NamedTempFile;

use crate::errors::PipelineError;
use crate::graph::{Edge, Graph};

/// Render the flat CSV edge list, header row included.
///
/// The rendering depends on the edges array alone, so the CSV can always be
/// regenerated from the JSON artifact without the node set.
pub fn csv_from_edges(edges: &[Edge]) -> String {
    let mut out = String::from("source,target,weight\n");
    for edge in edges {
        out.push_str(&format!("{},{},{}\n", edge.source, edge.target, edge.weight));
    }
    out
}

/// Write the graph artifact and its CSV rendering.
///
/// Stamps `generated_at` in the metadata, then writes both files through
/// temp files finalized with an atomic rename. Either both writes succeed or
/// the previous artifacts are left untouched.
pub fn write_graph(
    graph: &mut Graph,
    json_path: &Path,
    csv_path: &Path,
) -> Result<(), PipelineError> {
    graph.metadata.generated_at = Some(Utc::now().to_rfc3339());

    let json = serde_json::to_string_pretty(graph)
        .map_err(|e| PipelineError::Persist(format!("serializing graph: {e}")))?;
    write_atomic(json_path, json.as_bytes())?;

    let csv = csv_from_edges(&graph.edges);
    write_atomic(csv_path, csv.as_bytes())?;

    info!(
        "Wrote {} and {} ({} nodes, {} edges)",
        json_path.display(),
        csv_path.display(),
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(())
}

/// Write bytes to a temp file in the destination directory, then rename it
/// over the target path.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut temp = match dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|e| PipelineError::Persist(format!("creating temp file for {}: {e}", path.display())))?;

    temp.as_file_mut()
        .write_all(bytes)
        .map_err(|e| PipelineError::Persist(format!("writing {}: {e}", path.display())))?;

    temp.persist(path)
        .map_err(|e| PipelineError::Persist(format!("finalizing {}: {e}", path.display())))?;
    Ok(())
}
